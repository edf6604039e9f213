// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge-map generation: grayscale, adaptive threshold, blur, Canny,
// morphological gap closing.

use image::{DynamicImage, GrayImage};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{dilate, erode};
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::DetectionConfig;
use tracing::debug;

/// Produce a binary edge map for page-boundary detection.
///
/// Pipeline: grayscale, adaptive local threshold (normalizes uneven
/// lighting before any edge work), Gaussian blur (suppresses thresholding
/// noise), Canny with low = 0.3 x sensitivity and high = sensitivity, then
/// one dilate/erode pass to close small gaps in edge lines.
pub fn edge_map(image: &DynamicImage, config: &DetectionConfig) -> Result<GrayImage> {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return Err(ScanError::EmptyBuffer(
            "cannot build an edge map from a zero-area image".into(),
        ));
    }

    let normalized = crate::threshold::adaptive_binarize(
        &gray,
        config.threshold_block_radius,
        config.threshold_offset,
    );
    let blurred = gaussian_blur_f32(&normalized, config.blur_sigma);

    let sensitivity = config.sensitivity.max(1.0);
    let edges = canny(&blurred, 0.3 * sensitivity, sensitivity);
    debug!(width, height, sensitivity, "Canny edge detection complete");

    // Close gaps in edge lines: dilate then erode with a square element.
    let k = config.gap_closing_radius;
    let closed = erode(&dilate(&edges, Norm::LInf, k), Norm::LInf, k);

    Ok(closed)
}
