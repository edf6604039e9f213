// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detection facade: working-copy creation and the full preprocess ->
// contour -> quadrilateral pipeline with annotated preview output.

use image::{DynamicImage, GenericImageView, RgbImage};
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::{CornerQuad, DetectionConfig};
use tracing::{debug, info, instrument, warn};

use super::{contour, overlay, preprocess, quad};

/// The downscaled copy used for detection and interactive editing, plus the
/// fixed original/working size ratio.
///
/// The scale factor is established once per load and applied only when the
/// final corners are projected back into original-image space.
#[derive(Debug, Clone)]
pub struct WorkingCopy {
    pub image: DynamicImage,
    pub scale_factor: f64,
}

impl WorkingCopy {
    /// Downscale `original` so that its longer side does not exceed
    /// `max_dimension`, preserving aspect ratio. Images already within the
    /// cap are kept at full size with a scale factor of 1.
    #[instrument(skip(original), fields(max_dimension))]
    pub fn from_original(original: &DynamicImage, max_dimension: u32) -> Result<Self> {
        let (width, height) = original.dimensions();
        if width == 0 || height == 0 {
            return Err(ScanError::EmptyBuffer(
                "cannot make a working copy of a zero-area image".into(),
            ));
        }
        if max_dimension == 0 {
            return Err(ScanError::InvalidConfig(
                "max_working_dimension must be at least 1".into(),
            ));
        }

        if width.max(height) <= max_dimension {
            return Ok(Self {
                image: original.clone(),
                scale_factor: 1.0,
            });
        }

        let resized = original.resize(
            max_dimension,
            max_dimension,
            image::imageops::FilterType::Lanczos3,
        );
        let scale_factor = width as f64 / resized.width() as f64;
        debug!(
            from_w = width,
            from_h = height,
            to_w = resized.width(),
            to_h = resized.height(),
            scale_factor,
            "working copy created"
        );

        Ok(Self {
            image: resized,
            scale_factor,
        })
    }
}

/// Result of a detection pass: the annotated preview, the corners, and
/// whether the deterministic fallback had to be used.
#[derive(Debug, Clone)]
pub struct Detection {
    pub preview: RgbImage,
    /// Corners in working-image space, canonical order.
    pub corners: CornerQuad,
    /// True when no page boundary qualified and the inset default was
    /// substituted — a degraded result, not an error.
    pub fallback: bool,
}

/// Page-boundary detector.
///
/// Detection never fails on "no document": when nothing qualifies it
/// returns the deterministic inset quadrilateral and flags the result as a
/// fallback so the caller can tell the user.
pub struct DocumentDetector {
    config: DetectionConfig,
}

impl DocumentDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Run the detection pipeline on a working-resolution image.
    #[instrument(skip(self, working))]
    pub fn detect(&self, working: &DynamicImage) -> Result<Detection> {
        let (width, height) = working.dimensions();
        if width == 0 || height == 0 {
            return Err(ScanError::EmptyBuffer(
                "cannot detect a page in a zero-area image".into(),
            ));
        }
        info!(width, height, sensitivity = self.config.sensitivity, "detecting page boundary");

        let edges = preprocess::edge_map(working, &self.config)?;
        let candidates = contour::extract_candidates(&edges, &self.config);
        let selection = quad::select_quad(&candidates, width as f64, height as f64, &self.config);

        if selection.fallback {
            warn!("no page boundary found; presenting the inset default");
        } else {
            debug!(corners = ?selection.quad, "page boundary detected");
        }

        let preview = overlay::draw_overlay(&working.to_rgb8(), &selection.quad);

        Ok(Detection {
            preview,
            corners: selection.quad,
            fallback: selection.fallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn page_photo(w: u32, h: u32) -> DynamicImage {
        // Bright page on a dark desk.
        let mut img = GrayImage::from_pixel(w, h, Luma([40u8]));
        for y in h / 6..h * 5 / 6 {
            for x in w / 6..w * 5 / 6 {
                img.put_pixel(x, y, Luma([235u8]));
            }
        }
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn detect_finds_a_bright_page_without_fallback() {
        let detector = DocumentDetector::new(DetectionConfig::default());
        let image = page_photo(480, 360);

        let detection = detector.detect(&image).expect("detection");

        assert!(!detection.fallback);
        assert_eq!(detection.preview.dimensions(), (480, 360));
        // Corners must be canonically ordered whatever was detected.
        let quad = detection.corners;
        assert!(quad.top_left().y <= quad.bottom_left().y);
        assert!(quad.top_left().x <= quad.top_right().x);
        // The page occupies the central two thirds; corners should land
        // near its bounds, not at the image border.
        assert!(quad.top_left().x > 40.0 && quad.top_left().x < 140.0);
        assert!(quad.bottom_right().x > 340.0 && quad.bottom_right().x < 440.0);
    }

    #[test]
    fn featureless_image_falls_back_to_inset_quad() {
        let detector = DocumentDetector::new(DetectionConfig::default());
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(200, 150, Luma([128u8])));

        let detection = detector.detect(&image).expect("detection");

        assert!(detection.fallback);
        assert_eq!(detection.corners, CornerQuad::default_inset(200.0, 150.0));
    }

    #[test]
    fn working_copy_caps_the_longer_side() {
        let original = page_photo(2048, 1536);
        let copy = WorkingCopy::from_original(&original, 1024).expect("working copy");

        assert_eq!(copy.image.width(), 1024);
        assert_eq!(copy.image.height(), 768);
        assert!((copy.scale_factor - 2.0).abs() < 1e-9);
    }

    #[test]
    fn small_image_keeps_unit_scale_factor() {
        let original = page_photo(640, 480);
        let copy = WorkingCopy::from_original(&original, 1024).expect("working copy");

        assert_eq!(copy.image.dimensions(), (640, 480));
        assert_eq!(copy.scale_factor, 1.0);
    }

    #[test]
    fn corners_commit_back_to_original_space() {
        // The working->original seam: corners detected on the working copy,
        // multiplied by the scale factor, must land on the original page.
        let original = page_photo(2048, 1536);
        let copy = WorkingCopy::from_original(&original, 1024).expect("working copy");

        let detector = DocumentDetector::new(DetectionConfig::default());
        let detection = detector.detect(&copy.image).expect("detection");
        assert!(!detection.fallback);

        let committed = detection.corners.to_original_space(copy.scale_factor);
        // Page bounds in the original: x in [341, 1706], y in [256, 1280].
        assert!((committed.top_left().x - 341.0).abs() < 24.0);
        assert!((committed.top_left().y - 256.0).abs() < 24.0);
        assert!((committed.bottom_right().x - 1706.0).abs() < 24.0);
        assert!((committed.bottom_right().y - 1280.0).abs() < 24.0);
    }
}
