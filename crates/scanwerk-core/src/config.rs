// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the page-boundary detection pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Edge sensitivity: the Canny high threshold. The low threshold is
    /// fixed at 0.3 x this value. User-adjustable.
    pub sensitivity: f32,
    /// Cap on the longer side of the working copy, in pixels.
    pub max_working_dimension: u32,
    /// Radius of the adaptive threshold window (radius 5 = 11x11 window).
    pub threshold_block_radius: u32,
    /// Constant subtracted from the local mean when thresholding.
    pub threshold_offset: i32,
    /// Sigma of the Gaussian blur applied before edge detection
    /// (1.1 matches a 5x5 kernel).
    pub blur_sigma: f32,
    /// Minimum contour area as a fraction of total image area.
    pub min_area_fraction: f64,
    /// Polygon simplification tolerance as a fraction of contour arc length.
    pub simplify_tolerance: f64,
    /// Radius of the square structuring element used to close gaps in edge
    /// lines (radius 2 = 5x5 element).
    pub gap_closing_radius: u8,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sensitivity: 100.0,
            max_working_dimension: 1024,
            threshold_block_radius: 5,
            threshold_offset: 2,
            blur_sigma: 1.1,
            min_area_fraction: 0.05,
            simplify_tolerance: 0.02,
            gap_closing_radius: 2,
        }
    }
}

/// Final-stage binarization strategy.
///
/// Both strategies are first-class: the fixed global threshold is the
/// default, the adaptive local threshold handles unevenly lit captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Binarization {
    /// Fixed luminance cut: pixels strictly above `threshold` become white,
    /// all others black.
    Global { threshold: u8 },
    /// Local windowed threshold: each pixel is compared against the mean of
    /// its neighbourhood minus `offset`.
    Adaptive { block_radius: u32, offset: i32 },
}

impl Default for Binarization {
    fn default() -> Self {
        Self::Global { threshold: 150 }
    }
}

/// Settings for the scanned-document look applied after rectification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Linear contrast factor.
    pub contrast: f32,
    /// Brightness offset added after the contrast factor.
    pub brightness: f32,
    /// Odd Gaussian kernel size applied before binarization; 1 disables
    /// smoothing.
    pub blur_kernel: u32,
    pub binarization: Binarization,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            contrast: 2.0,
            brightness: 30.0,
            blur_kernel: 1,
            binarization: Binarization::default(),
        }
    }
}

/// Combined engine settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    pub detection: DetectionConfig,
    pub style: StyleConfig,
}
