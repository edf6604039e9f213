// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document-style rendering — contrast/brightness boost and binarization
// into the black/white scanned-document look.

use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use imageproc::filter::gaussian_blur_f32;
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::{Binarization, StyleConfig};
use tracing::{debug, info, instrument};

use crate::threshold::adaptive_binarize;

/// Renders the scanned-document look.
///
/// Valid on a rectified page or directly on any loaded image: the
/// quick "auto" path skips rectification entirely and still produces a
/// usable black/white document.
pub struct DocumentStyler {
    config: StyleConfig,
}

impl DocumentStyler {
    pub fn new(config: StyleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Run the full enhancement: grayscale, optional smoothing, linear
    /// contrast/brightness, then binarization. Output dimensions always
    /// match the input.
    #[instrument(skip(self, image))]
    pub fn render(&self, image: &DynamicImage) -> Result<GrayImage> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ScanError::EmptyBuffer(
                "cannot render a zero-area image".into(),
            ));
        }
        if self.config.blur_kernel % 2 == 0 {
            return Err(ScanError::InvalidConfig(format!(
                "blur_kernel must be odd, got {}",
                self.config.blur_kernel
            )));
        }
        info!(width, height, "rendering document style");

        let mut gray = image.to_luma8();
        if self.config.blur_kernel > 1 {
            gray = gaussian_blur_f32(&gray, kernel_sigma(self.config.blur_kernel));
        }

        let adjusted = adjust_contrast_brightness(&gray, self.config.contrast, self.config.brightness);
        let output = binarize(&adjusted, self.config.binarization);
        debug!("document style complete");
        Ok(output)
    }
}

/// Linear tone mapping: `clamp(contrast * v + brightness, 0, 255)`.
pub fn adjust_contrast_brightness(gray: &GrayImage, contrast: f32, brightness: f32) -> GrayImage {
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        *out = (contrast * v as f32 + brightness).clamp(0.0, 255.0) as u8;
    }

    let mut output = gray.clone();
    for pixel in output.pixels_mut() {
        pixel.0[0] = lut[pixel.0[0] as usize];
    }
    output
}

/// Split the image into pure black and white with the configured strategy.
pub fn binarize(gray: &GrayImage, mode: Binarization) -> GrayImage {
    match mode {
        Binarization::Global { threshold } => {
            let (width, height) = gray.dimensions();
            let mut output = GrayImage::new(width, height);
            for (x, y, pixel) in gray.enumerate_pixels() {
                let binary = if pixel.0[0] > threshold { 255u8 } else { 0u8 };
                output.put_pixel(x, y, Luma([binary]));
            }
            output
        }
        Binarization::Adaptive { block_radius, offset } => {
            adaptive_binarize(gray, block_radius, offset)
        }
    }
}

/// Sigma for an odd Gaussian kernel size, using the same size-to-sigma rule
/// as the capture pipeline's blur stage.
fn kernel_sigma(kernel: u32) -> f32 {
    0.3 * ((kernel as f32 - 1.0) * 0.5 - 1.0) + 0.8
}
