// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Integral-image based local thresholding, shared by the detection
// preprocessor and the document-style renderer.

use image::{GrayImage, Luma};

/// Compute the integral (summed-area table) of a grayscale image.
///
/// `integral[y * (width+1) + x]` contains the sum of all pixel values in the
/// rectangle [0, 0) to (x, y) (exclusive on both axes). The table has
/// dimensions `(width+1) x (height+1)` with a zero-padded border.
pub(crate) fn integral_image(gray: &GrayImage) -> Vec<u64> {
    let (w, h) = gray.dimensions();
    let stride = (w + 1) as usize;
    let mut table = vec![0u64; stride * (h + 1) as usize];

    for y in 0..h {
        let mut row_sum: u64 = 0;
        for x in 0..w {
            row_sum += gray.get_pixel(x, y).0[0] as u64;
            let idx = (y + 1) as usize * stride + (x + 1) as usize;
            let above = y as usize * stride + (x + 1) as usize;
            table[idx] = row_sum + table[above];
        }
    }

    table
}

/// Mean pixel value within a square region centred on (cx, cy) with the
/// given radius, using the precomputed integral image.
pub(crate) fn region_mean(
    integral: &[u64],
    img_width: u32,
    img_height: u32,
    cx: u32,
    cy: u32,
    radius: u32,
) -> f64 {
    let stride = (img_width + 1) as usize;

    // Clamp the region to image bounds.
    let x1 = cx.saturating_sub(radius) as usize;
    let y1 = cy.saturating_sub(radius) as usize;
    let x2 = ((cx + radius + 1) as usize).min(img_width as usize);
    let y2 = ((cy + radius + 1) as usize).min(img_height as usize);

    let area = ((x2 - x1) * (y2 - y1)) as f64;
    if area == 0.0 {
        return 128.0;
    }

    // Summed-area table lookup: S = I[y2][x2] - I[y1][x2] - I[y2][x1] + I[y1][x1]
    let sum = integral[y2 * stride + x2] as f64
        - integral[y1 * stride + x2] as f64
        - integral[y2 * stride + x1] as f64
        + integral[y1 * stride + x1] as f64;

    sum / area
}

/// Adaptive local threshold: for each pixel the threshold is the mean
/// intensity within a `block_radius` neighbourhood, minus `offset`.
/// Pixels darker than the local threshold become black; others white.
pub fn adaptive_binarize(gray: &GrayImage, block_radius: u32, offset: i32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let integral = integral_image(gray);
    let mut output = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let local_mean = region_mean(&integral, width, height, x, y, block_radius);
            let threshold = (local_mean as i32 - offset).clamp(0, 255) as u8;
            let pixel_val = gray.get_pixel(x, y).0[0];
            let binary = if pixel_val < threshold { 0u8 } else { 255u8 };
            output.put_pixel(x, y, Luma([binary]));
        }
    }

    output
}
