// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification — flatten the corrected quadrilateral into an
// axis-aligned rectangle sized from its measured edge lengths.

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::CornerQuad;
use tracing::{debug, info, instrument};

/// Edges shorter than this are treated as collapsed (duplicate or
/// collinear corners).
const MIN_SIDE_PX: f64 = 1.0;

/// Warp the quadrilateral region of `original` into a flat rectangle.
///
/// `corners` must already be in original-image space — corners coming out
/// of interactive correction are in working space and must be projected
/// with `CornerQuad::to_original_space` first.
///
/// Output width is the longer of the top/bottom edges, output height the
/// longer of the left/right edges, so the flattened page keeps the larger
/// of each pair of measured dimensions. A quadrilateral with a collapsed
/// side fails with `DegenerateQuadrilateral` rather than producing a
/// zero-sized buffer.
#[instrument(skip(original, corners))]
pub fn rectify(original: &DynamicImage, corners: &CornerQuad) -> Result<RgbImage> {
    let (src_w, src_h) = original.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(ScanError::EmptyBuffer(
            "cannot rectify a zero-area image".into(),
        ));
    }

    let top = corners.top_width();
    let bottom = corners.bottom_width();
    let left = corners.left_height();
    let right = corners.right_height();
    if corners.min_side() < MIN_SIDE_PX {
        return Err(ScanError::DegenerateQuadrilateral(format!(
            "collapsed side (top {top:.1}, bottom {bottom:.1}, left {left:.1}, right {right:.1})"
        )));
    }

    let out_w = top.max(bottom).round() as u32;
    let out_h = left.max(right).round() as u32;
    debug!(out_w, out_h, "destination size derived from edge lengths");

    let src: [(f32, f32); 4] = [
        (corners.top_left().x as f32, corners.top_left().y as f32),
        (corners.top_right().x as f32, corners.top_right().y as f32),
        (corners.bottom_right().x as f32, corners.bottom_right().y as f32),
        (corners.bottom_left().x as f32, corners.bottom_left().y as f32),
    ];
    let dst: [(f32, f32); 4] = [
        (0.0, 0.0),
        ((out_w - 1) as f32, 0.0),
        ((out_w - 1) as f32, (out_h - 1) as f32),
        (0.0, (out_h - 1) as f32),
    ];

    let projection = Projection::from_control_points(src, dst).ok_or_else(|| {
        ScanError::DegenerateQuadrilateral(
            "corners are collinear; no perspective transform exists".into(),
        )
    })?;

    let rgb = original.to_rgb8();
    let mut output = RgbImage::new(out_w, out_h);
    warp_into(
        &rgb,
        &projection,
        Interpolation::Bilinear,
        Rgb([255u8, 255, 255]),
        &mut output,
    );

    info!(out_w, out_h, "perspective rectification applied");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanwerk_core::Point2D;

    /// Smooth diagonal gradient so resampling differences stay tiny.
    fn gradient_image(w: u32, h: u32) -> DynamicImage {
        let img = RgbImage::from_fn(w, h, |x, y| {
            let v = ((x + y) % 256) as u8;
            Rgb([v, v, v])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn axis_aligned_rectangle_rectifies_to_its_own_crop() {
        let source = gradient_image(600, 800);
        let corners = CornerQuad::new(
            Point2D::new(100.0, 100.0),
            Point2D::new(400.0, 100.0),
            Point2D::new(400.0, 500.0),
            Point2D::new(100.0, 500.0),
        );

        let output = rectify(&source, &corners).expect("rectify");

        assert!((output.width() as i64 - 300).abs() <= 1);
        assert!((output.height() as i64 - 400).abs() <= 1);

        // The output must match the corresponding crop of the source to
        // within resampling tolerance.
        let src_rgb = source.to_rgb8();
        for (x, y) in [(0u32, 0u32), (50, 70), (150, 200), (250, 350)] {
            let got = output.get_pixel(x, y).0[0] as i32;
            let want = src_rgb.get_pixel(100 + x, 100 + y).0[0] as i32;
            assert!(
                (got - want).abs() <= 3,
                "pixel ({x},{y}): got {got}, want {want}"
            );
        }
    }

    #[test]
    fn skewed_quad_output_size_uses_longer_edges() {
        let source = gradient_image(500, 500);
        // Trapezoid: top edge 200 px, bottom edge 300 px, height 250 px.
        let corners = CornerQuad::new(
            Point2D::new(150.0, 100.0),
            Point2D::new(350.0, 100.0),
            Point2D::new(400.0, 350.0),
            Point2D::new(100.0, 350.0),
        );

        let output = rectify(&source, &corners).expect("rectify");
        assert_eq!(output.width(), 300);
        // Left/right edges are sqrt(50^2 + 250^2) ~ 254.95.
        assert_eq!(output.height(), 255);
    }

    #[test]
    fn coincident_corners_are_degenerate() {
        let source = gradient_image(300, 300);
        let p = Point2D::new(50.0, 50.0);
        let corners = CornerQuad::new(p, p, Point2D::new(250.0, 250.0), Point2D::new(50.0, 250.0));

        let err = rectify(&source, &corners).unwrap_err();
        assert!(matches!(err, ScanError::DegenerateQuadrilateral(_)));
    }

    #[test]
    fn collinear_corners_are_degenerate() {
        let source = gradient_image(300, 300);
        // All four corners on one line; every side is non-zero but no
        // homography maps a line onto a rectangle.
        let corners = CornerQuad::new(
            Point2D::new(10.0, 10.0),
            Point2D::new(100.0, 100.0),
            Point2D::new(200.0, 200.0),
            Point2D::new(290.0, 290.0),
        );

        let err = rectify(&source, &corners).unwrap_err();
        assert!(matches!(err, ScanError::DegenerateQuadrilateral(_)));
    }
}
