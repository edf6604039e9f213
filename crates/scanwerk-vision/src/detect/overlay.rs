// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview annotation: connecting lines plus corner markers drawn over the
// working image. Cheap enough to re-run on every interactive corner move.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use scanwerk_core::CornerQuad;

const EDGE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const DOT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const RING_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const DOT_RADIUS: i32 = 15;

/// Draw the current quad over a copy of the working image: the four
/// connecting edges, then a filled dot with a contrasting ring at each
/// corner. Output dimensions always match the input.
pub fn draw_overlay(base: &RgbImage, quad: &CornerQuad) -> RgbImage {
    let mut canvas = base.clone();
    let corners = quad.points();

    for i in 0..4 {
        let start = corners[i];
        let end = corners[(i + 1) % 4];
        draw_line_segment_mut(
            &mut canvas,
            (start.x as f32, start.y as f32),
            (end.x as f32, end.y as f32),
            EDGE_COLOR,
        );
    }

    for corner in corners {
        let center = (corner.x.round() as i32, corner.y.round() as i32);
        draw_filled_circle_mut(&mut canvas, center, DOT_RADIUS, DOT_COLOR);
        draw_hollow_circle_mut(&mut canvas, center, DOT_RADIUS, RING_COLOR);
    }

    canvas
}
