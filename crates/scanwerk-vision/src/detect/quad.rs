// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral selection: pick the winning candidate, order its corners,
// fall back to the deterministic inset rectangle when nothing qualifies.

use scanwerk_core::{CornerQuad, DetectionConfig, Point2D};
use tracing::debug;

use super::contour::PolygonCandidate;

/// Re-simplification epsilon growth per step, and the cap as a fraction of
/// arc length. Past the cap the shape is treated as undetectable.
const EPSILON_GROWTH: f64 = 1.5;
const EPSILON_CAP_FRACTION: f64 = 0.10;

/// Outcome of quadrilateral selection.
#[derive(Debug, Clone)]
pub struct QuadSelection {
    pub quad: CornerQuad,
    /// True when no candidate qualified and the inset default was used.
    pub fallback: bool,
}

/// Select the page quadrilateral from the extracted candidates.
///
/// The largest-area candidate wins; ties keep the first-seen candidate. A
/// 4-vertex winner is ordered canonically. A 5- or 6-vertex winner is
/// re-simplified with a growing tolerance until exactly 4 vertices remain;
/// if the vertex count drops below 4 or the tolerance cap is reached, the
/// winner is treated as undetectable and the inset default is returned.
pub fn select_quad(
    candidates: &[PolygonCandidate],
    image_width: f64,
    image_height: f64,
    config: &DetectionConfig,
) -> QuadSelection {
    let fallback = QuadSelection {
        quad: CornerQuad::default_inset(image_width, image_height),
        fallback: true,
    };

    let mut winner: Option<&PolygonCandidate> = None;
    for candidate in candidates {
        match winner {
            Some(best) if candidate.area <= best.area => {}
            _ => winner = Some(candidate),
        }
    }

    let Some(winner) = winner else {
        debug!("no qualifying candidate; using inset fallback");
        return fallback;
    };

    let points = if winner.vertex_count() == 4 {
        winner.simplified.clone()
    } else {
        match reduce_to_four(winner, config) {
            Some(points) => points,
            None => {
                debug!(
                    vertices = winner.vertex_count(),
                    "winner did not reduce to 4 corners; using inset fallback"
                );
                return fallback;
            }
        }
    };

    let corners: [Point2D; 4] = [points[0], points[1], points[2], points[3]];
    QuadSelection {
        quad: CornerQuad::from_unordered(corners),
        fallback: false,
    }
}

/// Re-simplify a 5- or 6-vertex winner with a growing tolerance until
/// exactly 4 vertices remain.
fn reduce_to_four(candidate: &PolygonCandidate, config: &DetectionConfig) -> Option<Vec<Point2D>> {
    let cap = EPSILON_CAP_FRACTION * candidate.arc_length;
    let mut epsilon = config.simplify_tolerance * candidate.arc_length;
    let mut points = candidate.simplified.clone();

    while points.len() > 4 && epsilon < cap {
        epsilon *= EPSILON_GROWTH;
        points = candidate.simplify_with(epsilon);
    }

    (points.len() == 4).then_some(points)
}
