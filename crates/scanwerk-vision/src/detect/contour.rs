// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour extraction: external-boundary tracing on the edge map, polygon
// simplification, and candidate filtering.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;
use scanwerk_core::{DetectionConfig, Point2D};
use tracing::debug;

/// Vertex-count range accepted as a page candidate. Slight
/// over-approximation (5 or 6 vertices) is tolerated so that rounded or
/// noisy corners don't reject an otherwise clean page boundary.
const MIN_VERTICES: usize = 4;
const MAX_VERTICES: usize = 6;

/// A traced external boundary that qualified as a page candidate.
#[derive(Debug, Clone)]
pub struct PolygonCandidate {
    /// The raw traced boundary, kept for re-simplification.
    raw: Vec<Point<i32>>,
    /// Reduced-vertex polygon (4 to 6 points).
    pub simplified: Vec<Point2D>,
    /// Area of the traced boundary, in square pixels.
    pub area: f64,
    /// Closed arc length of the traced boundary.
    pub arc_length: f64,
}

impl PolygonCandidate {
    pub fn vertex_count(&self) -> usize {
        self.simplified.len()
    }

    /// Re-run polygon simplification on the raw boundary with a different
    /// tolerance.
    pub fn simplify_with(&self, epsilon: f64) -> Vec<Point2D> {
        to_point2d(&approximate_polygon_dp(&self.raw, epsilon, true))
    }
}

/// Trace external boundaries in the edge map and filter them into page
/// candidates.
///
/// A boundary qualifies only if (i) its area exceeds
/// `min_area_fraction` of the image area, and (ii) simplifying it with a
/// tolerance of `simplify_tolerance` x its arc length leaves 4 to 6
/// vertices. Nested boundaries are discarded: the document is assumed to be
/// the outermost shape.
pub fn extract_candidates(edges: &GrayImage, config: &DetectionConfig) -> Vec<PolygonCandidate> {
    let (width, height) = edges.dimensions();
    let min_area = config.min_area_fraction * (width as f64) * (height as f64);

    let contours = find_contours::<i32>(edges);
    let mut candidates = Vec::new();

    for contour in contours {
        if contour.parent.is_some() || contour.border_type != BorderType::Outer {
            continue;
        }
        if contour.points.len() < MIN_VERTICES {
            continue;
        }

        let area = shoelace_area(&contour.points);
        if area <= min_area {
            continue;
        }

        let perimeter = arc_length(&contour.points, true);
        let epsilon = config.simplify_tolerance * perimeter;
        let simplified = approximate_polygon_dp(&contour.points, epsilon, true);

        if (MIN_VERTICES..=MAX_VERTICES).contains(&simplified.len()) {
            candidates.push(PolygonCandidate {
                raw: contour.points,
                simplified: to_point2d(&simplified),
                area,
                arc_length: perimeter,
            });
        }
    }

    debug!(count = candidates.len(), min_area, "page candidates extracted");
    candidates
}

/// Polygon area via the shoelace formula. The vertices must be in boundary
/// order (CW or CCW).
fn shoelace_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    let mut area = 0.0f64;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x as f64 * points[j].y as f64;
        area -= points[j].x as f64 * points[i].y as f64;
    }
    area.abs() / 2.0
}

fn to_point2d(points: &[Point<i32>]) -> Vec<Point2D> {
    points
        .iter()
        .map(|p| Point2D::new(p.x as f64, p.y as f64))
        .collect()
}
