// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scanwerk engine.
//
// Coordinate spaces: corner coordinates live in *working-image* space (the
// downscaled copy used for detection and editing) until they are projected
// into *original-image* space via `CornerQuad::to_original_space` at commit
// time. Display-space conversion is owned by the interaction layer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an interactive correction session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 2D point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// Horizontal position (pixels from the left edge).
    pub x: f64,
    /// Vertical position (pixels from the top edge).
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Scale both coordinates by a common factor.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Clamp the point into the rectangle [0, max_x] x [0, max_y].
    pub fn clamped(self, max_x: f64, max_y: f64) -> Self {
        Self::new(self.x.clamp(0.0, max_x), self.y.clamp(0.0, max_y))
    }
}

/// Corner index constants for `CornerQuad`, in canonical order.
pub const TOP_LEFT: usize = 0;
pub const TOP_RIGHT: usize = 1;
pub const BOTTOM_RIGHT: usize = 2;
pub const BOTTOM_LEFT: usize = 3;

/// Four document corners in canonical order
/// [top-left, top-right, bottom-right, bottom-left].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerQuad([Point2D; 4]);

impl CornerQuad {
    /// Build a quad from corners already in canonical order.
    pub const fn new(
        top_left: Point2D,
        top_right: Point2D,
        bottom_right: Point2D,
        bottom_left: Point2D,
    ) -> Self {
        Self([top_left, top_right, bottom_right, bottom_left])
    }

    /// Order four arbitrary corner points canonically.
    ///
    /// The two smallest-y points form the top pair, the two largest-y the
    /// bottom pair; within each pair the smaller x is the left corner.
    pub fn from_unordered(mut points: [Point2D; 4]) -> Self {
        points.sort_by(|a, b| a.y.total_cmp(&b.y));
        let (mut top, mut bottom) = ([points[0], points[1]], [points[2], points[3]]);
        top.sort_by(|a, b| a.x.total_cmp(&b.x));
        bottom.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self::new(top[0], top[1], bottom[1], bottom[0])
    }

    /// The deterministic fallback quad for a `width` x `height` image: an
    /// axis-aligned rectangle inset 10% from every edge.
    pub fn default_inset(width: f64, height: f64) -> Self {
        Self::new(
            Point2D::new(0.1 * width, 0.1 * height),
            Point2D::new(0.9 * width, 0.1 * height),
            Point2D::new(0.9 * width, 0.9 * height),
            Point2D::new(0.1 * width, 0.9 * height),
        )
    }

    pub fn points(&self) -> &[Point2D; 4] {
        &self.0
    }

    /// Overwrite the corner at `index` (canonical order).
    pub fn set(&mut self, index: usize, point: Point2D) {
        self.0[index] = point;
    }

    pub fn top_left(&self) -> Point2D {
        self.0[TOP_LEFT]
    }

    pub fn top_right(&self) -> Point2D {
        self.0[TOP_RIGHT]
    }

    pub fn bottom_right(&self) -> Point2D {
        self.0[BOTTOM_RIGHT]
    }

    pub fn bottom_left(&self) -> Point2D {
        self.0[BOTTOM_LEFT]
    }

    /// Index of the corner nearest to `p`, with its Euclidean distance.
    pub fn nearest_corner(&self, p: Point2D) -> (usize, f64) {
        let mut best = (0, f64::INFINITY);
        for (i, corner) in self.0.iter().enumerate() {
            let d = corner.distance(p);
            if d < best.1 {
                best = (i, d);
            }
        }
        best
    }

    /// Project every corner from working-image space into original-image
    /// space. `scale_factor` is the fixed original/working size ratio
    /// established when the image was loaded.
    pub fn to_original_space(&self, scale_factor: f64) -> Self {
        Self(self.0.map(|p| p.scaled(scale_factor)))
    }

    /// Length of the top edge (top-left to top-right).
    pub fn top_width(&self) -> f64 {
        self.top_left().distance(self.top_right())
    }

    /// Length of the bottom edge (bottom-left to bottom-right).
    pub fn bottom_width(&self) -> f64 {
        self.bottom_left().distance(self.bottom_right())
    }

    /// Length of the left edge (top-left to bottom-left).
    pub fn left_height(&self) -> f64 {
        self.top_left().distance(self.bottom_left())
    }

    /// Length of the right edge (top-right to bottom-right).
    pub fn right_height(&self) -> f64 {
        self.top_right().distance(self.bottom_right())
    }

    /// Shortest of the four edge lengths.
    pub fn min_side(&self) -> f64 {
        self.top_width()
            .min(self.bottom_width())
            .min(self.left_height())
            .min(self.right_height())
    }
}

impl std::ops::Index<usize> for CornerQuad {
    type Output = Point2D;

    fn index(&self, index: usize) -> &Point2D {
        &self.0[index]
    }
}
