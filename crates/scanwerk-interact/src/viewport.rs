// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fit-within viewport mapping between image pixel space and display space.

use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::Point2D;

/// Pure bidirectional mapping between an image and the display viewport it
/// is shown in.
///
/// The image is scaled uniformly to fit inside the viewport and centred,
/// leaving symmetric letterbox margins on one axis. The mapping is a pure
/// function of the four dimensions; construct a new value whenever the
/// viewport or image size changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    image_width: f64,
    image_height: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Viewport {
    /// Build the mapping for an `image_width` x `image_height` image shown
    /// in a `view_width` x `view_height` viewport.
    pub fn new(view_width: f64, view_height: f64, image_width: f64, image_height: f64) -> Result<Self> {
        if view_width <= 0.0 || view_height <= 0.0 || image_width <= 0.0 || image_height <= 0.0 {
            return Err(ScanError::EmptyBuffer(format!(
                "viewport mapping needs positive dimensions (view {view_width}x{view_height}, image {image_width}x{image_height})"
            )));
        }

        let scale = (view_width / image_width).min(view_height / image_height);
        let offset_x = (view_width - scale * image_width) / 2.0;
        let offset_y = (view_height - scale * image_height) / 2.0;

        Ok(Self {
            image_width,
            image_height,
            scale,
            offset_x,
            offset_y,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Map an image-space point to display space.
    pub fn to_display(&self, p: Point2D) -> Point2D {
        Point2D::new(
            self.offset_x + self.scale * p.x,
            self.offset_y + self.scale * p.y,
        )
    }

    /// Map a display-space point back to image space, clamped to the image
    /// bounds.
    pub fn to_image(&self, p: Point2D) -> Point2D {
        let unclamped = Point2D::new(
            (p.x - self.offset_x) / self.scale,
            (p.y - self.offset_y) / self.scale,
        );
        unclamped.clamped(self.image_width, self.image_height)
    }
}
