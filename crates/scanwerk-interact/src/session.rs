// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive corner-correction session. Owns the current corners and the
// drag state; moves operate on in-memory state only and never re-run
// detection.

use scanwerk_core::{CornerQuad, Point2D, SessionId};
use tracing::debug;

use crate::viewport::Viewport;

/// Default grab radius around a corner, in working-image pixels.
const GRAB_RADIUS_PX: f64 = 20.0;

/// The corner currently being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Index into the canonical corner order.
    pub index: usize,
    /// Last applied position, in working-image space.
    pub last_position: Point2D,
}

/// Mutable state for one round of interactive corner correction.
///
/// Created when detection (or its fallback) completes; discarded once the
/// user commits to rectification or abandons the image. All stored
/// coordinates are working-image space; display-space input is converted
/// through the `Viewport` passed to each operation.
#[derive(Debug, Clone)]
pub struct CorrectionSession {
    id: SessionId,
    image_width: f64,
    image_height: f64,
    corners: CornerQuad,
    drag: Option<DragState>,
    grab_radius: f64,
}

impl CorrectionSession {
    /// Start a session for a working image of the given size, seeded with
    /// the detected (or fallback) corners.
    pub fn new(image_width: f64, image_height: f64, initial_corners: CornerQuad) -> Self {
        let id = SessionId::new();
        debug!(%id, image_width, image_height, "correction session started");
        Self {
            id,
            image_width,
            image_height,
            corners: initial_corners,
            drag: None,
            grab_radius: GRAB_RADIUS_PX,
        }
    }

    /// Override the default grab radius (working-image pixels).
    pub fn with_grab_radius(mut self, radius: f64) -> Self {
        self.grab_radius = radius;
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The current corners, in working-image space.
    pub fn corners(&self) -> CornerQuad {
        self.corners
    }

    /// The corner currently being dragged, if any.
    pub fn drag(&self) -> Option<DragState> {
        self.drag
    }

    /// Try to grab the corner nearest to a display-space point.
    ///
    /// The point is mapped into image space and the nearest corner is
    /// selected if it lies within the grab radius; otherwise the selection
    /// is left empty. Returns the selected index.
    pub fn select_near(&mut self, display_point: Point2D, viewport: &Viewport) -> Option<usize> {
        let image_point = viewport.to_image(display_point);
        let (index, distance) = self.corners.nearest_corner(image_point);

        if distance <= self.grab_radius {
            self.drag = Some(DragState {
                index,
                last_position: image_point,
            });
            debug!(index, distance, "corner grabbed");
            Some(index)
        } else {
            self.drag = None;
            None
        }
    }

    /// Move the grabbed corner to a new display-space position.
    ///
    /// The position is mapped into image space and clamped to the image
    /// bounds before overwriting the corner. Returns true when a corner
    /// moved, so the caller knows to redraw the overlay (a cheap draw, not
    /// a re-detection).
    pub fn move_selected(&mut self, display_point: Point2D, viewport: &Viewport) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };

        let image_point = viewport
            .to_image(display_point)
            .clamped(self.image_width, self.image_height);
        self.corners.set(drag.index, image_point);
        self.drag = Some(DragState {
            index: drag.index,
            last_position: image_point,
        });
        true
    }

    /// Let go of the grabbed corner.
    pub fn release(&mut self) {
        self.drag = None;
    }

    /// Discard manual edits and restore the deterministic inset default for
    /// this session's image size.
    pub fn reset(&mut self) {
        debug!(id = %self.id, "session reset to default corners");
        self.corners = CornerQuad::default_inset(self.image_width, self.image_height);
        self.drag = None;
    }

    /// Finish the session, projecting the corners into original-image
    /// space. `scale_factor` is the ratio recorded when the working copy
    /// was made.
    pub fn commit(self, scale_factor: f64) -> CornerQuad {
        self.corners.to_original_space(scale_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_and_viewport() -> (CorrectionSession, Viewport) {
        // 1000x800 working image shown 1:1 in an equally sized viewport,
        // so display space and image space coincide.
        let corners = CornerQuad::default_inset(1000.0, 800.0);
        let session = CorrectionSession::new(1000.0, 800.0, corners);
        let viewport = Viewport::new(1000.0, 800.0, 1000.0, 800.0).expect("viewport");
        (session, viewport)
    }

    #[test]
    fn select_near_grabs_a_close_corner() {
        let (mut session, viewport) = session_and_viewport();

        // Top-left default corner is at (100, 80); 10 px away qualifies.
        let grabbed = session.select_near(Point2D::new(106.0, 88.0), &viewport);
        assert_eq!(grabbed, Some(scanwerk_core::TOP_LEFT));
        assert!(session.drag().is_some());
    }

    #[test]
    fn grab_radius_is_tunable() {
        let (session, viewport) = session_and_viewport();
        let mut wide = session.with_grab_radius(60.0);

        // 50 px from the top-left corner: outside the default radius, inside
        // the widened one.
        let grabbed = wide.select_near(Point2D::new(150.0, 80.0), &viewport);
        assert_eq!(grabbed, Some(scanwerk_core::TOP_LEFT));
    }

    #[test]
    fn each_session_gets_its_own_id() {
        let corners = CornerQuad::default_inset(100.0, 100.0);
        let a = CorrectionSession::new(100.0, 100.0, corners);
        let b = CorrectionSession::new(100.0, 100.0, corners);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn select_near_ignores_distant_points() {
        let (mut session, viewport) = session_and_viewport();

        let grabbed = session.select_near(Point2D::new(500.0, 400.0), &viewport);
        assert_eq!(grabbed, None);
        assert!(session.drag().is_none());
    }

    #[test]
    fn move_selected_updates_the_grabbed_corner() {
        let (mut session, viewport) = session_and_viewport();
        session.select_near(Point2D::new(100.0, 80.0), &viewport);

        let moved = session.move_selected(Point2D::new(140.0, 60.0), &viewport);
        assert!(moved);
        assert_eq!(session.corners().top_left(), Point2D::new(140.0, 60.0));

        // The drag state follows the corner.
        assert_eq!(session.drag().unwrap().last_position, Point2D::new(140.0, 60.0));
    }

    #[test]
    fn move_without_selection_is_a_no_op() {
        let (mut session, viewport) = session_and_viewport();
        let before = session.corners();

        assert!(!session.move_selected(Point2D::new(300.0, 300.0), &viewport));
        assert_eq!(session.corners(), before);
    }

    #[test]
    fn moves_never_leave_the_image_bounds() {
        let (mut session, viewport) = session_and_viewport();
        session.select_near(Point2D::new(100.0, 80.0), &viewport);

        session.move_selected(Point2D::new(-250.0, -99.0), &viewport);
        assert_eq!(session.corners().top_left(), Point2D::new(0.0, 0.0));

        session.move_selected(Point2D::new(5000.0, 5000.0), &viewport);
        assert_eq!(session.corners().top_left(), Point2D::new(1000.0, 800.0));
    }

    #[test]
    fn release_clears_the_drag_state() {
        let (mut session, viewport) = session_and_viewport();
        session.select_near(Point2D::new(100.0, 80.0), &viewport);
        session.release();

        assert!(session.drag().is_none());
        assert!(!session.move_selected(Point2D::new(200.0, 200.0), &viewport));
    }

    #[test]
    fn reset_restores_the_default_quad_after_any_edits() {
        let (mut session, viewport) = session_and_viewport();

        session.select_near(Point2D::new(100.0, 80.0), &viewport);
        session.move_selected(Point2D::new(333.0, 444.0), &viewport);
        session.release();
        session.select_near(Point2D::new(900.0, 720.0), &viewport);
        session.move_selected(Point2D::new(555.0, 655.0), &viewport);

        session.reset();
        assert_eq!(session.corners(), CornerQuad::default_inset(1000.0, 800.0));
        assert!(session.drag().is_none());
    }

    #[test]
    fn commit_projects_corners_into_original_space() {
        let (mut session, viewport) = session_and_viewport();
        session.select_near(Point2D::new(100.0, 80.0), &viewport);
        session.move_selected(Point2D::new(120.0, 90.0), &viewport);

        let committed = session.commit(2.5);
        assert_eq!(committed.top_left(), Point2D::new(300.0, 225.0));
    }

    #[test]
    fn display_coordinates_are_mapped_through_the_viewport() {
        // 1000x800 image in a 500x400 viewport: scale 0.5, no margins.
        let corners = CornerQuad::default_inset(1000.0, 800.0);
        let mut session = CorrectionSession::new(1000.0, 800.0, corners);
        let viewport = Viewport::new(500.0, 400.0, 1000.0, 800.0).expect("viewport");

        // The top-left corner (100, 80) displays at (50, 40).
        assert_eq!(session.select_near(Point2D::new(50.0, 40.0), &viewport), Some(0));

        session.move_selected(Point2D::new(100.0, 100.0), &viewport);
        assert_eq!(session.corners().top_left(), Point2D::new(200.0, 200.0));
    }
}
