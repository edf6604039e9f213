// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-interact — Viewport mapping and interactive corner correction.

pub mod session;
pub mod viewport;

pub use session::{CorrectionSession, DragState};
pub use viewport::Viewport;
