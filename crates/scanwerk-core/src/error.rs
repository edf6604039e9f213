// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanwerk.

use thiserror::Error;

/// Top-level error type for all Scanwerk operations.
///
/// A failed page detection is deliberately absent: detection resolves
/// internally to the deterministic fallback quadrilateral and reports a
/// degraded result instead of an error.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Geometry errors --
    #[error("degenerate quadrilateral: {0}")]
    DegenerateQuadrilateral(String),

    // -- Buffer / numeric errors --
    #[error("empty or zero-area buffer: {0}")]
    EmptyBuffer(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Image decode/encode (loader and CLI concern) --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Async workers --
    #[error("worker task failed: {0}")]
    Worker(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;
