// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk — Core types, errors, and configuration shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use config::{Binarization, DetectionConfig, ScanConfig, StyleConfig};
pub use error::{Result, ScanError};
pub use types::*;
