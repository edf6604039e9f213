// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-pipeline — Async orchestration of detection, correction, and
// rendering.

pub mod service;

pub use service::ScanService;
