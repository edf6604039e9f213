// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the scanning flow.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity levels drive how a caller presents the failure.

use crate::error::ScanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Momentary hiccup — retrying the same operation may succeed.
    Transient,
    /// User must do something (move a corner, pick another photo).
    ActionRequired,
    /// Cannot be fixed by retrying or user action — bad file, bad settings.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the system should auto-retry.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `ScanError` into a `HumanError` anyone can understand.
pub fn humanize_error(err: &ScanError) -> HumanError {
    match err {
        ScanError::DegenerateQuadrilateral(_) => HumanError {
            message: "The four corners don't outline a page.".into(),
            suggestion: "Drag the corner markers apart so they sit on the four corners of the document, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ScanError::EmptyBuffer(_) => HumanError {
            message: "This picture is empty.".into(),
            suggestion: "The selected image has no pixels to work with. Pick a different photo.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::InvalidConfig(detail) => HumanError {
            message: "One of the scan settings is not valid.".into(),
            suggestion: format!("Check the settings and try again ({detail})."),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::ImageError(_) => HumanError {
            message: "We couldn't read this picture.".into(),
            suggestion: "The file may be damaged or in a format we don't support. Try a JPEG or PNG photo.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ScanError::Worker(_) => HumanError {
            message: "Scanning was interrupted.".into(),
            suggestion: "Something went wrong in the background. Try the scan again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::Io(_) => HumanError {
            message: "We couldn't read or write a file.".into(),
            suggestion: "Check that the file exists and that there is free space, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ScanError::Serialization(_) => HumanError {
            message: "We couldn't read the saved corner data.".into(),
            suggestion: "The corners file is damaged. Run detection again to produce a fresh one.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_quad_asks_user_to_fix_corners() {
        let err = ScanError::DegenerateQuadrilateral("coincident corners".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
        assert!(human.suggestion.contains("corner"));
    }

    #[test]
    fn worker_failure_is_retriable() {
        let err = ScanError::Worker("join error".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }
}
