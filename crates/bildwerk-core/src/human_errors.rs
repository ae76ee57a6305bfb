// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the upload form.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives whether the caller offers a retry or sends the user back
// to pick another file.

use crate::error::BildwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Disk full, permissions flapping — trying again may work.
    Transient,
    /// User must do something (pick another file, choose another format).
    ActionRequired,
    /// Nothing the user can change fixes this — broken install, bad config.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether resubmitting the same request could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `BildwerkError` into a `HumanError` for the upload form.
pub fn humanize_error(err: &BildwerkError) -> HumanError {
    match err {
        BildwerkError::Validation(detail) => HumanError {
            message: "Please upload a valid image.".into(),
            suggestion: format!(
                "Choose a PNG, JPG, JPEG, GIF or JFIF file and try again. ({detail})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BildwerkError::Decode(_) => HumanError {
            message: "We couldn't read that image.".into(),
            suggestion: "The file may be damaged or not really an image. Try opening it on your device and saving it again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BildwerkError::UnsupportedImage(detail) => HumanError {
            message: "This image can't be converted to that format.".into(),
            suggestion: format!(
                "Try a different output format, or save the image as a JPG first. ({detail})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BildwerkError::Encode(detail) => HumanError {
            message: "Something went wrong while creating your file.".into(),
            suggestion: format!("Please try again. If this keeps happening, try another format. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        BildwerkError::Io(io_err) => humanize_io_error(io_err),

        BildwerkError::IntegrityMismatch { .. } => HumanError {
            message: "Your converted file was damaged while being saved.".into(),
            suggestion: "Please try again. If this keeps happening, contact the site administrator.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        BildwerkError::Config(detail) => HumanError {
            message: "The converter isn't set up correctly.".into(),
            suggestion: format!("Please contact the site administrator. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        BildwerkError::Serialization(detail) => HumanError {
            message: "The converter settings file couldn't be read.".into(),
            suggestion: format!("Please contact the site administrator. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

fn humanize_io_error(err: &std::io::Error) -> HumanError {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::PermissionDenied => HumanError {
            message: "Your file couldn't be saved on the server.".into(),
            suggestion: "Please contact the site administrator — the upload folders are not writable.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
        ErrorKind::NotFound => HumanError {
            message: "Your upload went missing before it could be converted.".into(),
            suggestion: "Please upload the file again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
        _ => HumanError {
            message: "The server had trouble handling your file.".into(),
            suggestion: format!("Please try again in a moment. (Detail: {err})"),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
