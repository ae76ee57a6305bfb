// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildwerk.

use thiserror::Error;

/// Top-level error type for all Bildwerk operations.
#[derive(Debug, Error)]
pub enum BildwerkError {
    // -- Request errors --
    /// Missing upload, empty filename, or an extension outside the allow-set.
    #[error("invalid upload: {0}")]
    Validation(String),

    // -- Conversion errors --
    #[error("image could not be decoded: {0}")]
    Decode(String),

    /// The image decoded fine but cannot be carried into the requested target
    /// format without re-encoding it first.
    #[error("unsupported image for this conversion: {0}")]
    UnsupportedImage(String),

    #[error("failed to write output: {0}")]
    Encode(String),

    // -- Storage / configuration --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored artifact read back with different content than was written.
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildwerkError>;
