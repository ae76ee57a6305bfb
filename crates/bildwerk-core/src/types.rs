// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Bildwerk conversion engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// An upload as handed over by the caller: declared filename plus raw bytes.
///
/// Lives only for the duration of one conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub filename: String,
    pub content: Vec<u8>,
}

impl UploadedImage {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// The conversions the engine knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversionOperation {
    /// Single-page PDF wrapping the image without quality loss.
    ToPdf,
    /// Word-processor document with a heading and the embedded image.
    ToDocx,
    /// Spreadsheet metadata report.
    ToXlsx,
    /// CSV metadata report.
    ToCsv,
    /// Single-channel luminance PNG.
    Grayscale,
    /// PNG re-encode with no pixel change. Also the fallback for any
    /// operation string the engine does not recognise.
    PassthroughPng,
}

impl ConversionOperation {
    /// Every operation, in the order they are listed to users.
    pub const ALL: [ConversionOperation; 6] = [
        Self::ToPdf,
        Self::ToDocx,
        Self::ToXlsx,
        Self::ToCsv,
        Self::Grayscale,
        Self::PassthroughPng,
    ];

    /// Resolve a caller-supplied operation string.
    ///
    /// Matching is exact (case-sensitive). Unknown or missing operations fall
    /// through to [`ConversionOperation::PassthroughPng`].
    pub fn parse(operation: Option<&str>) -> Self {
        operation
            .and_then(Self::parse_strict)
            .unwrap_or(Self::PassthroughPng)
    }

    /// Resolve an operation string, returning `None` for anything that is not
    /// one of the named operations.
    pub fn parse_strict(operation: &str) -> Option<Self> {
        match operation {
            "pdf" => Some(Self::ToPdf),
            "docx" => Some(Self::ToDocx),
            "xlsx" => Some(Self::ToXlsx),
            "csv" => Some(Self::ToCsv),
            "grayscale" => Some(Self::Grayscale),
            _ => None,
        }
    }

    /// The operation string a caller sends to select this conversion.
    /// `PassthroughPng` has no dedicated keyword; `"png"` is shown for it.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::ToPdf => "pdf",
            Self::ToDocx => "docx",
            Self::ToXlsx => "xlsx",
            Self::ToCsv => "csv",
            Self::Grayscale => "grayscale",
            Self::PassthroughPng => "png",
        }
    }

    /// Kind of artifact this operation produces.
    pub fn media_kind(&self) -> MediaKind {
        match self {
            Self::ToPdf => MediaKind::Pdf,
            Self::ToDocx => MediaKind::Docx,
            Self::ToXlsx => MediaKind::Xlsx,
            Self::ToCsv => MediaKind::Csv,
            Self::Grayscale | Self::PassthroughPng => MediaKind::Png,
        }
    }

    /// Output filename for a source with the given base name.
    pub fn derive_filename(&self, base_name: &str) -> String {
        match self {
            Self::Grayscale | Self::PassthroughPng => format!("{base_name}_edited.png"),
            other => format!("{base_name}.{}", other.media_kind().extension()),
        }
    }
}

/// Output artifact formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Pdf,
    Docx,
    Xlsx,
    Csv,
    Png,
}

impl MediaKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Csv => "text/csv",
            Self::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Png => "png",
        }
    }
}

/// The result of one conversion, before it is written to the output store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedArtifact {
    /// Filename the artifact is stored under, derived from the source name.
    pub derived_filename: String,
    pub content: Vec<u8>,
    pub media_kind: MediaKind,
}

/// What the orchestrator hands back after a successful request.
#[derive(Debug, Clone)]
pub struct ConversionReceipt {
    pub artifact: ConvertedArtifact,
    /// Where the artifact now lives inside the output directory.
    pub output_path: PathBuf,
    /// SHA-256 of the artifact bytes, lowercase hex.
    pub sha256: String,
    /// Set when the staged original could not be removed. The conversion
    /// itself still succeeded.
    pub cleanup_warning: Option<String>,
}

impl ConversionReceipt {
    /// Filename resolvable under the output directory.
    pub fn artifact_name(&self) -> &str {
        self.output_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.artifact.derived_filename)
    }
}

/// The part of `filename` before its last `.`; the whole name when there is
/// no dot.
pub fn file_base_name(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map(|(base, _)| base)
        .unwrap_or(filename)
}
