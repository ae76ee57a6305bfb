// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-document — Conversion back end for the Bildwerk engine.
//
// Provides image decoding and re-encoding (grayscale, PNG), single-page image
// PDFs, DOCX documents with an embedded picture, and XLSX/CSV metadata
// reports, all behind the `FormatConverter` dispatch.

pub mod convert;
pub mod image;
pub mod office;
pub mod pdf;
pub mod report;

// Re-export the primary structs so callers can use `bildwerk_document::FormatConverter` etc.
pub use convert::FormatConverter;
pub use image::processor::ImageProcessor;
pub use office::{DocxWriter, XlsxWriter};
pub use pdf::writer::PdfWriter;
pub use report::MetadataReport;
