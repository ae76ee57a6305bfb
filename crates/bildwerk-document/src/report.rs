// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image metadata report — filename and pixel dimensions as a two-column
// table, rendered as CSV or XLSX.

use bildwerk_core::error::BildwerkError;
use tracing::instrument;

use crate::image::ImageProcessor;
use crate::office::{Cell, XlsxWriter};

/// Column headings of the report.
pub const HEADER: [&str; 2] = ["Attribute", "Value"];

/// Facts about one uploaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataReport {
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

impl MetadataReport {
    pub fn new(filename: impl Into<String>, processor: &ImageProcessor) -> Self {
        Self {
            filename: filename.into(),
            width: processor.width(),
            height: processor.height(),
        }
    }

    /// The three data rows, in report order.
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        vec![
            vec![Cell::from("Filename"), Cell::from(self.filename.as_str())],
            vec![Cell::from("Width"), Cell::from(self.width)],
            vec![Cell::from("Height"), Cell::from(self.height)],
        ]
    }

    #[instrument(skip(self), fields(filename = %self.filename))]
    pub fn to_csv(&self) -> Result<Vec<u8>, BildwerkError> {
        let csv_error = |err: csv::Error| BildwerkError::Encode(format!("CSV write failed: {err}"));

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADER).map_err(csv_error)?;
        for row in self.rows() {
            writer
                .write_record(row.iter().map(Cell::display))
                .map_err(csv_error)?;
        }
        writer
            .into_inner()
            .map_err(|err| BildwerkError::Encode(format!("CSV flush failed: {err}")))
    }

    pub fn to_xlsx(&self) -> Result<Vec<u8>, BildwerkError> {
        XlsxWriter::create(&HEADER, &self.rows())
    }
}
