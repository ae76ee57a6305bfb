// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Format conversion dispatch.
//
// One branch per `ConversionOperation`: the image either gets wrapped (PDF,
// DOCX), described (XLSX, CSV) or re-encoded (grayscale / plain PNG). The
// converter holds only immutable layout options, so the same bytes, name and
// operation always give the same artifact.

use std::path::Path;

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::{ConversionOperation, ConvertedArtifact, file_base_name};
use bildwerk_core::ConverterConfig;
use tracing::{debug, info, instrument};

use crate::image::ImageProcessor;
use crate::office::DocxWriter;
use crate::pdf::PdfWriter;
use crate::report::MetadataReport;

/// Turns one image into one artifact.
pub struct FormatConverter {
    pdf: PdfWriter,
    docx: DocxWriter,
}

impl Default for FormatConverter {
    fn default() -> Self {
        Self::from_config(&ConverterConfig::default())
    }
}

impl FormatConverter {
    pub fn new(docx_image_width_inches: f32, pdf_dpi: f32) -> Self {
        Self {
            pdf: PdfWriter::new(pdf_dpi),
            docx: DocxWriter::new(docx_image_width_inches),
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(config.docx_image_width_inches, config.pdf_dpi)
    }

    /// Convert a staged file. The source filename reported in metadata is the
    /// staged file's own name; `base_name` seeds the output filename.
    #[instrument(skip(self), fields(path = %staged_path.display()))]
    pub fn convert(
        &self,
        staged_path: &Path,
        base_name: &str,
        operation: ConversionOperation,
    ) -> Result<ConvertedArtifact> {
        let bytes = std::fs::read(staged_path)?;
        let source_filename = staged_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                BildwerkError::Validation(format!(
                    "staged path {} has no usable file name",
                    staged_path.display()
                ))
            })?;
        self.render(&bytes, source_filename, base_name, operation)
    }

    /// Convert in-memory bytes. The output base name is `source_filename`
    /// without its final extension.
    pub fn convert_bytes(
        &self,
        bytes: &[u8],
        source_filename: &str,
        operation: ConversionOperation,
    ) -> Result<ConvertedArtifact> {
        self.render(bytes, source_filename, file_base_name(source_filename), operation)
    }

    fn render(
        &self,
        bytes: &[u8],
        source_filename: &str,
        base_name: &str,
        operation: ConversionOperation,
    ) -> Result<ConvertedArtifact> {
        let derived_filename = operation.derive_filename(base_name);
        info!(
            source = source_filename,
            target = %derived_filename,
            ?operation,
            "converting image"
        );

        let content = match operation {
            ConversionOperation::ToPdf => self.pdf.create_from_image(bytes)?,
            ConversionOperation::ToDocx => self.docx.create_from_image(bytes)?,
            ConversionOperation::ToXlsx => {
                let processor = ImageProcessor::from_bytes(bytes)?;
                MetadataReport::new(source_filename, &processor).to_xlsx()?
            }
            ConversionOperation::ToCsv => {
                let processor = ImageProcessor::from_bytes(bytes)?;
                MetadataReport::new(source_filename, &processor).to_csv()?
            }
            ConversionOperation::Grayscale => ImageProcessor::from_bytes(bytes)?
                .grayscale()
                .to_png_bytes()?,
            ConversionOperation::PassthroughPng => {
                ImageProcessor::from_bytes(bytes)?.to_png_bytes()?
            }
        };

        debug!(bytes = content.len(), "conversion produced artifact");
        Ok(ConvertedArtifact {
            derived_filename,
            content,
            media_kind: operation.media_kind(),
        })
    }
}
