// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Converter configuration.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BildwerkError, Result};
use crate::validation::DEFAULT_ALLOWED_EXTENSIONS;

/// What to do with an operation string that names no known conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownOperationPolicy {
    /// Treat it as a plain PNG re-encode.
    #[default]
    Fallback,
    /// Refuse the request with a validation error.
    Reject,
}

/// How artifacts are named inside the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputNaming {
    /// `{base}.{ext}` / `{base}_edited.png`. Same-named uploads overwrite.
    #[default]
    Derived,
    /// Derived name with a UTC timestamp inserted before the extension.
    Timestamped,
    /// Derived name with a short SHA-256 prefix of the artifact inserted
    /// before the extension.
    ContentAddressed,
}

/// Immutable settings handed to the conversion service at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Transient home of uploaded originals.
    pub staging_dir: PathBuf,
    /// Where finished artifacts are written.
    pub output_dir: PathBuf,
    /// Accepted upload extensions, lower-case, without the dot.
    pub allowed_extensions: BTreeSet<String>,
    pub unknown_operation: UnknownOperationPolicy,
    pub output_naming: OutputNaming,
    /// Display width of the embedded image in DOCX output.
    pub docx_image_width_inches: f32,
    /// Resolution used to size the PDF page from the image's pixel size.
    pub pdf_dpi: f32,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("static/processed"),
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            unknown_operation: UnknownOperationPolicy::Fallback,
            output_naming: OutputNaming::Derived,
            docx_image_width_inches: 5.0,
            pdf_dpi: 96.0,
        }
    }
}

impl ConverterConfig {
    /// Load settings from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Persist settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject settings the converter cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.allowed_extensions.is_empty() {
            return Err(BildwerkError::Config(
                "allowed_extensions must not be empty".into(),
            ));
        }
        if !(self.docx_image_width_inches.is_finite() && self.docx_image_width_inches > 0.0) {
            return Err(BildwerkError::Config(format!(
                "docx_image_width_inches must be positive, got {}",
                self.docx_image_width_inches
            )));
        }
        if !(self.pdf_dpi.is_finite() && self.pdf_dpi > 0.0) {
            return Err(BildwerkError::Config(format!(
                "pdf_dpi must be positive, got {}",
                self.pdf_dpi
            )));
        }
        Ok(())
    }

    /// Create the staging and output directories if they are absent.
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.staging_dir)?;
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_upload_form() {
        let config = ConverterConfig::default();
        assert_eq!(config.staging_dir, PathBuf::from("uploads"));
        assert_eq!(config.output_dir, PathBuf::from("static/processed"));
        assert_eq!(config.allowed_extensions.len(), 5);
        assert!(config.allowed_extensions.contains("jfif"));
        assert_eq!(config.unknown_operation, UnknownOperationPolicy::Fallback);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bildwerk.json");
        std::fs::write(&path, r#"{ "unknown_operation": "reject", "pdf_dpi": 72.0 }"#)
            .expect("write config");

        let config = ConverterConfig::load(&path).expect("load config");
        assert_eq!(config.unknown_operation, UnknownOperationPolicy::Reject);
        assert_eq!(config.pdf_dpi, 72.0);
        assert_eq!(config.docx_image_width_inches, 5.0);
        assert_eq!(config.output_naming, OutputNaming::Derived);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bildwerk.json");
        let config = ConverterConfig {
            output_naming: OutputNaming::ContentAddressed,
            ..ConverterConfig::default()
        };
        config.save(&path).expect("save");
        assert_eq!(ConverterConfig::load(&path).expect("load"), config);
    }

    #[test]
    fn empty_allow_set_is_rejected() {
        let config = ConverterConfig {
            allowed_extensions: BTreeSet::new(),
            ..ConverterConfig::default()
        };
        assert!(matches!(config.validate(), Err(BildwerkError::Config(_))));
    }

    #[test]
    fn ensure_directories_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ConverterConfig {
            staging_dir: dir.path().join("uploads"),
            output_dir: dir.path().join("static").join("processed"),
            ..ConverterConfig::default()
        };
        config.ensure_directories().expect("first");
        config.ensure_directories().expect("second");
        assert!(config.staging_dir.is_dir());
        assert!(config.output_dir.is_dir());
    }
}
