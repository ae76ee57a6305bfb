// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion orchestrator — validate, stage, convert, store, clean up.
//
// Every request is independent: the service holds only its immutable
// configuration and the two directory stores. Two uploads that sanitise to
// the same name share a staging path and an output path; whichever finishes
// last wins.

use bildwerk_core::config::{OutputNaming, UnknownOperationPolicy};
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::{
    ConversionOperation, ConversionReceipt, ConvertedArtifact, UploadedImage, file_base_name,
};
use bildwerk_core::validation::{is_allowed_with, sanitize_filename};
use bildwerk_core::ConverterConfig;
use bildwerk_document::FormatConverter;
use bildwerk_storage::{FileStore, StagedUpload, hash_bytes, short_digest, verify_hash};
use tracing::{info, instrument, warn};

/// Entry point for one upload-and-convert request.
pub struct ConversionService {
    config: ConverterConfig,
    staging: FileStore,
    output: FileStore,
    converter: FormatConverter,
}

impl ConversionService {
    /// Build the service and create its directories.
    ///
    /// Fails if the configuration is invalid or either directory cannot be
    /// created; callers should treat that as fatal at startup.
    pub fn new(config: ConverterConfig) -> Result<Self> {
        config.validate()?;
        config.ensure_directories()?;
        let staging = FileStore::open(&config.staging_dir)?;
        let output = FileStore::open(&config.output_dir)?;
        let converter = FormatConverter::from_config(&config);

        info!(
            staging = %staging.root().display(),
            output = %output.root().display(),
            "conversion service ready"
        );

        Ok(Self {
            config,
            staging,
            output,
            converter,
        })
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn staging(&self) -> &FileStore {
        &self.staging
    }

    pub fn output(&self) -> &FileStore {
        &self.output
    }

    /// Convert one upload.
    ///
    /// Nothing touches the filesystem until the upload and operation have
    /// been validated. Once staged, the original is removed again whether
    /// conversion succeeds or fails; a failed removal after a successful
    /// conversion is reported in [`ConversionReceipt::cleanup_warning`].
    #[instrument(skip(self, upload, operation), fields(filename, operation))]
    pub fn handle(
        &self,
        upload: Option<UploadedImage>,
        operation: Option<&str>,
    ) -> Result<ConversionReceipt> {
        let upload = upload
            .ok_or_else(|| BildwerkError::Validation("no file was uploaded".into()))?;
        tracing::Span::current().record("filename", upload.filename.as_str());

        let safe_name = self.accept_upload(&upload)?;
        let operation = self.resolve_operation(operation)?;

        let staged = StagedUpload::create(&self.staging, &safe_name, &upload.content)?;
        let outcome = self.convert_and_store(&staged, &safe_name, operation);
        let cleanup = staged.release();

        settle(outcome, cleanup)
    }

    /// Check the upload against the allow-set and return its sanitised name.
    fn accept_upload(&self, upload: &UploadedImage) -> Result<String> {
        if upload.filename.is_empty() {
            return Err(BildwerkError::Validation("the upload has no filename".into()));
        }
        if !is_allowed_with(&upload.filename, &self.config.allowed_extensions) {
            return Err(BildwerkError::Validation(format!(
                "'{}' is not an accepted image type",
                upload.filename
            )));
        }
        if upload.content.is_empty() {
            return Err(BildwerkError::Validation(format!(
                "'{}' is empty",
                upload.filename
            )));
        }

        let safe_name = sanitize_filename(&upload.filename);
        if !is_allowed_with(&safe_name, &self.config.allowed_extensions) {
            return Err(BildwerkError::Validation(format!(
                "'{}' has no usable name once unsafe characters are removed",
                upload.filename
            )));
        }
        Ok(safe_name)
    }

    fn resolve_operation(&self, operation: Option<&str>) -> Result<ConversionOperation> {
        tracing::Span::current().record("operation", operation.unwrap_or("<none>"));
        match self.config.unknown_operation {
            UnknownOperationPolicy::Fallback => Ok(ConversionOperation::parse(operation)),
            UnknownOperationPolicy::Reject => operation
                .and_then(ConversionOperation::parse_strict)
                .ok_or_else(|| {
                    BildwerkError::Validation(format!(
                        "unknown operation '{}'",
                        operation.unwrap_or("")
                    ))
                }),
        }
    }

    fn convert_and_store(
        &self,
        staged: &StagedUpload,
        safe_name: &str,
        operation: ConversionOperation,
    ) -> Result<ConversionReceipt> {
        let artifact = self
            .converter
            .convert(staged.path(), file_base_name(safe_name), operation)?;
        let sha256 = hash_bytes(&artifact.content);
        let name = self.output_name(&artifact, &sha256);
        let output_path = self.output.put(&name, &artifact.content)?;
        // The staged original is only released once the artifact reads back intact.
        verify_hash(&self.output.get(&output_path)?, &sha256)?;

        Ok(ConversionReceipt {
            artifact,
            output_path,
            sha256,
            cleanup_warning: None,
        })
    }

    fn output_name(&self, artifact: &ConvertedArtifact, sha256: &str) -> String {
        let derived = &artifact.derived_filename;
        match self.config.output_naming {
            OutputNaming::Derived => derived.clone(),
            OutputNaming::Timestamped => {
                let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%3fZ").to_string();
                tag_filename(derived, &stamp)
            }
            OutputNaming::ContentAddressed => tag_filename(derived, short_digest(sha256)),
        }
    }
}

/// Combine the conversion outcome with the result of removing the staged
/// original. A conversion error always wins; a cleanup error after success
/// becomes a warning on the receipt.
fn settle(
    outcome: Result<ConversionReceipt>,
    cleanup: Result<()>,
) -> Result<ConversionReceipt> {
    match (outcome, cleanup) {
        (Ok(receipt), Ok(())) => {
            info!(
                artifact = receipt.artifact_name(),
                sha256 = %receipt.sha256,
                "conversion complete"
            );
            Ok(receipt)
        }
        (Ok(mut receipt), Err(cleanup_err)) => {
            warn!(
                artifact = receipt.artifact_name(),
                error = %cleanup_err,
                "conversion complete but staged upload was not removed"
            );
            receipt.cleanup_warning = Some(cleanup_err.to_string());
            Ok(receipt)
        }
        (Err(err), Ok(())) => {
            warn!(error = %err, "conversion failed");
            Err(err)
        }
        (Err(err), Err(cleanup_err)) => {
            warn!(
                error = %err,
                cleanup_error = %cleanup_err,
                "conversion failed and staged upload was not removed"
            );
            Err(err)
        }
    }
}

/// Insert `-{tag}` before the final extension of `filename`.
fn tag_filename(filename: &str, tag: &str) -> String {
    match filename.rsplit_once('.') {
        Some((base, extension)) => format!("{base}-{tag}.{extension}"),
        None => format!("{filename}-{tag}"),
    }
}
