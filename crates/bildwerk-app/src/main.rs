// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — Image conversion engine
//
// Entry point. Initialises logging, loads configuration, and runs one
// command against the conversion service.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use bildwerk_app::ConversionService;
use bildwerk_app::services::config_dir::load_config;
use bildwerk_core::error::BildwerkError;
use bildwerk_core::human_errors::humanize_error;
use bildwerk_core::types::{ConversionOperation, UploadedImage};
use bildwerk_core::validation::sanitize_filename;
use bildwerk_core::{ConverterConfig, is_allowed_with};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bildwerk", version, about = "Convert uploaded images to PDF, DOCX, XLSX, CSV or PNG")]
struct Cli {
    /// Settings file (JSON). Defaults to ./bildwerk.json, then the user config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the staging directory for uploaded originals.
    #[arg(long, global = true)]
    staging_dir: Option<PathBuf>,

    /// Override the directory finished artifacts are written to.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert one image file.
    Convert {
        file: PathBuf,

        /// One of: pdf, docx, xlsx, csv, grayscale. Anything else re-encodes as PNG.
        #[arg(short, long)]
        operation: Option<String>,

        /// Filename to present as the upload name (defaults to the file's own name).
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Report whether a filename would be accepted, and its sanitised form.
    Check { filename: String },
    /// List the recognised operation strings.
    Operations,
    /// Write the effective settings to a JSON file as a starting point.
    InitConfig {
        path: PathBuf,

        /// Replace the file if it already exists.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = settings(&cli)?;

    match cli.command {
        Command::Convert {
            file,
            operation,
            name,
        } => {
            let content =
                std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let filename = match name {
                Some(name) => name,
                None => file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            };

            let service = ConversionService::new(config)?;
            let receipt = service.handle(
                Some(UploadedImage::new(filename, content)),
                operation.as_deref(),
            )?;

            println!("{}", receipt.artifact_name());
            println!("  path:   {}", receipt.output_path.display());
            println!("  type:   {}", receipt.artifact.media_kind.mime_type());
            println!("  sha256: {}", receipt.sha256);
            if let Some(warning) = &receipt.cleanup_warning {
                eprintln!("warning: staged upload was not removed: {warning}");
            }
        }
        Command::Check { filename } => {
            let allowed = is_allowed_with(&filename, &config.allowed_extensions);
            let sanitised = sanitize_filename(&filename);
            println!("allowed:   {}", if allowed { "yes" } else { "no" });
            println!("sanitised: {sanitised}");
        }
        Command::Operations => {
            for operation in ConversionOperation::ALL {
                println!(
                    "{:<10} -> {}",
                    operation.keyword(),
                    operation.derive_filename("photo")
                );
            }
        }
        Command::InitConfig { path, force } => {
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to replace it)", path.display());
            }
            config.save(&path)?;
            tracing::info!(path = %path.display(), "settings written");
            println!("{}", path.display());
        }
    }
    Ok(())
}

/// Configuration from file, then command-line overrides.
fn settings(cli: &Cli) -> anyhow::Result<ConverterConfig> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = &cli.staging_dir {
        config.staging_dir = dir.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<BildwerkError>() {
        Some(domain) => {
            tracing::debug!(error = %domain, "command failed");
            let human = humanize_error(domain);
            eprintln!("{}", human.message);
            eprintln!("{}", human.suggestion);
        }
        None => eprintln!("error: {err:#}"),
    }
}
