// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Configuration file discovery.

use std::path::{Path, PathBuf};

use bildwerk_core::ConverterConfig;
use bildwerk_core::error::Result;
use tracing::{debug, info};

/// File name looked for in the working directory and the config directory.
pub const CONFIG_FILE: &str = "bildwerk.json";

/// Settings from `explicit` if given, otherwise from the first
/// [`CONFIG_FILE`] found in the working directory or the user config
/// directory, otherwise defaults.
///
/// An explicitly named file must exist and parse; discovered files must parse.
pub fn load_config(explicit: Option<&Path>) -> Result<ConverterConfig> {
    if let Some(path) = explicit {
        info!(path = %path.display(), "loading configuration");
        return ConverterConfig::load(path);
    }

    for candidate in candidate_paths() {
        if candidate.is_file() {
            info!(path = %candidate.display(), "loading configuration");
            return ConverterConfig::load(&candidate);
        }
    }

    debug!("no configuration file found, using defaults");
    Ok(ConverterConfig::default())
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(dir) = config_dir() {
        paths.push(dir.join("bildwerk").join(CONFIG_FILE));
    }
    paths
}

fn config_dir() -> Option<PathBuf> {
    // Try XDG config dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg));
    }
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home).join(".config"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use bildwerk_core::config::UnknownOperationPolicy;

    #[test]
    fn explicit_file_is_used() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{ "unknown_operation": "reject" }"#).expect("write");

        let config = load_config(Some(&path)).expect("load");
        assert_eq!(config.unknown_operation, UnknownOperationPolicy::Reject);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_config(Some(&dir.path().join("absent.json"))).is_err());
    }

    #[test]
    fn candidates_start_with_working_directory() {
        assert_eq!(candidate_paths()[0], PathBuf::from(CONFIG_FILE));
    }
}
