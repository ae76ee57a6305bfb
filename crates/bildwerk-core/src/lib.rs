// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — Core types, configuration, and error definitions shared across
// all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;
pub mod validation;

pub use config::ConverterConfig;
pub use error::BildwerkError;
pub use types::*;
pub use validation::{is_allowed, is_allowed_with};
