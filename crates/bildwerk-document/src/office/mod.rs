// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Office Open XML output — DOCX documents and XLSX workbooks, written as
// plain zip packages.

pub mod docx;
pub mod package;
pub mod xlsx;

pub use docx::DocxWriter;
pub use package::OoxmlPackage;
pub use xlsx::{Cell, XlsxWriter};
