// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-app — request orchestration for the conversion engine.
//
// The web layer that normally sits in front of this (accounts, sessions,
// page rendering) is not part of the workspace; `ConversionService::handle`
// is the boundary it calls. The `bildwerk` binary is a thin command-line
// caller over the same boundary.

pub mod services;

pub use services::orchestrator::ConversionService;
