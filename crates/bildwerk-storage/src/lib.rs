// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-storage — Filesystem stores for the conversion engine.
//
// Uploaded originals sit in a staging directory only while they are being
// converted; produced artifacts are written to an output directory keyed by
// filename. Both are plain directories: last writer wins, no locking.

pub mod integrity;
pub mod staging;
pub mod store;

pub use integrity::{hash_bytes, short_digest, verify_hash};
pub use staging::StagedUpload;
pub use store::FileStore;
