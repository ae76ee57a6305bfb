// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scoped staging — an uploaded original that removes itself when the request
// is done with it.

use std::path::{Path, PathBuf};

use bildwerk_core::error::Result;
use tracing::{debug, warn};

use crate::store::FileStore;

/// An upload written to the staging store.
///
/// Call [`StagedUpload::release`] to delete it and see whether removal
/// worked. If the value is dropped without being released (early return,
/// `?`, panic unwind) the file is still removed and any failure is logged.
#[derive(Debug)]
pub struct StagedUpload {
    store: FileStore,
    path: PathBuf,
    released: bool,
}

impl StagedUpload {
    /// Write `bytes` into `store` under `name` and take ownership of the file.
    ///
    /// If the write fails no file is left in the store.
    pub fn create(store: &FileStore, name: &str, bytes: &[u8]) -> Result<Self> {
        let path = store.put(name, bytes)?;
        debug!(path = %path.display(), "upload staged");
        Ok(Self {
            store: store.clone(),
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the staged file now.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.store.delete(&self.path)?;
        debug!(path = %self.path.display(), "staged upload released");
        Ok(())
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match self.store.delete(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "staged upload removed on drop"),
            Err(err) => warn!(
                path = %self.path.display(),
                error = %err,
                "failed to remove staged upload"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_removes_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path()).expect("open");

        let staged = StagedUpload::create(&store, "cat.png", b"pixels").expect("stage");
        assert!(staged.path().is_file());
        staged.release().expect("release");
        assert!(!store.exists("cat.png"));
    }

    #[test]
    fn drop_removes_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path()).expect("open");

        {
            let _staged = StagedUpload::create(&store, "dog.jpg", b"pixels").expect("stage");
            assert!(store.exists("dog.jpg"));
        }
        assert!(!store.exists("dog.jpg"));
    }

    #[test]
    fn failed_staging_leaves_nothing_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path().join("uploads")).expect("open");
        std::fs::remove_dir(store.root()).expect("remove root");

        assert!(StagedUpload::create(&store, "cat.png", b"pixels").is_err());
        assert!(!store.exists("cat.png"));
    }

    #[test]
    fn release_reports_a_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path()).expect("open");

        let staged = StagedUpload::create(&store, "gone.gif", b"pixels").expect("stage");
        std::fs::remove_file(staged.path()).expect("remove behind its back");
        assert!(staged.release().is_err());
    }
}
