// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory-backed byte store keyed by filename.

use std::fs::File;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use bildwerk_core::error::{BildwerkError, Result};
use tracing::{debug, instrument, warn};

/// A flat directory of files addressed by name.
///
/// No locking and no versioning: writing a name that already exists replaces
/// the previous content.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "file store ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a name resolves to inside this store.
    ///
    /// Names must be a single plain path component so nothing can be written
    /// outside the store directory.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(name)),
            _ => Err(BildwerkError::Validation(format!(
                "'{name}' is not a plain file name"
            ))),
        }
    }

    /// Write `bytes` under `name`, replacing any existing entry.
    ///
    /// A write that fails part-way leaves nothing behind under `name`.
    #[instrument(skip(self, bytes), fields(root = %self.root.display(), bytes_len = bytes.len()))]
    pub fn put(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(name)?;
        write_or_remove(&path, |file| file.write_all(bytes))?;
        debug!(path = %path.display(), "stored");
        Ok(path)
    }

    /// Read the full content at `path`.
    pub fn get(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        Ok(std::fs::read(path.as_ref())?)
    }

    /// Remove the file at `path`.
    pub fn delete(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::remove_file(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "deleted");
        Ok(())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|path| path.is_file()).unwrap_or(false)
    }
}

/// Create `path` and fill it with `fill`. If filling fails the half-written
/// file is removed before the error is returned.
fn write_or_remove<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let mut file = File::create(path)?;
    let written = fill(&mut file).and_then(|()| file.sync_all());
    drop(file);

    if let Err(err) = written {
        if let Err(remove_err) = std::fs::remove_file(path) {
            warn!(
                path = %path.display(),
                error = %remove_err,
                "failed to remove partially written file"
            );
        }
        return Err(err.into());
    }
    Ok(())
}
