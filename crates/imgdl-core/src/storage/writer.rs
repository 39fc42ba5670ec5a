//! Temp file that is either moved onto its final name or removed on drop.

use crate::error::StorageError;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Temporary file suffix used before the final move.
pub const TEMP_SUFFIX: &str = ".part";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temp path next to `final_path`, unique per process and call
/// (e.g. `cat.png` → `.cat.png.4242-7.part`), so workers writing the same
/// final name never share a temp file.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let file_name = final_path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_name = format!(".{}.{}-{}{}", file_name, std::process::id(), n, TEMP_SUFFIX);
    final_path.with_file_name(temp_name)
}

/// Open temp file for one image. Dropping it without finalizing deletes it.
#[derive(Debug)]
pub struct TempFile {
    file: Option<File>,
    path: PathBuf,
    finalized: bool,
}

impl TempFile {
    /// Creates (truncating) the temp file for `final_path`.
    pub fn create(final_path: &Path) -> Result<Self, StorageError> {
        let path = temp_path(final_path);
        let file = File::create(&path).map_err(|e| StorageError::io(&path, e))?;
        Ok(Self {
            file: Some(file),
            path,
            finalized: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_all(&mut self, data: &[u8]) -> Result<(), StorageError> {
        match self.file.as_mut() {
            Some(f) => f.write_all(data).map_err(|e| StorageError::io(&self.path, e)),
            None => Ok(()),
        }
    }

    /// Sync file data to disk. Call before finalizing for durability.
    pub fn sync(&self) -> Result<(), StorageError> {
        match self.file.as_ref() {
            Some(f) => f.sync_all().map_err(|e| StorageError::io(&self.path, e)),
            None => Ok(()),
        }
    }

    /// Atomically renames onto `final_path`, replacing any existing file.
    pub fn finalize_replace(mut self, final_path: &Path) -> Result<(), StorageError> {
        drop(self.file.take());
        std::fs::rename(&self.path, final_path).map_err(|e| StorageError::io(final_path, e))?;
        self.finalized = true;
        Ok(())
    }

    /// Moves onto `final_path` only if nothing exists there yet.
    pub fn finalize_new(self, final_path: &Path) -> Result<(), StorageError> {
        match self.try_finalize_new(final_path)? {
            None => Ok(()),
            Some(_) => Err(StorageError::Exists {
                path: final_path.to_path_buf(),
            }),
        }
    }

    /// Like `finalize_new` but hands the temp file back when `final_path` is
    /// taken, so the caller can try another name. Uses a hard link, which
    /// fails atomically when the target exists.
    pub fn try_finalize_new(mut self, final_path: &Path) -> Result<Option<Self>, StorageError> {
        drop(self.file.take());
        match std::fs::hard_link(&self.path, final_path) {
            Ok(()) => {
                if let Err(e) = std::fs::remove_file(&self.path) {
                    tracing::warn!(path = %self.path.display(), "could not remove temp file: {}", e);
                }
                self.finalized = true;
                Ok(None)
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(Some(self)),
            Err(e) => Err(StorageError::io(final_path, e)),
        }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.finalized {
            drop(self.file.take());
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
