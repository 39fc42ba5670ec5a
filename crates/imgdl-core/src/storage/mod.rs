//! Flat-directory image storage.
//!
//! Every image is written to a uniquely named temp file in the storage root,
//! synced, then moved onto its final name. The root is created on first write.
//! What happens when the final name already exists is the `CollisionPolicy`.

mod writer;

use crate::error::StorageError;
use crate::naming::FileName;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use writer::{temp_path, TempFile, TEMP_SUFFIX};

/// Upper bound on `-N` disambiguators tried by `CollisionPolicy::Suffix`.
const MAX_SUFFIX_ATTEMPTS: u32 = 10_000;

/// Rule applied when the target filename already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing file silently.
    #[default]
    Overwrite,
    /// Store as `<base>-1<ext>`, `<base>-2<ext>`, ... (first free name).
    Suffix,
    /// Fail the item with `StorageError::Exists`.
    Fail,
}

/// Storage root plus collision policy. Cheap to clone; holds no open handles.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    collision: CollisionPolicy,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            collision: CollisionPolicy::default(),
        }
    }

    pub fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collision(&self) -> CollisionPolicy {
        self.collision
    }

    /// Writes `bytes` under `name` and returns the filename actually used
    /// (differs from `name.file_name()` only with `CollisionPolicy::Suffix`).
    /// On error nothing is left behind in the root.
    pub fn store(&self, name: &FileName, bytes: &[u8]) -> Result<String, StorageError> {
        std::fs::create_dir_all(&self.root).map_err(|e| StorageError::io(&self.root, e))?;

        let wanted = name.file_name();
        let mut temp = TempFile::create(&self.root.join(&wanted))?;
        temp.write_all(bytes)?;
        temp.sync()?;

        match self.collision {
            CollisionPolicy::Overwrite => {
                temp.finalize_replace(&self.root.join(&wanted))?;
                Ok(wanted)
            }
            CollisionPolicy::Fail => {
                temp.finalize_new(&self.root.join(&wanted))?;
                Ok(wanted)
            }
            CollisionPolicy::Suffix => self.finalize_with_suffix(temp, name),
        }
    }

    fn finalize_with_suffix(
        &self,
        mut temp: TempFile,
        name: &FileName,
    ) -> Result<String, StorageError> {
        let candidates = std::iter::once(name.file_name()).chain(
            (1..=MAX_SUFFIX_ATTEMPTS).map(|n| format!("{}-{}{}", name.base, n, name.extension)),
        );
        let mut last = name.file_name();
        for candidate in candidates {
            match temp.try_finalize_new(&self.root.join(&candidate))? {
                None => return Ok(candidate),
                Some(back) => {
                    temp = back;
                    last = candidate;
                }
            }
        }
        Err(StorageError::Exists {
            path: self.root.join(last),
        })
    }
}
