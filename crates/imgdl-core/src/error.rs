//! Per-item error taxonomy.
//!
//! None of these abort a batch: the item processor turns them into a
//! `Failure` outcome whose message is the error's `Display`.

use std::path::PathBuf;
use thiserror::Error;

/// Network/HTTP-level failure retrieving a URL.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure reported by libcurl (DNS, connect, TLS, timeout, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("HTTP {status}")]
    Http { status: u32 },
    /// Body exceeded the configured size cap; transfer aborted.
    #[error("response body exceeds {limit} bytes")]
    TooLarge { limit: u64 },
}

/// Decode/encode failure in the image pipeline.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("decode failed: {0}")]
    Decode(#[source] image::ImageError),
    #[error("encode failed: {0}")]
    Encode(#[source] image::ImageError),
    #[error("webp encode failed: {0}")]
    WebpEncode(String),
}

/// Local write failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Target exists and the collision policy forbids replacing it.
    #[error("{} already exists", .path.display())]
    Exists { path: PathBuf },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Any failure of a single item.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),
    #[error("transform: {0}")]
    Transform(#[from] TransformError),
    #[error("storage: {0}")]
    Storage(#[from] StorageError),
}
