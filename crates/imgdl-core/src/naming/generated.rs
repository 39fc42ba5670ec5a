//! Generated stems for items without a usable title.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Hex characters of the content digest kept in content-hash names.
const HASH_PREFIX_LEN: usize = 16;

/// How a stem is generated when no title is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackNaming {
    /// `image-<epoch millis>-<0..=999>`. Best effort, not collision-proof.
    #[default]
    Timestamp,
    /// `image-<first 16 hex chars of SHA-256(content)>`. Same bytes, same name.
    ContentHash,
}

pub fn generated_stem(fallback: FallbackNaming, content: &[u8]) -> String {
    match fallback {
        FallbackNaming::Timestamp => {
            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default();
            let salt: u32 = rand::random_range(0..1000);
            format!("image-{millis}-{salt}")
        }
        FallbackNaming::ContentHash => {
            let digest = hex::encode(Sha256::digest(content));
            format!("image-{}", &digest[..HASH_PREFIX_LEN])
        }
    }
}
