//! Per-request limits for the fetcher.

/// Defaults mirror `ImgdlConfig::default()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub connect_timeout_secs: u64,
    /// Hard wall-clock limit for the whole request.
    pub request_timeout_secs: u64,
    /// Bodies larger than this are rejected mid-transfer.
    pub max_image_bytes: u64,
    pub user_agent: String,
}

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 64 * 1024 * 1024;

pub fn default_user_agent() -> String {
    format!("imgdl/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            user_agent: default_user_agent(),
        }
    }
}
