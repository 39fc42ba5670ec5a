use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::batch::DEFAULT_WORKERS;
use crate::fetch::{
    default_user_agent, FetchSettings, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_IMAGE_BYTES,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::naming::FallbackNaming;
use crate::storage::CollisionPolicy;

/// Storage root used when `storage_dir` is not configured (relative to the
/// working directory).
pub const DEFAULT_STORAGE_DIR: &str = "downloads";

/// Global configuration loaded from `~/.config/imgdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImgdlConfig {
    /// Directory images are written to. Defaults to `./downloads`.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
    /// Number of items fetched/transcoded concurrently.
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Whole-request timeout for a single image.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Responses larger than this fail the item.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// "overwrite" (default), "suffix" or "fail".
    #[serde(default)]
    pub collision: CollisionPolicy,
    /// "timestamp" (default) or "content-hash".
    #[serde(default)]
    pub fallback_naming: FallbackNaming,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_max_image_bytes() -> u64 {
    DEFAULT_MAX_IMAGE_BYTES
}

impl Default for ImgdlConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            workers: DEFAULT_WORKERS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            user_agent: default_user_agent(),
            collision: CollisionPolicy::default(),
            fallback_naming: FallbackNaming::default(),
        }
    }
}

impl ImgdlConfig {
    pub fn storage_root(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR))
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout_secs: self.connect_timeout_secs,
            request_timeout_secs: self.request_timeout_secs,
            max_image_bytes: self.max_image_bytes,
            user_agent: self.user_agent.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Pretty TOML, the same shape `load_or_init` writes for a fresh config.
pub fn to_toml(cfg: &ImgdlConfig) -> Result<String> {
    Ok(toml::to_string_pretty(cfg)?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ImgdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ImgdlConfig::default();
        let toml = to_toml(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ImgdlConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
