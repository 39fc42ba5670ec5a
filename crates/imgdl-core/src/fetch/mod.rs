//! Raw image retrieval over HTTP.
//!
//! One GET per URL through libcurl (the `curl` crate), redirects followed,
//! no retries. Non-2xx responses and transport failures are `FetchError`s.

mod settings;

use crate::error::FetchError;
use std::time::Duration;

pub use settings::{
    default_user_agent, FetchSettings, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_IMAGE_BYTES,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

/// Maximum redirects followed for a single GET.
const MAX_REDIRECTIONS: u32 = 10;

/// Retrieves the body of one URL. Implementations must be shareable across
/// the batch worker threads.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking libcurl fetcher. A fresh easy handle is used per request, so one
/// instance can serve every worker.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    settings: FetchSettings,
}

impl CurlFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let limit = self.settings.max_image_bytes;
        let mut body: Vec<u8> = Vec::new();
        let mut too_large = false;

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTIONS)?;
        easy.connect_timeout(Duration::from_secs(self.settings.connect_timeout_secs))?;
        easy.timeout(Duration::from_secs(self.settings.request_timeout_secs))?;
        easy.useragent(&self.settings.user_agent)?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                if (body.len() + data.len()) as u64 > limit {
                    too_large = true;
                    return Ok(0); // abort transfer
                }
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()
        };
        if let Err(e) = performed {
            if too_large && e.is_write_error() {
                return Err(FetchError::TooLarge { limit });
            }
            return Err(FetchError::Curl(e));
        }

        let status = easy.response_code()?;
        if !(200..300).contains(&status) {
            return Err(FetchError::Http { status });
        }

        tracing::debug!(url, status, len = body.len(), "fetched");
        Ok(body)
    }
}
