//! Page fetchers
//!
//! A [`Fetcher`] retrieves the raw body of the target page. The extractor
//! only needs one GET per request; the trait exists so the transport can be
//! swapped (tests, proxies, headless browsers).

mod default;

pub use default::DefaultFetcher;

use crate::error::FetchError;
use async_trait::async_trait;

/// Options applied to every page fetch
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Allow list of URL prefixes
    pub allow_prefixes: Vec<String>,
    /// Block list of URL prefixes
    pub block_prefixes: Vec<String>,
}

impl FetchOptions {
    /// Check a URL against the allow and block lists
    pub fn check_prefixes(&self, url: &str) -> Result<(), FetchError> {
        if !self.allow_prefixes.is_empty()
            && !self
                .allow_prefixes
                .iter()
                .any(|prefix| url.starts_with(prefix))
        {
            return Err(FetchError::BlockedUrl);
        }

        if self
            .block_prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix))
        {
            return Err(FetchError::BlockedUrl);
        }

        Ok(())
    }
}

/// Trait for page fetch transports
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Unique identifier for this fetcher (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Fetch the body of `url` as text
    ///
    /// Any transport failure or non-2xx status is an error.
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String, FetchError>;
}
