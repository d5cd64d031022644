//! Default HTTP fetcher
//!
//! Plain GET over reqwest. Timeouts, redirects and TLS are left at the
//! transport defaults.

use crate::error::FetchError;
use crate::fetchers::{FetchOptions, Fetcher};
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use tracing::{debug, warn};
use url::Url;

/// Accept header sent with page requests
const ACCEPT_HTML: &str = "text/html, application/xhtml+xml, text/plain, */*;q=0.8";

/// Default HTTP fetcher
///
/// Handles all HTTP/HTTPS URLs:
/// - validates the scheme and the allow/block prefix lists
/// - issues a single GET, no retries
/// - fails on any non-2xx status
pub struct DefaultFetcher;

impl DefaultFetcher {
    /// Create a new default fetcher
    pub fn new() -> Self {
        Self
    }
}

impl Default for DefaultFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for DefaultFetcher {
    fn name(&self) -> &'static str {
        "default"
    }

    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String, FetchError> {
        validate_url(url)?;
        options.check_prefixes(url)?;

        // Build headers
        let mut headers = HeaderMap::new();
        let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(FetchError::ClientBuildError)?;

        debug!(fetcher = self.name(), url = %url, "Fetching page");

        let response = client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Page fetch returned non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(FetchError::from_reqwest)?;
        debug!(url = %url, size = body.len(), "Page fetched");

        Ok(body)
    }
}

/// Check that the URL is an absolute http(s) URL
fn validate_url(url: &str) -> Result<(), FetchError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(FetchError::InvalidUrlScheme);
    }
    Url::parse(url).map_err(|_| FetchError::InvalidUrlScheme)?;
    Ok(())
}
