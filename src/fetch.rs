use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use url::Url;

use crate::config::ClipperConfig;
use crate::error::ClipError;

/// Performs the single outbound GET of the extraction pipeline.
///
/// One fetcher holds one configured HTTP client and can be reused across
/// extraction calls. There are no retries; redirects are whatever the
/// transport does natively.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &ClipperConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch the raw HTML of a page.
    ///
    /// The URL is validated before any network I/O happens; an unparsable
    /// input fails with [`ClipError::InvalidUrl`]. A transport failure, a
    /// non-success status, or an empty response body all fail with
    /// [`ClipError::Fetch`].
    pub fn fetch(&self, url: &str) -> Result<String, ClipError> {
        let parsed = Url::parse(url).map_err(|e| ClipError::InvalidUrl(e.to_string()))?;

        debug!("fetching {}", parsed);

        let response = self.client.get(parsed).send()?.error_for_status()?;
        let body = response.text()?;

        if body.trim().is_empty() {
            return Err(ClipError::Fetch(format!("empty response body from {}", url)));
        }

        Ok(body)
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(&ClipperConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_fails_before_network() {
        let fetcher = Fetcher::default();
        let result = fetcher.fetch("not a url at all");
        assert!(matches!(result, Err(ClipError::InvalidUrl(_))));
    }

    #[test]
    fn test_relative_url_is_invalid() {
        let fetcher = Fetcher::default();
        let result = fetcher.fetch("/recipes/banana-bread");
        assert!(matches!(result, Err(ClipError::InvalidUrl(_))));
    }
}
