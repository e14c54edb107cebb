use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

use super::PageFetcher;
use crate::error::{HarvestError, Result};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-GB,en;q=0.9";

/// Plain HTTP page fetcher with browser-like headers
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str, accept_language: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(value) = header_value("user_agent", user_agent) {
            headers.insert(USER_AGENT, value);
        }
        if let Some(value) = header_value("accept_language", accept_language) {
            headers.insert(ACCEPT_LANGUAGE, value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(
            Duration::from_secs(10),
            DEFAULT_USER_AGENT,
            DEFAULT_ACCEPT_LANGUAGE,
        )
    }
}

/// Parse a configured header, warning and skipping it when invalid
fn header_value(field: &str, value: &str) -> Option<HeaderValue> {
    match HeaderValue::from_str(value) {
        Ok(value) => Some(value),
        Err(e) => {
            ::log::warn!("Ignoring invalid {} {:?}: {}", field, value, e);
            None
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        ::log::debug!("FETCH: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
