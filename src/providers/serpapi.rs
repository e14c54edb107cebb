use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::SearchProvider;
use crate::config::SearchParams;
use crate::error::{HarvestError, Result};
use crate::results::SearchPage;

pub const API_KEY_VAR: &str = "SERPAPI_API_KEY";

pub const DEFAULT_ENDPOINT: &str = "https://serpapi.com/search.json";

/// SerpAPI reports an exhausted query as an error; it is an empty page to us
const NO_RESULTS_MARKER: &str = "hasn't returned any results";

/// SerpAPI's Google engine over HTTPS
#[derive(Debug, Clone)]
pub struct SerpApi {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl SerpApi {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        })
    }

    /// Build a client from `SERPAPI_API_KEY`
    pub fn from_env(endpoint: impl Into<String>) -> Result<Self> {
        let api_key = read_api_key()?;
        Self::new(api_key, endpoint)
    }
}

/// Read the SerpAPI key, failing early when it is unset or blank
pub fn read_api_key() -> Result<String> {
    match std::env::var(API_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(HarvestError::MissingApiKey(API_KEY_VAR)),
    }
}

/// Turn a provider-reported "no results" error into an empty page
pub fn normalize_page(mut page: SearchPage) -> SearchPage {
    let exhausted = page
        .error
        .as_deref()
        .is_some_and(|e| e.contains(NO_RESULTS_MARKER));
    if exhausted {
        page.error = None;
        page.organic.clear();
    }
    page
}

#[async_trait]
impl SearchProvider for SerpApi {
    async fn search(&self, params: &SearchParams, start: u32) -> Result<SearchPage> {
        let mut query = params.to_query_pairs(start);
        query.push(("api_key".to_string(), self.api_key.clone()));

        let response = self.client.get(&self.endpoint).query(&query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // SerpAPI returns JSON with an `error` field on 4xx as well
        match serde_json::from_str::<SearchPage>(&body) {
            Ok(page) => Ok(normalize_page(page)),
            Err(_) if !status.is_success() => Err(HarvestError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &str {
        "serpapi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_results_error_becomes_empty_page() {
        let page = normalize_page(SearchPage::failed(
            "Google hasn't returned any results for this query.",
        ));
        assert!(page.error.is_none());
        assert!(page.organic.is_empty());
    }

    #[test]
    fn test_other_errors_are_kept() {
        let page = normalize_page(SearchPage::failed("Invalid API key."));
        assert_eq!(page.error.as_deref(), Some("Invalid API key."));
    }
}
