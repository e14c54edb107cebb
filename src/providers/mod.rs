pub mod google;
pub mod http;
pub mod serpapi;

use async_trait::async_trait;

use crate::config::SearchParams;
use crate::error::Result;
use crate::results::SearchPage;

pub use google::GoogleBrowser;
pub use http::HttpFetcher;
pub use serpapi::SerpApi;

/// Source of paged search results
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Fetch the page of results starting at `start`
    ///
    /// Errors the provider reports in its response body come back inside
    /// the page; `Err` is reserved for transport and decode failures.
    async fn search(&self, params: &SearchParams, start: u32) -> Result<SearchPage>;

    /// Short name used in log lines
    fn name(&self) -> &str;
}

/// Fetches a posting page's HTML for liveness checks
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}
