
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::SearchParams;
use crate::error::{HarvestError, Result};
use crate::providers::serpapi::normalize_page;
use crate::providers::{PageFetcher, SearchProvider};
use crate::results::SearchPage;

const THREE_RESULTS: &str = include_str!("../../../tests/fixtures/serpapi_three_results.json");

/// Serves a recorded SerpAPI response as the first page, then runs dry
pub(super) struct FixtureProvider {
    body: &'static str,
}

impl FixtureProvider {
    pub(super) fn three_results() -> Self {
        Self {
            body: THREE_RESULTS,
        }
    }
}

#[async_trait]
impl SearchProvider for FixtureProvider {
    async fn search(&self, _params: &SearchParams, start: u32) -> Result<SearchPage> {
        if start > 0 {
            return Ok(SearchPage::default());
        }
        let page: SearchPage = serde_json::from_str(self.body)?;
        Ok(normalize_page(page))
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

/// Posting pages keyed by URL; anything else is a 404
pub(super) struct FakePages(pub(super) HashMap<String, String>);

#[async_trait]
impl PageFetcher for FakePages {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.0.get(url).cloned().ok_or_else(|| HarvestError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

pub(super) fn scratch_dir(label: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("job-harvest-{label}-{}-{nanos}", std::process::id()))
}
