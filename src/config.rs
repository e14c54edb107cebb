use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::dedup::DedupConfig;
use crate::error::Result;
use crate::filter::{CandidateFilterConfig, CategoryRule};
use crate::liveness::LivenessConfig;
use crate::providers::serpapi;
use crate::throttle::ThrottleConfig;

/// Search-provider query parameters (SerpAPI names)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Search engine (`google`)
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Query string
    #[serde(default)]
    pub q: String,

    /// Interface language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hl: Option<String>,

    /// Country
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gl: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Results per page
    #[serde(default = "default_num")]
    pub num: u32,

    /// `0` disables Google's similar-result folding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// Time filter (`qdr:d`, `qdr:w`, `qdr:m`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tbs: Option<String>,
}

fn default_engine() -> String {
    "google".to_string()
}

fn default_num() -> u32 {
    10
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            q: String::new(),
            hl: None,
            gl: None,
            location: None,
            num: default_num(),
            filter: None,
            tbs: None,
        }
    }
}

impl SearchParams {
    /// Query-string pairs for one page, without the API key
    pub fn to_query_pairs(&self, start: u32) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("engine".to_string(), self.engine.clone()),
            ("q".to_string(), self.q.clone()),
            ("num".to_string(), self.num.to_string()),
        ];
        let optional = [
            ("hl", &self.hl),
            ("gl", &self.gl),
            ("location", &self.location),
            ("filter", &self.filter),
            ("tbs", &self.tbs),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                pairs.push((key.to_string(), value.clone()));
            }
        }
        if start > 0 {
            pairs.push(("start".to_string(), start.to_string()));
        }
        pairs
    }
}

/// How many result pages to request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Offset step between pages
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Offsets stop below this value
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_page_size() -> u32 {
    10
}

fn default_max_results() -> u32 {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_results: default_max_results(),
        }
    }
}

impl PaginationConfig {
    /// Page offsets: `0, page_size, ...` strictly below `max_results`
    pub fn offsets(&self) -> impl Iterator<Item = u32> {
        let step = self.page_size.max(1) as usize;
        (0..self.max_results).step_by(step)
    }
}

/// Everything one harvest run needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Profile name, used in log lines
    pub name: String,

    /// Output file name prefix
    pub output_prefix: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    pub search: SearchParams,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub throttle: ThrottleConfig,

    #[serde(default)]
    pub filter: CandidateFilterConfig,

    /// Classification rules, first match wins
    #[serde(default)]
    pub categories: Vec<CategoryRule>,

    #[serde(default)]
    pub dedup: DedupConfig,

    /// Posting-page check; skipped when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness: Option<LivenessConfig>,

    /// Cap on the number of listings written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output: Option<usize>,

    #[serde(default = "default_serpapi_endpoint")]
    pub serpapi_endpoint: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_serpapi_endpoint() -> String {
    serpapi::DEFAULT_ENDPOINT.to_string()
}

impl HarvestConfig {
    /// A bare configuration for the given query
    pub fn new(name: &str, query: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            output_prefix: name.to_string(),
            output_dir: default_output_dir(),
            search: SearchParams {
                q: query.into(),
                ..SearchParams::default()
            },
            pagination: PaginationConfig::default(),
            throttle: ThrottleConfig::default(),
            filter: CandidateFilterConfig::default(),
            categories: Vec::new(),
            dedup: DedupConfig::default(),
            liveness: None,
            max_output: None,
            serpapi_endpoint: default_serpapi_endpoint(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
