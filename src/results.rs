use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::filter::Category;

/// One organic result as returned by a search provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganicResult {
    /// Rank on the results page (SerpAPI only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub link: String,

    #[serde(default)]
    pub snippet: Option<String>,
}

/// One page of search results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default, rename = "organic_results")]
    pub organic: Vec<OrganicResult>,

    /// Error reported by the provider in the response body
    #[serde(default)]
    pub error: Option<String>,
}

impl SearchPage {
    pub fn new(organic: Vec<OrganicResult>) -> Self {
        Self {
            organic,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            organic: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// A scraped search result that may be a job posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,

    /// Link to the posting
    #[serde(alias = "url")]
    pub link: String,

    #[serde(default)]
    pub snippet: String,

    /// Emails found in the snippet or on the posting page
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,

    /// Domain assigned by the classifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Candidate {
    /// Create a candidate with no emails or category
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            snippet: snippet.into(),
            emails: Vec::new(),
            category: None,
        }
    }

    /// Lowercased `title snippet link`, the text keyword filters look at
    pub fn haystack(&self) -> String {
        format!("{} {} {}", self.title, self.snippet, self.link).to_lowercase()
    }

    /// Add emails not already present, keeping first-seen order
    pub fn merge_emails<I>(&mut self, emails: I)
    where
        I: IntoIterator<Item = String>,
    {
        for email in emails {
            if !self.emails.contains(&email) {
                self.emails.push(email);
            }
        }
    }
}

impl From<OrganicResult> for Candidate {
    fn from(result: OrganicResult) -> Self {
        Candidate::new(
            result.title.trim(),
            result.link.trim(),
            result.snippet.as_deref().unwrap_or_default().trim(),
        )
    }
}

/// Counts collected over one harvest run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Organic results returned by the provider
    pub fetched: usize,
    /// Dropped by the keyword filter
    pub rejected: usize,
    /// Dropped because a dedup key was already seen
    pub duplicates: usize,
    /// Dropped because the posting page reads as closed
    pub closed: usize,
    /// Dropped because the posting page could not be fetched
    pub failed: usize,
    /// Dropped because the posting page carried no email
    pub missing_email: usize,
    /// Written to the output file
    pub emitted: usize,
    pub output_path: Option<PathBuf>,
}
