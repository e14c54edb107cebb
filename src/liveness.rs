use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;
use crate::parsers::PageContent;
use crate::providers::PageFetcher;
use crate::providers::http::{DEFAULT_ACCEPT_LANGUAGE, DEFAULT_USER_AGENT, HttpFetcher};
use crate::results::Candidate;
use crate::throttle::{Pause, Throttle};

/// Configuration for re-fetching postings before emission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessConfig {
    /// Phrases that mark a posting as closed (matched on lowercased page text)
    #[serde(default = "default_closed_phrases")]
    pub closed_phrases: Vec<String>,

    /// Regex patterns that mark a posting as closed
    #[serde(default = "default_closed_patterns")]
    pub closed_patterns: Vec<String>,

    /// Merge emails found on the page into the candidate
    #[serde(default)]
    pub collect_emails: bool,

    /// Drop open postings whose page carries no email
    #[serde(default)]
    pub require_email: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

fn default_closed_phrases() -> Vec<String> {
    [
        "no longer accepting applications",
        "this job is no longer available",
        "this job has expired",
        "applications are closed",
        "position filled",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_closed_patterns() -> Vec<String> {
    vec![
        r"no\s*longer\s*(accepting|taking)\s*(applications|applicants)".to_string(),
        r"applications\s*(are\s*)?closed".to_string(),
        r"job\s*(is\s*)?(closed|expired|unavailable)".to_string(),
        r"position\s*(has\s*been\s*)?filled".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_accept_language() -> String {
    DEFAULT_ACCEPT_LANGUAGE.to_string()
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            closed_phrases: default_closed_phrases(),
            closed_patterns: default_closed_patterns(),
            collect_emails: false,
            require_email: false,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

impl LivenessConfig {
    /// HTTP fetcher honoring this configuration's headers and timeout
    pub fn fetcher(&self) -> Result<HttpFetcher> {
        HttpFetcher::new(
            Duration::from_secs(self.timeout_secs),
            &self.user_agent,
            &self.accept_language,
        )
    }
}

/// What a posting page says about the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    Open { emails: Vec<String> },
    /// Carries the phrase or pattern that matched
    Closed(String),
}

/// Outcome of checking a batch of candidates
#[derive(Debug, Default)]
pub struct LivenessReport {
    pub open: Vec<Candidate>,
    pub closed: usize,
    pub failed: usize,
    pub missing_email: usize,
}

/// Decides whether a posting page is still accepting applications
#[derive(Debug)]
pub struct LivenessChecker {
    config: LivenessConfig,
    phrases: Vec<String>,
    patterns: Vec<Regex>,
}

impl LivenessChecker {
    pub fn new(config: LivenessConfig) -> std::result::Result<Self, regex::Error> {
        let phrases = config
            .closed_phrases
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        let mut patterns = Vec::with_capacity(config.closed_patterns.len());
        for pattern in &config.closed_patterns {
            patterns.push(Regex::new(&format!("(?i){pattern}"))?);
        }

        Ok(Self {
            config,
            phrases,
            patterns,
        })
    }

    /// Classify an already-fetched page
    pub fn inspect(&self, html: &str) -> PageStatus {
        let page = PageContent::parse(html);

        if let Some(phrase) = self.phrases.iter().find(|p| page.text.contains(p.as_str())) {
            return PageStatus::Closed(phrase.clone());
        }

        if let Some(found) = self.patterns.iter().find_map(|r| r.find(&page.text)) {
            return PageStatus::Closed(found.as_str().to_string());
        }

        PageStatus::Open {
            emails: page.emails,
        }
    }

    /// Fetch every candidate's page in order and keep the open ones.
    ///
    /// A failed fetch drops that candidate only; the batch continues.
    pub async fn verify<F: PageFetcher + ?Sized>(
        &self,
        fetcher: &F,
        candidates: Vec<Candidate>,
        throttle: &Throttle,
    ) -> LivenessReport {
        let mut report = LivenessReport::default();
        ::log::info!("Checking {} listings for closure text", candidates.len());

        for mut candidate in candidates {
            ::log::debug!("Scanning {}", candidate.link);
            let html = match fetcher.fetch(&candidate.link).await {
                Ok(html) => html,
                Err(e) => {
                    ::log::warn!("Failed to fetch {}: {}", candidate.link, e);
                    report.failed += 1;
                    continue;
                }
            };

            match self.inspect(&html) {
                PageStatus::Closed(reason) => {
                    ::log::info!("Closed: {} ({})", candidate.title, reason);
                    report.closed += 1;
                }
                PageStatus::Open { emails } => {
                    if self.config.collect_emails {
                        candidate.merge_emails(emails);
                    }
                    if self.config.require_email && candidate.emails.is_empty() {
                        ::log::debug!("No email on page: {}", candidate.title);
                        report.missing_email += 1;
                    } else {
                        ::log::info!("Open: {}", candidate.title);
                        report.open.push(candidate);
                    }
                }
            }

            throttle.pause(Pause::Check).await;
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarvestError;
    use crate::throttle::ThrottleConfig;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FakePages(HashMap<String, String>);

    #[async_trait]
    impl PageFetcher for FakePages {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.0.get(url).cloned().ok_or_else(|| HarvestError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn checker(config: LivenessConfig) -> LivenessChecker {
        LivenessChecker::new(config).unwrap()
    }

    #[test]
    fn test_position_filled_is_closed() {
        let checker = checker(LivenessConfig::default());
        let status = checker.inspect("<html><body><h2>Position   <b>Filled</b></h2></body></html>");
        assert_eq!(status, PageStatus::Closed("position filled".to_string()));
    }

    #[test]
    fn test_regex_variants_are_closed() {
        let checker = checker(LivenessConfig::default());
        assert!(matches!(
            checker.inspect("<p>We are no longer taking applicants</p>"),
            PageStatus::Closed(_)
        ));
        assert!(matches!(
            checker.inspect("<p>This job is unavailable</p>"),
            PageStatus::Closed(_)
        ));
        assert!(matches!(
            checker.inspect("<p>The position has been filled.</p>"),
            PageStatus::Closed(_)
        ));
    }

    #[test]
    fn test_numeric_no_break_space_still_reads_closed() {
        let checker = checker(LivenessConfig::default());
        assert_eq!(
            checker.inspect("<p>Position&#160;filled</p>"),
            PageStatus::Closed("position filled".to_string())
        );
        assert!(matches!(
            checker.inspect("<p>This job is no longer accepting&#xA0;applications</p>"),
            PageStatus::Closed(_)
        ));
    }

    #[test]
    fn test_closed_text_inside_scripts_is_ignored() {
        let checker = checker(LivenessConfig::default());
        let html = "<p>Apply to hr@acme.co.uk</p><script>var copy = 'Position filled';</script>";
        assert_eq!(
            checker.inspect(html),
            PageStatus::Open {
                emails: vec!["hr@acme.co.uk".to_string()]
            }
        );
    }

    #[test]
    fn test_open_page_reports_emails() {
        let checker = checker(LivenessConfig::default());
        assert_eq!(
            checker.inspect("<p>Send your CV to Jobs@Acme.co.uk</p>"),
            PageStatus::Open {
                emails: vec!["jobs@acme.co.uk".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn test_verify_drops_closed_and_failed() {
        let pages = FakePages(HashMap::from([
            ("https://a/1".to_string(), "<p>Apply today</p>".to_string()),
            ("https://a/2".to_string(), "<p>Position filled</p>".to_string()),
        ]));
        let candidates = vec![
            Candidate::new("Open", "https://a/1", ""),
            Candidate::new("Closed", "https://a/2", ""),
            Candidate::new("Gone", "https://a/3", ""),
        ];

        let checker = checker(LivenessConfig::default());
        let throttle = Throttle::new(ThrottleConfig::none());
        let report = checker.verify(&pages, candidates, &throttle).await;

        assert_eq!(report.open.len(), 1);
        assert_eq!(report.open[0].title, "Open");
        assert_eq!(report.closed, 1);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn test_verify_collects_and_requires_emails() {
        let pages = FakePages(HashMap::from([
            ("https://a/1".to_string(), "<p>Mail hr@acme.co.uk</p>".to_string()),
            ("https://a/2".to_string(), "<p>Apply online</p>".to_string()),
        ]));
        let candidates = vec![
            Candidate::new("With email", "https://a/1", ""),
            Candidate::new("Without email", "https://a/2", ""),
        ];

        let checker = checker(LivenessConfig {
            collect_emails: true,
            require_email: true,
            ..LivenessConfig::default()
        });
        let report = checker
            .verify(&pages, candidates, &Throttle::new(ThrottleConfig::none()))
            .await;

        assert_eq!(report.open.len(), 1);
        assert_eq!(report.open[0].emails, vec!["hr@acme.co.uk"]);
        assert_eq!(report.missing_email, 1);
    }
}
