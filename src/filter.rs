use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::results::Candidate;

/// Configuration for keyword filtering of candidates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateFilterConfig {
    /// Fragment the link must contain (e.g. `linkedin.com/jobs`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_link_fragment: Option<String>,

    /// Tokens that must all appear in the snippet (e.g. `@`)
    #[serde(default)]
    pub required_tokens: Vec<String>,

    /// Region markers; at least one must match when non-empty
    #[serde(default)]
    pub region_markers: Vec<String>,

    /// Domain keywords; at least one must match when non-empty
    #[serde(default)]
    pub include_keywords: Vec<String>,

    /// Keywords the title must contain at least one of when non-empty
    #[serde(default)]
    pub title_keywords: Vec<String>,

    /// Keywords that reject a candidate (these take precedence over includes)
    #[serde(default)]
    pub exclude_keywords: Vec<String>,

    /// Snippet phrases marking an old posting (e.g. `2 months ago`)
    #[serde(default)]
    pub stale_phrases: Vec<String>,

    /// Regex patterns the link must match at least one of when non-empty
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns that reject a link
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Case-insensitive keyword list matched on word boundaries
///
/// A keyword whose first or last character is alphanumeric is anchored with
/// `\b` on that side, so `pr` does not hit `product` while `.co.uk` and
/// `/uk/` still match as literal fragments. Surrounding spaces are kept, so
/// ` uk ` needs a standalone word and skips the `uk.` host prefix.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    entries: Vec<(String, Regex)>,
}

impl KeywordSet {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, regex::Error> {
        let mut entries = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            let keyword = keyword.as_ref().to_lowercase();
            if keyword.trim().is_empty() {
                continue;
            }
            let regex = Regex::new(&keyword_pattern(&keyword))?;
            entries.push((keyword.trim().to_string(), regex));
        }
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the first keyword that matches `text`
    pub fn find(&self, text: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(keyword, _)| keyword.as_str())
    }

    pub fn matches(&self, text: &str) -> bool {
        self.find(text).is_some()
    }
}

fn keyword_pattern(keyword: &str) -> String {
    let starts_word = keyword.chars().next().is_some_and(char::is_alphanumeric);
    let ends_word = keyword.chars().last().is_some_and(char::is_alphanumeric);
    format!(
        "(?i){}{}{}",
        if starts_word { r"\b" } else { "" },
        regex::escape(keyword),
        if ends_word { r"\b" } else { "" }
    )
}

/// Why a candidate was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    MissingLinkFragment(String),
    MissingToken(String),
    Stale(String),
    ExcludedLink(String),
    ExcludedKeyword(String),
    NoRegionMarker,
    NoIncludeKeyword,
    NoTitleKeyword,
    NoIncludePattern,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingLinkFragment(fragment) => {
                write!(f, "link does not contain {fragment:?}")
            }
            RejectReason::MissingToken(token) => write!(f, "snippet lacks {token:?}"),
            RejectReason::Stale(phrase) => write!(f, "snippet mentions {phrase:?}"),
            RejectReason::ExcludedLink(pattern) => write!(f, "link matches {pattern:?}"),
            RejectReason::ExcludedKeyword(keyword) => write!(f, "excluded keyword {keyword:?}"),
            RejectReason::NoRegionMarker => write!(f, "no region marker"),
            RejectReason::NoIncludeKeyword => write!(f, "no domain keyword"),
            RejectReason::NoTitleKeyword => write!(f, "no title keyword"),
            RejectReason::NoIncludePattern => write!(f, "link matches no include pattern"),
        }
    }
}

/// Outcome of filtering one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Reject(RejectReason),
}

/// Keyword filter applied to every candidate of a run
#[derive(Debug, Default)]
pub struct CandidateFilter {
    config: CandidateFilterConfig,
    region: KeywordSet,
    include: KeywordSet,
    title: KeywordSet,
    exclude: KeywordSet,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl CandidateFilter {
    /// Compile a filter from configuration
    pub fn new(config: CandidateFilterConfig) -> Result<Self, regex::Error> {
        let mut include_regexes = Vec::with_capacity(config.include_patterns.len());
        for pattern in &config.include_patterns {
            include_regexes.push(Regex::new(pattern)?);
        }

        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            region: KeywordSet::new(&config.region_markers)?,
            include: KeywordSet::new(&config.include_keywords)?,
            title: KeywordSet::new(&config.title_keywords)?,
            exclude: KeywordSet::new(&config.exclude_keywords)?,
            include_regexes,
            exclude_regexes,
            config,
        })
    }

    /// Run every check against a candidate
    pub fn evaluate(&self, candidate: &Candidate) -> Verdict {
        let link = candidate.link.to_lowercase();
        let snippet = candidate.snippet.to_lowercase();
        let haystack = candidate.haystack();

        if let Some(fragment) = &self.config.required_link_fragment {
            if !link.contains(&fragment.to_lowercase()) {
                return Verdict::Reject(RejectReason::MissingLinkFragment(fragment.clone()));
            }
        }

        for token in &self.config.required_tokens {
            if !snippet.contains(&token.to_lowercase()) {
                return Verdict::Reject(RejectReason::MissingToken(token.clone()));
            }
        }

        for phrase in &self.config.stale_phrases {
            if snippet.contains(&phrase.to_lowercase()) {
                return Verdict::Reject(RejectReason::Stale(phrase.clone()));
            }
        }

        for regex in &self.exclude_regexes {
            if regex.is_match(&candidate.link) {
                return Verdict::Reject(RejectReason::ExcludedLink(regex.as_str().to_string()));
            }
        }

        // Exclusions are checked before any inclusion rule
        if let Some(keyword) = self.exclude.find(&haystack) {
            return Verdict::Reject(RejectReason::ExcludedKeyword(keyword.to_string()));
        }

        if !self.region.is_empty() && !self.region.matches(&haystack) {
            return Verdict::Reject(RejectReason::NoRegionMarker);
        }

        if !self.include.is_empty() && !self.include.matches(&haystack) {
            return Verdict::Reject(RejectReason::NoIncludeKeyword);
        }

        if !self.title.is_empty() && !self.title.matches(&candidate.title) {
            return Verdict::Reject(RejectReason::NoTitleKeyword);
        }

        if !self.include_regexes.is_empty()
            && !self.include_regexes.iter().any(|r| r.is_match(&candidate.link))
        {
            return Verdict::Reject(RejectReason::NoIncludePattern);
        }

        Verdict::Keep
    }

    pub fn should_keep(&self, candidate: &Candidate) -> bool {
        self.evaluate(candidate) == Verdict::Keep
    }

    /// Keep the candidates that pass, returning them with the rejected count
    pub fn retain(&self, candidates: Vec<Candidate>) -> (Vec<Candidate>, usize) {
        let total = candidates.len();
        let kept: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| match self.evaluate(candidate) {
                Verdict::Keep => true,
                Verdict::Reject(reason) => {
                    ::log::debug!("Rejected {:?}: {}", candidate.title, reason);
                    false
                }
            })
            .collect();
        let rejected = total - kept.len();
        (kept, rejected)
    }
}

/// Job domains the classifier knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Finance,
    FinanceInternship,
    Frontend,
    Marketing,
}

/// One classification rule as written in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Assigns the first category whose rule matches
#[derive(Debug, Default)]
pub struct Classifier {
    rules: Vec<(Category, KeywordSet, KeywordSet)>,
}

impl Classifier {
    pub fn new(rules: &[CategoryRule]) -> Result<Self, regex::Error> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            compiled.push((
                rule.category,
                KeywordSet::new(&rule.include)?,
                KeywordSet::new(&rule.exclude)?,
            ));
        }
        Ok(Self { rules: compiled })
    }

    pub fn classify(&self, candidate: &Candidate) -> Option<Category> {
        let haystack = candidate.haystack();
        self.rules
            .iter()
            .find(|(_, include, exclude)| include.matches(&haystack) && !exclude.matches(&haystack))
            .map(|(category, _, _)| *category)
    }

    /// Set the category field on every candidate
    pub fn label(&self, candidates: &mut [Candidate]) {
        for candidate in candidates.iter_mut() {
            candidate.category = self.classify(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finance_filter() -> CandidateFilter {
        CandidateFilter::new(CandidateFilterConfig {
            required_link_fragment: Some("linkedin.com/jobs".to_string()),
            required_tokens: vec!["@".to_string()],
            region_markers: vec![
                " uk ".to_string(),
                "united kingdom".to_string(),
                ".co.uk".to_string(),
                "/uk/".to_string(),
            ],
            include_keywords: vec!["finance".to_string(), "accountant".to_string()],
            exclude_keywords: vec!["developer".to_string(), "pr".to_string()],
            ..CandidateFilterConfig::default()
        })
        .unwrap()
    }

    fn candidate(title: &str, snippet: &str) -> Candidate {
        Candidate::new(title, "https://www.linkedin.com/jobs/view/42", snippet)
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let filter = CandidateFilter::default();
        assert!(filter.should_keep(&Candidate::new("", "", "")));
    }

    #[test]
    fn test_missing_include_keyword_is_rejected() {
        let filter = finance_filter();
        let c = candidate("Warehouse Operative", "Email jobs@acme.co.uk, United Kingdom");
        assert_eq!(
            filter.evaluate(&c),
            Verdict::Reject(RejectReason::NoIncludeKeyword)
        );

        let c = candidate("Finance Assistant", "Email jobs@acme.co.uk, United Kingdom");
        assert_eq!(filter.evaluate(&c), Verdict::Keep);
    }

    #[test]
    fn test_exclusion_wins_over_inclusion() {
        let filter = finance_filter();
        let c = candidate(
            "Finance Developer",
            "Accountant wanted, email cv@acme.co.uk, United Kingdom",
        );
        assert_eq!(
            filter.evaluate(&c),
            Verdict::Reject(RejectReason::ExcludedKeyword("developer".to_string()))
        );
    }

    #[test]
    fn test_short_exclusion_keywords_respect_word_boundaries() {
        let filter = finance_filter();
        // "pr" must not hit "product" or "provide"
        let c = candidate(
            "Product Finance Analyst",
            "Provide your CV to hr@acme.co.uk, United Kingdom",
        );
        assert!(filter.should_keep(&c));

        let c = candidate("Finance & PR Officer", "hr@acme.co.uk United Kingdom");
        assert!(!filter.should_keep(&c));
    }

    #[test]
    fn test_required_token_and_region() {
        let filter = finance_filter();
        let no_at = candidate("Finance Assistant", "Apply now, United Kingdom");
        assert_eq!(
            filter.evaluate(&no_at),
            Verdict::Reject(RejectReason::MissingToken("@".to_string()))
        );

        let no_region = candidate("Finance Assistant", "Email cv@acme.dk in Copenhagen");
        assert_eq!(
            filter.evaluate(&no_region),
            Verdict::Reject(RejectReason::NoRegionMarker)
        );

        // Literal fragments still match inside words
        let co_uk = candidate("Finance Assistant", "Email cv@acme.co.uk today");
        assert!(filter.should_keep(&co_uk));
    }

    #[test]
    fn test_spaced_region_marker_ignores_uk_subdomain() {
        let filter = CandidateFilter::new(CandidateFilterConfig {
            region_markers: vec![" uk ".to_string()],
            ..CandidateFilterConfig::default()
        })
        .unwrap();

        let subdomain_only = Candidate::new(
            "Finance Assistant",
            "https://uk.linkedin.com/jobs/view/1",
            "Email cv@acme.dk",
        );
        assert_eq!(
            filter.evaluate(&subdomain_only),
            Verdict::Reject(RejectReason::NoRegionMarker)
        );

        let in_snippet = Candidate::new(
            "Finance Assistant",
            "https://uk.linkedin.com/jobs/view/1",
            "Based in Leeds, UK with hybrid working",
        );
        assert!(filter.should_keep(&in_snippet));
    }

    #[test]
    fn test_link_fragment_and_patterns() {
        let filter = CandidateFilter::new(CandidateFilterConfig {
            required_link_fragment: Some("linkedin.com/jobs".to_string()),
            exclude_patterns: vec![r"/jobs/search".to_string()],
            ..CandidateFilterConfig::default()
        })
        .unwrap();

        let other_site = Candidate::new("Job", "https://indeed.com/viewjob?jk=1", "");
        assert!(!filter.should_keep(&other_site));

        let search_page = Candidate::new("Jobs", "https://www.linkedin.com/jobs/search?k=x", "");
        assert!(!filter.should_keep(&search_page));

        let posting = Candidate::new("Job", "https://www.linkedin.com/jobs/view/1", "");
        assert!(filter.should_keep(&posting));
    }

    #[test]
    fn test_stale_and_title_keywords() {
        let filter = CandidateFilter::new(CandidateFilterConfig {
            title_keywords: vec!["intern".to_string()],
            stale_phrases: vec!["2 months ago".to_string()],
            ..CandidateFilterConfig::default()
        })
        .unwrap();

        assert!(!filter.should_keep(&candidate("Finance Intern", "Posted 2 months ago")));
        assert!(!filter.should_keep(&candidate("Finance Manager", "Posted today")));
        assert!(filter.should_keep(&candidate("Audit Intern", "Posted today")));
    }

    #[test]
    fn test_retain_counts_rejections() {
        let filter = finance_filter();
        let input = vec![
            candidate("Finance Assistant", "cv@acme.co.uk United Kingdom"),
            candidate("Web Developer", "cv@acme.co.uk United Kingdom"),
            candidate("Accountant", "no email, United Kingdom"),
        ];
        let (kept, rejected) = filter.retain(input);
        assert_eq!(kept.len(), 1);
        assert_eq!(rejected, 2);
        assert_eq!(kept[0].title, "Finance Assistant");
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let result = CandidateFilter::new(CandidateFilterConfig {
            exclude_patterns: vec!["(".to_string()],
            ..CandidateFilterConfig::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_classifier_first_matching_rule_wins() {
        let classifier = Classifier::new(&[
            CategoryRule {
                category: Category::FinanceInternship,
                include: vec!["finance intern".to_string(), "audit intern".to_string()],
                exclude: vec![],
            },
            CategoryRule {
                category: Category::Finance,
                include: vec!["finance".to_string(), "audit".to_string()],
                exclude: vec!["developer".to_string()],
            },
            CategoryRule {
                category: Category::Frontend,
                include: vec!["react".to_string(), "frontend".to_string()],
                exclude: vec![],
            },
        ])
        .unwrap();

        let intern = candidate("Finance Intern", "");
        assert_eq!(classifier.classify(&intern), Some(Category::FinanceInternship));

        let finance = candidate("Senior Audit Manager", "");
        assert_eq!(classifier.classify(&finance), Some(Category::Finance));

        let dev = candidate("Finance Platform Developer", "React and TypeScript");
        assert_eq!(classifier.classify(&dev), Some(Category::Frontend));

        let nurse = candidate("Nurse", "");
        assert_eq!(classifier.classify(&nurse), None);

        let mut batch = vec![intern, nurse];
        classifier.label(&mut batch);
        assert_eq!(batch[0].category, Some(Category::FinanceInternship));
        assert_eq!(batch[1].category, None);
    }
}
