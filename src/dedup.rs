use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

use crate::results::Candidate;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

// "Acme Ltd hiring Finance Intern in London, England, United Kingdom | LinkedIn"
static HIRING_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?P<company>.+?)\s+(?:is\s+)?hiring\b").expect("valid title regex")
});

// "Finance Intern at Acme Ltd | LinkedIn"
static AT_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+at\s+(?P<company>[^|–]+?)\s*(?:[|–]|\s-\s|$)").expect("valid title regex")
});

const IMAGE_SUFFIXES: [&str; 6] = [".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg"];

// Lead-ins such as "We're now hiring" that name no employer
const GENERIC_LEAD_WORDS: [&str; 9] = [
    "we", "we're", "we’re", "are", "is", "now", "currently", "still", "urgently",
];

const LEGAL_SUFFIXES: [&str; 8] = ["ltd", "limited", "plc", "inc", "a/s", "aps", "llc", "gmbh"];

/// Which keys take part in deduplication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupConfig {
    #[serde(default = "default_enabled")]
    pub by_email: bool,

    #[serde(default = "default_enabled")]
    pub by_url: bool,

    #[serde(default = "default_enabled")]
    pub by_company: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            by_email: true,
            by_url: true,
            by_company: true,
        }
    }
}

/// A normalized value identifying a posting
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    Email(String),
    Url(String),
    Company(String),
}

/// Find email addresses in free text, lowercased and without image file names
pub fn extract_emails(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in EMAIL_REGEX.find_iter(text) {
        let email = m.as_str().trim_end_matches('.').to_lowercase();
        if IMAGE_SUFFIXES.iter().any(|suffix| email.ends_with(suffix)) {
            continue;
        }
        if !found.contains(&email) {
            found.push(email);
        }
    }
    found
}

/// Drop query string and fragment, lowercase scheme and host, trim trailing `/`
pub fn normalize_url(link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }

    let normalized = match Url::parse(link) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => link
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_lowercase(),
    };

    Some(normalized.trim_end_matches('/').to_string())
}

/// Pull a company name out of a LinkedIn-style result title
pub fn company_from_title(title: &str) -> Option<String> {
    let hiring = HIRING_TITLE
        .captures(title)
        .and_then(|caps| caps.name("company"))
        .and_then(|m| normalize_company(m.as_str()))
        .filter(|company| !is_generic_lead(company));

    hiring.or_else(|| {
        AT_TITLE
            .captures(title)
            .and_then(|caps| caps.name("company"))
            .and_then(|m| normalize_company(m.as_str()))
    })
}

fn is_generic_lead(company: &str) -> bool {
    company
        .split_whitespace()
        .all(|word| GENERIC_LEAD_WORDS.contains(&word))
}

/// Lowercase, collapse whitespace and strip a trailing legal suffix
pub fn normalize_company(name: &str) -> Option<String> {
    let mut words: Vec<String> = name
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c == ',' || c == '.').to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();

    if words.len() > 1 {
        if let Some(last) = words.last() {
            if LEGAL_SUFFIXES.contains(&last.as_str()) {
                words.pop();
            }
        }
    }

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Tracks every key seen during one run
#[derive(Debug, Default)]
pub struct Deduplicator {
    config: DedupConfig,
    seen_emails: HashSet<String>,
    seen_urls: HashSet<String>,
    seen_companies: HashSet<String>,
}

impl Deduplicator {
    pub fn new(config: DedupConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// All enabled keys for a candidate
    pub fn keys(&self, candidate: &Candidate) -> Vec<DedupKey> {
        let mut keys = Vec::new();

        if self.config.by_email {
            let mut emails: Vec<String> =
                candidate.emails.iter().map(|e| e.to_lowercase()).collect();
            for email in extract_emails(&candidate.snippet) {
                if !emails.contains(&email) {
                    emails.push(email);
                }
            }
            keys.extend(emails.into_iter().map(DedupKey::Email));
        }

        if self.config.by_url {
            if let Some(url) = normalize_url(&candidate.link) {
                keys.push(DedupKey::Url(url));
            }
        }

        if self.config.by_company {
            if let Some(company) = company_from_title(&candidate.title) {
                keys.push(DedupKey::Company(company));
            }
        }

        keys
    }

    fn seen(&self, key: &DedupKey) -> bool {
        match key {
            DedupKey::Email(v) => self.seen_emails.contains(v),
            DedupKey::Url(v) => self.seen_urls.contains(v),
            DedupKey::Company(v) => self.seen_companies.contains(v),
        }
    }

    fn register(&mut self, key: DedupKey) {
        match key {
            DedupKey::Email(v) => self.seen_emails.insert(v),
            DedupKey::Url(v) => self.seen_urls.insert(v),
            DedupKey::Company(v) => self.seen_companies.insert(v),
        };
    }

    /// Register the candidate's keys unless one was already seen.
    ///
    /// Returns the first repeated key for a duplicate, `None` for a new candidate.
    pub fn check(&mut self, candidate: &Candidate) -> Option<DedupKey> {
        let keys = self.keys(candidate);
        if let Some(repeated) = keys.iter().find(|key| self.seen(key)) {
            return Some(repeated.clone());
        }
        for key in keys {
            self.register(key);
        }
        None
    }

    /// Keep first occurrences, returning them with the duplicate count
    pub fn dedupe(&mut self, candidates: Vec<Candidate>) -> (Vec<Candidate>, usize) {
        let total = candidates.len();
        let mut unique = Vec::with_capacity(total);
        for candidate in candidates {
            match self.check(&candidate) {
                None => unique.push(candidate),
                Some(key) => ::log::debug!("Duplicate {:?} via {:?}", candidate.title, key),
            }
        }
        let duplicates = total - unique.len();
        (unique, duplicates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_emails() {
        let emails = extract_emails(
            "Send CV to HR@Acme.co.uk or jobs@acme.co.uk. Logo: banner@2x.png, again hr@acme.co.uk",
        );
        assert_eq!(emails, vec!["hr@acme.co.uk", "jobs@acme.co.uk"]);
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("https://UK.LinkedIn.com/jobs/view/123/?refId=abc&trk=x#top").as_deref(),
            Some("https://uk.linkedin.com/jobs/view/123")
        );
        assert_eq!(
            normalize_url("not a url?x=1").as_deref(),
            Some("not a url")
        );
        assert_eq!(normalize_url("   "), None);
    }

    #[test]
    fn test_company_from_title() {
        assert_eq!(
            company_from_title("Acme Ltd hiring Finance Intern in London | LinkedIn").as_deref(),
            Some("acme")
        );
        assert_eq!(
            company_from_title("Audit Trainee at Smith  &  Jones LLP | LinkedIn").as_deref(),
            Some("smith & jones llp")
        );
        assert_eq!(
            company_from_title("Junior Accountant at Nordic Shipping A/S").as_deref(),
            Some("nordic shipping")
        );
        assert_eq!(company_from_title("Finance Assistant - London"), None);
    }

    #[test]
    fn test_generic_hiring_titles_have_no_company() {
        assert_eq!(company_from_title("We're hiring: Finance Assistant | Acme"), None);
        assert_eq!(company_from_title("We are now hiring a Bookkeeper"), None);
        assert_eq!(
            company_from_title("Now hiring Accountant at Brightwater").as_deref(),
            Some("brightwater")
        );
    }

    #[test]
    fn test_generic_hiring_titles_are_not_duplicates() {
        let mut dedup = Deduplicator::default();
        let (kept, duplicates) = dedup.dedupe(vec![
            Candidate::new(
                "We're hiring: Finance Assistant",
                "https://acme.example/1",
                "cv@acme.co.uk",
            ),
            Candidate::new(
                "We're hiring: Payroll Clerk",
                "https://bright.example/7",
                "jobs@brightwater.co.uk",
            ),
        ]);
        assert_eq!(kept.len(), 2);
        assert_eq!(duplicates, 0);
    }

    #[test]
    fn test_same_email_keeps_first() {
        let mut first = Candidate::new("Finance Assistant", "https://a.example/jobs/1", "");
        first.emails = vec!["cv@acme.co.uk".to_string()];
        let second = Candidate::new(
            "Accounts Assistant",
            "https://a.example/jobs/2",
            "Email CV@ACME.co.uk",
        );

        let mut dedup = Deduplicator::default();
        let (kept, duplicates) = dedup.dedupe(vec![first.clone(), second]);
        assert_eq!(kept, vec![first]);
        assert_eq!(duplicates, 1);
    }

    #[test]
    fn test_url_and_company_keys() {
        let mut dedup = Deduplicator::new(DedupConfig::default());
        let a = Candidate::new("Acme hiring Analyst", "https://x.example/jobs/1?trk=a", "");
        let same_url = Candidate::new("Other", "https://x.example/jobs/1?trk=b", "");
        let same_company = Candidate::new("Acme Ltd hiring Clerk", "https://x.example/jobs/9", "");
        assert_eq!(dedup.check(&a), None);
        assert_eq!(
            dedup.check(&same_url),
            Some(DedupKey::Url("https://x.example/jobs/1".to_string()))
        );
        assert_eq!(
            dedup.check(&same_company),
            Some(DedupKey::Company("acme".to_string()))
        );
    }

    #[test]
    fn test_duplicates_do_not_register_their_keys() {
        let mut dedup = Deduplicator::default();
        let a = Candidate::new("A", "https://x.example/1", "a@x.com");
        // Duplicate of `a` by email, carrying a fresh URL
        let b = Candidate::new("B", "https://x.example/2", "a@x.com");
        // Shares only the URL of `b`, which must not have been registered
        let c = Candidate::new("C", "https://x.example/2", "c@x.com");
        let (kept, duplicates) = dedup.dedupe(vec![a, b, c]);
        assert_eq!(duplicates, 1);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].title, "C");
    }

    #[test]
    fn test_disabled_keys_are_ignored() {
        let mut dedup = Deduplicator::new(DedupConfig {
            by_email: false,
            by_url: true,
            by_company: false,
        });
        let a = Candidate::new("Acme hiring A", "https://x.example/1", "a@x.com");
        let b = Candidate::new("Acme hiring B", "https://x.example/2", "a@x.com");
        let (kept, duplicates) = dedup.dedupe(vec![a, b]);
        assert_eq!(kept.len(), 2);
        assert_eq!(duplicates, 0);
    }
}
