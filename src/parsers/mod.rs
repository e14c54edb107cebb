pub mod serp;
pub mod text;

use crate::dedup::extract_emails;

/// What a posting page yields once flattened
#[derive(Debug, Clone)]
pub struct PageContent {
    /// Lowercased, tag-free, whitespace-collapsed text
    pub text: String,
    /// Emails found in the page text
    pub emails: Vec<String>,
}

impl PageContent {
    /// Flatten a fetched posting page and collect its emails
    pub fn parse(html: &str) -> Self {
        let text = text::page_text(html);
        let emails = extract_emails(&text);
        Self { text, emails }
    }
}
