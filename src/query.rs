//! Boolean search-query construction.
//!
//! Queries are assembled from static keyword lists, e.g.
//!
//! ```
//! use job_harvest::query::QueryBuilder;
//!
//! let q = QueryBuilder::new()
//!     .site("linkedin.com/jobs")
//!     .any_phrase(["send your CV", "apply by email"])
//!     .phrase("@")
//!     .build();
//! assert_eq!(q, r#"site:linkedin.com/jobs ("send your CV" OR "apply by email") "@""#);
//! ```

/// Builder for search-engine query strings
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    tokens: Vec<String>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one site (`site:x`)
    pub fn site(self, site: &str) -> Self {
        self.push(format!("site:{site}"))
    }

    /// Any of several sites, joined with OR and left ungrouped
    pub fn sites<I, S>(self, sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = sites
            .into_iter()
            .map(|s| format!("site:{}", s.as_ref()))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.push(joined)
    }

    /// A single quoted phrase
    pub fn phrase(self, phrase: &str) -> Self {
        self.push(quote(phrase))
    }

    /// Any of the quoted phrases
    pub fn any_phrase<I, S>(self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items = phrases.into_iter().map(|p| quote(p.as_ref())).collect();
        self.push_group(items)
    }

    /// Any of the bare words; multi-word entries are quoted
    pub fn any_word<I, S>(self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items = words.into_iter().map(|w| bare_or_quoted(w.as_ref())).collect();
        self.push_group(items)
    }

    /// Any of the terms in the page title
    pub fn intitle_any<I, S>(self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items = terms
            .into_iter()
            .map(|t| format!("intitle:{}", bare_or_quoted(t.as_ref())))
            .collect();
        self.push_group(items)
    }

    /// A verbatim operator token such as `intext:@` or `inurl:uk`
    pub fn raw(self, token: &str) -> Self {
        self.push(token.to_string())
    }

    /// Join all tokens with single spaces
    pub fn build(&self) -> String {
        self.tokens.join(" ")
    }

    fn push_group(self, items: Vec<String>) -> Self {
        match items.len() {
            0 => self,
            1 => {
                let single = items.into_iter().next().unwrap_or_default();
                self.push(single)
            }
            _ => self.push(format!("({})", items.join(" OR "))),
        }
    }

    fn push(mut self, token: String) -> Self {
        if !token.is_empty() {
            self.tokens.push(token);
        }
        self
    }
}

fn quote(phrase: &str) -> String {
    format!("\"{}\"", phrase.replace('"', ""))
}

fn bare_or_quoted(term: &str) -> String {
    if term.chars().any(char::is_whitespace) {
        quote(term)
    } else {
        term.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder() {
        assert_eq!(QueryBuilder::new().build(), "");
        assert_eq!(QueryBuilder::new().any_phrase(Vec::<&str>::new()).build(), "");
    }

    #[test]
    fn test_empty_sites_add_no_token() {
        let q = QueryBuilder::new()
            .site("linkedin.com/jobs")
            .sites(Vec::<&str>::new())
            .phrase("@")
            .build();
        assert_eq!(q, "site:linkedin.com/jobs \"@\"");
    }

    #[test]
    fn test_single_item_group_has_no_parentheses() {
        let q = QueryBuilder::new().any_phrase(["United Kingdom"]).build();
        assert_eq!(q, "\"United Kingdom\"");
    }

    #[test]
    fn test_multiple_sites_are_ungrouped() {
        let q = QueryBuilder::new()
            .sites(["linkedin.com/jobs/denmark", "linkedin.com/jobs/view/"])
            .any_phrase(["send ansøgning", "@gmail.com"])
            .build();
        assert_eq!(
            q,
            "site:linkedin.com/jobs/denmark OR site:linkedin.com/jobs/view/ \
             (\"send ansøgning\" OR \"@gmail.com\")"
        );
    }

    #[test]
    fn test_words_and_intitle() {
        let q = QueryBuilder::new()
            .site("linkedin.com/jobs")
            .raw("inurl:uk")
            .any_word(["accounting", "finance", "financial analyst"])
            .intitle_any(["marketing", "digital marketing"])
            .raw("intext:@")
            .build();
        assert_eq!(
            q,
            "site:linkedin.com/jobs inurl:uk (accounting OR finance OR \"financial analyst\") \
             (intitle:marketing OR intitle:\"digital marketing\") intext:@"
        );
    }

    #[test]
    fn test_embedded_quotes_are_dropped() {
        assert_eq!(QueryBuilder::new().phrase("say \"hi\"").build(), "\"say hi\"");
    }
}
