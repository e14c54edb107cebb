use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::results::OrganicResult;

const SNIPPET_SELECTORS: [&str; 3] = ["div.VwiC3b", "div.IsZvec", "span.aCOpRe"];

const CAPTCHA_MARKERS: [&str; 4] = [
    "jeg er ikke en robot",
    "i'm not a robot",
    "recaptcha",
    "unusual traffic",
];

/// Parses a rendered Google results page into organic results
pub fn parse_google_html(html: &str) -> Vec<OrganicResult> {
    let doc = Html::parse_document(html);

    let block_selector = Selector::parse("div.g").unwrap();
    let title_selector = Selector::parse("h3").unwrap();
    let link_selector = Selector::parse("a[href]").unwrap();
    let snippet_selectors: Vec<Selector> = SNIPPET_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect();

    let mut results = Vec::new();
    for block in doc.select(&block_selector) {
        let Some(title) = block.select(&title_selector).next().map(element_text) else {
            continue;
        };
        let Some(href) = block
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };

        let snippet = snippet_selectors
            .iter()
            .find_map(|sel| block.select(sel).next())
            .map(element_text)
            .unwrap_or_default();

        results.push(OrganicResult {
            position: Some(results.len() as u32 + 1),
            title,
            link: resolve_google_href(href),
            snippet: Some(snippet),
        });
    }

    ::log::debug!("SERP parser found {} results", results.len());
    results
}

/// Google sometimes wraps result links as `/url?q=<target>&sa=...`
pub fn resolve_google_href(href: &str) -> String {
    if href.starts_with("/url?") {
        if let Ok(url) = Url::parse(&format!("https://www.google.com{href}")) {
            if let Some((_, target)) = url.query_pairs().find(|(k, _)| k == "q") {
                return target.into_owned();
            }
        }
    }
    href.to_string()
}

/// True when the page body reads like a bot-check interstitial
pub fn is_captcha_page(body_text: &str) -> bool {
    let lower = body_text.to_lowercase();
    CAPTCHA_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
