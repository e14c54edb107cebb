use scraper::{Html, Node};

/// Elements whose contents never count as page text
const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Options controlling how a fetched page is flattened to text
#[derive(Debug, Clone, Copy)]
pub struct TextOptions {
    /// Lowercase the output
    pub lowercase: bool,
    /// Drop `<script>`, `<style>`, `<noscript>` and `<template>` contents
    pub drop_scripts: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            drop_scripts: true,
        }
    }
}

/// Flatten HTML (or plain text) to a single lowercased line
pub fn page_text(html: &str) -> String {
    page_text_with_options(html, &TextOptions::default())
}

pub fn page_text_with_options(html: &str, options: &TextOptions) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let doc = Html::parse_document(html);
    let text = doc
        .root_element()
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => Some((node, &**text)),
            _ => None,
        })
        .filter(|(node, _)| {
            !options.drop_scripts
                || !node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
                })
        })
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join(" ");

    let collapsed = collapse_whitespace(&text);
    if options.lowercase {
        collapsed.to_lowercase()
    } else {
        collapsed
    }
}

/// Collapse runs of whitespace (including no-break spaces) into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
