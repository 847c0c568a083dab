//! Page envelope extraction: title, description, structured data, breadcrumb

use crate::extract::chain::{first_text, normalize_text};
use crate::extract::rules::CompiledRules;
use crate::record::title_from_url;
use scraper::{Html, Selector};

/// Fields every extracted record carries, whatever its kind
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub title: String,
    pub description: String,
    /// True when the description came from Open Graph or a meta tag
    pub has_meta_description: bool,
    pub og_image: Option<String>,
    pub structured_data: Option<serde_json::Value>,
    pub breadcrumb: Vec<String>,
}

/// Extracts the envelope using fixed fallback orders
///
/// Title: `og:title` → `<title>` → humanized URL segment.
/// Description: `og:description` → `meta[name=description]` → title.
pub fn extract_envelope(document: &Html, url: &str, rules: &CompiledRules) -> Envelope {
    let title = first_text(document, &rules.og_title)
        .or_else(|| first_text(document, &rules.document_title))
        .unwrap_or_else(|| title_from_url(url));

    let meta_description = first_text(document, &rules.og_description)
        .or_else(|| first_text(document, &rules.meta_description));
    let has_meta_description = meta_description.is_some();
    let description = meta_description.unwrap_or_else(|| title.clone());

    Envelope {
        title,
        description,
        has_meta_description,
        og_image: first_text(document, &rules.og_image),
        structured_data: extract_structured_data(document),
        breadcrumb: extract_breadcrumb(document, rules),
    }
}

/// Returns the first JSON-LD block on the page that parses
pub fn extract_structured_data(document: &Html) -> Option<serde_json::Value> {
    let selector = Selector::parse("script[type='application/ld+json']").ok()?;
    document.select(&selector).find_map(|script| {
        let raw = script.text().collect::<String>();
        serde_json::from_str::<serde_json::Value>(raw.trim()).ok()
    })
}

/// Text items of the first breadcrumb container that yields any
pub fn extract_breadcrumb(document: &Html, rules: &CompiledRules) -> Vec<String> {
    for container_rule in &rules.breadcrumb {
        for container in document.select(&container_rule.selector) {
            for item_rule in &rules.breadcrumb_items {
                let items: Vec<String> = container
                    .select(&item_rule.selector)
                    .map(|item| normalize_text(&item.text().collect::<String>()))
                    .filter(|text| !text.is_empty())
                    .collect();
                if !items.is_empty() {
                    return items;
                }
            }
        }
    }

    Vec::new()
}
