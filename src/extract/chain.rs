//! Selector chain evaluation
//!
//! A chain is an ordered list of [`SelectorRule`]s. The first rule with at
//! least one non-empty match decides the field; later rules are never
//! consulted once one succeeds.

use crate::crawler::resolve_link;
use crate::extract::rules::SelectorRule;
use scraper::{ElementRef, Html};
use url::Url;

/// Collapses runs of whitespace into single spaces
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to at most `max` characters, on a character boundary
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => text[..byte_index].trim_end().to_string(),
        None => text.to_string(),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<String>())
}

fn rule_value(element: ElementRef<'_>, rule: &SelectorRule) -> Option<String> {
    let value = match &rule.attr {
        Some(attr) => normalize_text(element.value().attr(attr)?),
        None => element_text(element),
    };
    (!value.is_empty()).then_some(value)
}

/// Value of the first match of the first rule that yields one
pub fn first_text(document: &Html, chain: &[SelectorRule]) -> Option<String> {
    for rule in chain {
        if let Some(value) = document
            .select(&rule.selector)
            .find_map(|element| rule_value(element, rule))
        {
            return Some(value);
        }
    }
    None
}

/// All values of the first rule that yields at least one, capped at `limit`
pub fn first_texts(document: &Html, chain: &[SelectorRule], limit: usize) -> Vec<String> {
    for rule in chain {
        let mut values: Vec<String> = Vec::new();
        for element in document.select(&rule.selector) {
            if let Some(value) = rule_value(element, rule) {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            if values.len() >= limit {
                break;
            }
        }
        if !values.is_empty() {
            return values;
        }
    }
    Vec::new()
}

/// First element matched by the first rule that matches anything
pub fn first_element<'a>(document: &'a Html, chain: &[SelectorRule]) -> Option<ElementRef<'a>> {
    chain
        .iter()
        .find_map(|rule| document.select(&rule.selector).next())
}

/// Whether any rule of the chain matches an element
pub fn matches_any(document: &Html, chain: &[SelectorRule]) -> bool {
    first_element(document, chain).is_some()
}

/// Absolute image URLs from the first rule that yields at least one
///
/// Reads the rule's attribute when given, else `src`, `data-src` or
/// `data-lazy-src`. Relative and protocol-relative sources are resolved
/// against the page URL.
pub fn first_images(
    document: &Html,
    chain: &[SelectorRule],
    base: &Url,
    limit: usize,
) -> Vec<String> {
    for rule in chain {
        let mut images: Vec<String> = Vec::new();
        for element in document.select(&rule.selector) {
            let raw = match &rule.attr {
                Some(attr) => element.value().attr(attr),
                None => element
                    .value()
                    .attr("src")
                    .or_else(|| element.value().attr("data-src"))
                    .or_else(|| element.value().attr("data-lazy-src")),
            };

            if let Some(resolved) = raw.and_then(|src| resolve_link(src, base)) {
                let resolved = resolved.to_string();
                if !images.contains(&resolved) {
                    images.push(resolved);
                }
            }
            if images.len() >= limit {
                break;
            }
        }
        if !images.is_empty() {
            return images;
        }
    }
    Vec::new()
}
