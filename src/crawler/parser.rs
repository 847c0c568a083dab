//! Link harvesting from HTML pages
//!
//! The coverage passes read category and blog index pages for outbound
//! links. This module extracts those links and resolves them against the
//! page URL.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts the unique, absolute http(s) links of a page, in document order
///
/// **Include:** `<a href="...">` anywhere in the document.
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - fragment-only links
///
/// Fragments are stripped, so `/p/1#reviews` and `/p/1` count once.
///
/// # Example
///
/// ```
/// use site_census::crawler::harvest_links;
/// use url::Url;
///
/// let html = r#"<a href="/urun/1">One</a><a href="mailto:x@y.z">Mail</a>"#;
/// let base = Url::parse("https://example.com/kategori/a").unwrap();
/// let links = harvest_links(html, &base);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/urun/1");
/// ```
pub fn harvest_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(mut absolute) = resolve_link(href, base_url) {
                    absolute.set_fragment(None);
                    if seen.insert(absolute.to_string()) {
                        links.push(absolute);
                    }
                }
            }
        }
    }

    links
}

/// Harvested links restricted to the host of `base_url`
pub fn harvest_same_host_links(html: &str, base_url: &Url) -> Vec<Url> {
    let host = base_url.host_str();
    harvest_links(html, base_url)
        .into_iter()
        .filter(|link| link.host_str() == host)
        .collect()
}

/// Resolves an href or src attribute to an absolute URL
///
/// Handles relative and protocol-relative (`//cdn.example.com/x.png`)
/// references. Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/kategori/ayakkabi").unwrap()
    }

    fn links(html: &str) -> Vec<String> {
        harvest_links(html, &base_url())
            .into_iter()
            .map(|u| u.to_string())
            .collect()
    }

    #[test]
    fn test_extract_absolute_link() {
        let found = links(r#"<a href="https://other.com/page">Link</a>"#);
        assert_eq!(found, vec!["https://other.com/page"]);
    }

    #[test]
    fn test_extract_relative_link() {
        let found = links(r#"<a href="/urun/1">Link</a>"#);
        assert_eq!(found, vec!["https://example.com/urun/1"]);
    }

    #[test]
    fn test_extract_relative_path_link() {
        let found = links(r#"<a href="spor">Link</a>"#);
        assert_eq!(found, vec!["https://example.com/kategori/spor"]);
    }

    #[test]
    fn test_skip_special_schemes() {
        let html = r#"
            <a href="javascript:void(0)">JS</a>
            <a href="mailto:test@example.com">Email</a>
            <a href="tel:+1234567890">Call</a>
            <a href="data:text/html,<h1>Test</h1>">Data</a>
        "#;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_skip_download_and_fragment_links() {
        let html = r##"<a href="/file.pdf" download>Download</a><a href="#top">Top</a>"##;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_deduplicates_ignoring_fragment() {
        let html = r#"
            <a href="/urun/1">One</a>
            <a href="/urun/1#yorumlar">Reviews</a>
            <a href="https://example.com/urun/1">Again</a>
        "#;
        assert_eq!(links(html), vec!["https://example.com/urun/1"]);
    }

    #[test]
    fn test_same_host_filter() {
        let html = r#"<a href="/urun/1">Own</a><a href="https://cdn.other.com/urun/2">Foreign</a>"#;
        let found = harvest_same_host_links(html, &base_url());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].as_str(), "https://example.com/urun/1");
    }

    #[test]
    fn test_resolve_protocol_relative() {
        let resolved = resolve_link("//cdn.example.com/img/a.jpg", &base_url()).unwrap();
        assert_eq!(resolved.as_str(), "https://cdn.example.com/img/a.jpg");
    }
}
