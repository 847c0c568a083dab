//! Sitemap XML parsing
//!
//! Handles both `<sitemapindex>` documents (child sitemap references) and
//! `<urlset>` documents (page URLs). Namespace prefixes are ignored and
//! `<loc>` values may be plain text or CDATA.

use quick_xml::events::Event;
use quick_xml::Reader;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// Child sitemap locations
    Index(Vec<String>),
    /// Page locations
    UrlSet(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    None,
    Sitemap,
    Url,
}

/// Parses a sitemap or sitemap index
///
/// A document holding any `<sitemap><loc>` entry is an index. Documents
/// whose root is neither `urlset` nor `sitemapindex` are rejected.
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, String> {
    let mut reader = Reader::from_str(xml);
    let mut root_seen = false;
    let mut entry = Entry::None;
    let mut depth = 0usize;
    let mut entry_depth = 0usize;
    let mut in_loc = false;
    let mut loc = String::new();
    let mut children = Vec::new();
    let mut pages = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                match e.local_name().as_ref() {
                    b"urlset" | b"sitemapindex" => root_seen = true,
                    b"sitemap" => {
                        entry = Entry::Sitemap;
                        entry_depth = depth;
                    }
                    b"url" => {
                        entry = Entry::Url;
                        entry_depth = depth;
                    }
                    // Only the entry's own <loc>, not e.g. <image:loc>
                    b"loc" if entry != Entry::None && depth == entry_depth + 1 => {
                        in_loc = true;
                        loc.clear();
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(e)) if in_loc => {
                let text = e.unescape().map_err(|e| e.to_string())?;
                loc.push_str(&text);
            }
            Ok(Event::CData(e)) if in_loc => {
                loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::End(e)) => {
                match e.local_name().as_ref() {
                    b"loc" if in_loc => {
                        in_loc = false;
                        let value = loc.trim().to_string();
                        if !value.is_empty() {
                            match entry {
                                Entry::Sitemap => children.push(value),
                                Entry::Url => pages.push(value),
                                Entry::None => {}
                            }
                        }
                    }
                    b"sitemap" | b"url" => entry = Entry::None,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            }
            _ => {}
        }
    }

    if !root_seen {
        return Err("document is neither a urlset nor a sitemap index".to_string());
    }

    if children.is_empty() {
        Ok(SitemapDocument::UrlSet(pages))
    } else {
        Ok(SitemapDocument::Index(children))
    }
}
