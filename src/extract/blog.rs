use crate::extract::chain::{first_images, first_text, first_texts, truncate_chars};
use crate::extract::metadata::Envelope;
use crate::extract::rules::CompiledRules;
use crate::record::BlogDetails;
use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;
use url::Url;

const DESCRIPTION_MAX_CHARS: usize = 160;
const CONTENT_MAX_CHARS: usize = 300;
const UNCATEGORIZED: &str = "Uncategorized";

/// `DD-MM-YYYY` (any of `-./` as separator) or ISO `YYYY-MM-DD`
fn date_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\b(\d{2}[-./]\d{2}[-./]\d{4}|\d{4}-\d{2}-\d{2})\b").ok())
        .as_ref()
}

/// Blog fields plus the description the record should carry
pub struct BlogExtraction {
    pub details: BlogDetails,
    pub description: String,
}

pub fn extract_blog(
    document: &Html,
    raw_html: &str,
    base: &Url,
    envelope: &Envelope,
    rules: &CompiledRules,
    now: DateTime<Utc>,
) -> BlogExtraction {
    let date = first_text(document, &rules.blog_date)
        .or_else(|| {
            date_pattern()
                .and_then(|pattern| pattern.find(raw_html))
                .map(|m| m.as_str().to_string())
        })
        .unwrap_or_else(|| now.format("%Y-%m-%d").to_string());

    let description = if envelope.has_meta_description {
        envelope.description.clone()
    } else {
        first_text(document, &rules.blog_description)
            .or_else(|| {
                let paragraphs = first_texts(document, &rules.blog_paragraphs, 2);
                (!paragraphs.is_empty())
                    .then(|| truncate_chars(&paragraphs.join(" "), DESCRIPTION_MAX_CHARS))
            })
            .unwrap_or_else(|| envelope.title.clone())
    };

    let blog_categories = match first_texts(document, &rules.blog_categories, 10) {
        categories if !categories.is_empty() => categories,
        _ => vec![UNCATEGORIZED.to_string()],
    };

    let mut images = first_images(document, &rules.blog_images, base, 10);
    if images.is_empty() {
        images = envelope
            .og_image
            .as_deref()
            .and_then(|src| crate::crawler::resolve_link(src, base))
            .map(|u| vec![u.to_string()])
            .unwrap_or_else(|| vec![rules.placeholder_image.clone()]);
    }

    BlogExtraction {
        details: BlogDetails {
            date,
            blog_categories,
            blog_content: first_text(document, &rules.blog_content)
                .map(|content| truncate_chars(&content, CONTENT_MAX_CHARS)),
            images,
        },
        description,
    }
}
