use crate::extract::chain::{first_images, first_text, truncate_chars};
use crate::extract::rules::CompiledRules;
use crate::record::PlainDetails;
use scraper::Html;
use url::Url;

const DESCRIPTION_MAX_CHARS: usize = 200;

/// Overrides applied to the envelope of a static page
pub struct StaticExtraction {
    pub title: Option<String>,
    pub description: Option<String>,
    pub details: PlainDetails,
}

pub fn extract_static(document: &Html, base: &Url, rules: &CompiledRules) -> StaticExtraction {
    StaticExtraction {
        title: first_text(document, &rules.heading),
        description: first_text(document, &rules.static_content)
            .map(|content| truncate_chars(&content, DESCRIPTION_MAX_CHARS)),
        details: PlainDetails {
            images: first_images(document, &rules.static_images, base, 20),
        },
    }
}
