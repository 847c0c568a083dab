use crate::extract::chain::{first_images, first_text};
use crate::extract::rules::CompiledRules;
use crate::record::{humanize_slug, last_path_segment, CategoryDetails};
use scraper::Html;
use url::Url;

/// Category name: slug after a category prefix, then heading, then last segment
pub fn category_name(document: &Html, url: &Url, rules: &CompiledRules) -> String {
    let path = url.path().to_lowercase();

    let from_prefix = rules.category_path_prefixes.iter().find_map(|prefix| {
        let rest = path.split_once(prefix.as_str())?.1;
        let slug = rest.split('/').find(|s| !s.is_empty())?;
        let decoded = urlencoding::decode(slug)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| slug.to_string());
        let name = humanize_slug(&decoded);
        (!name.is_empty()).then_some(name)
    });

    from_prefix
        .or_else(|| first_text(document, &rules.category_heading))
        .or_else(|| last_path_segment(url.as_str()).map(|s| humanize_slug(&s)))
        .unwrap_or_default()
}

pub fn extract_category(document: &Html, url: &Url, rules: &CompiledRules) -> CategoryDetails {
    CategoryDetails {
        category: category_name(document, url, rules),
        images: first_images(document, &rules.category_images, url, 20),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(html: &str, url: &str) -> String {
        let document = Html::parse_document(html);
        category_name(&document, &Url::parse(url).unwrap(), &CompiledRules::default())
    }

    #[test]
    fn test_slug_after_prefix() {
        assert_eq!(name("<h1>Ignored</h1>", "https://x.com/kategori/erkek-ayakkabi"), "Erkek Ayakkabi");
        assert_eq!(name("", "https://x.com/category/mens_shoes/page/2"), "Mens Shoes");
    }

    #[test]
    fn test_heading_when_no_prefix() {
        assert_eq!(name("<h1> Summer Sale </h1>", "https://x.com/sale"), "Summer Sale");
    }

    #[test]
    fn test_last_segment_fallback() {
        assert_eq!(name("<p>none</p>", "https://x.com/shop/outdoor-gear"), "Outdoor Gear");
    }

    #[test]
    fn test_category_images() {
        let document = Html::parse_document(
            r#"<div class="product-list"><img src="/p/1.jpg"><img src="/p/2.jpg"></div>"#,
        );
        let url = Url::parse("https://x.com/kategori/a").unwrap();
        let details = extract_category(&document, &url, &CompiledRules::default());
        assert_eq!(details.images.len(), 2);
        assert_eq!(details.category, "A");
    }
}
