use crate::extract::chain::{first_images, first_text, first_texts};
use crate::extract::rules::CompiledRules;
use crate::record::ProductDetails;
use scraper::Html;
use url::Url;

const DEFAULT_STOCK: &str = "Available";
const DEFAULT_CATEGORY: &str = "Products";

pub fn extract_product(
    document: &Html,
    base: &Url,
    breadcrumb: &[String],
    rules: &CompiledRules,
) -> ProductDetails {
    let features = match first_texts(document, &rules.feature_groups, 30) {
        items if !items.is_empty() => items,
        _ => first_texts(document, &rules.feature_paragraphs, 10),
    };

    let category = first_text(document, &rules.product_category)
        .or_else(|| {
            breadcrumb
                .len()
                .checked_sub(2)
                .and_then(|i| breadcrumb.get(i))
                .cloned()
        })
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    ProductDetails {
        price: first_text(document, &rules.price),
        stock_status: stock_status(
            first_text(document, &rules.stock),
            &rules.stock_negative_keywords,
        ),
        features,
        comments: first_texts(document, &rules.comments, 20),
        category,
        images: first_images(document, &rules.product_images, base, 20),
    }
}

/// Negative stock text is kept verbatim; anything else reads as available
fn stock_status(raw: Option<String>, negative_keywords: &[String]) -> String {
    match raw {
        Some(text) => {
            let lowered = text.to_lowercase();
            if negative_keywords
                .iter()
                .any(|k| lowered.contains(&k.to_lowercase()))
            {
                text
            } else {
                DEFAULT_STOCK.to_string()
            }
        }
        None => DEFAULT_STOCK.to_string(),
    }
}
