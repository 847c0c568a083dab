use serde::Deserialize;

/// Ordered path-prefix tables driving URL classification
///
/// All prefixes are matched against the lowercased URL path. Lists given in
/// the `[classifier]` config section replace the corresponding default list.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClassifierRules {
    /// Checked right after the root path
    pub product_prefixes: Vec<String>,

    /// Blog post prefixes that win over every category rule
    pub blog_content_prefixes: Vec<String>,

    pub category_prefixes: Vec<String>,

    /// Product listing prefixes, only applied outside `/blog/`
    pub product_category_prefixes: Vec<String>,

    /// Product prefixes checked after all category rules
    pub secondary_product_prefixes: Vec<String>,

    pub blog_prefixes: Vec<String>,

    /// A blog-prefixed path containing one of these is not a post
    pub blog_category_markers: Vec<String>,

    pub static_prefixes: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            product_prefixes: strings(&[
                "/product/",
                "/urun/",
                "/p/",
                "/shop/",
                "/item/",
                "/product-detail/",
            ]),
            blog_content_prefixes: strings(&["/blog/icerik/"]),
            category_prefixes: strings(&[
                "/category/",
                "/kategori/",
                "/cat/",
                "/collections/",
                "/blog/kategori/",
                "/blog/category/",
            ]),
            product_category_prefixes: strings(&[
                "/product-category/",
                "/urun-kategori/",
                "/urunler/",
            ]),
            secondary_product_prefixes: strings(&[
                "/products/",
                "/urun-detay/",
                "/store/",
                "/magaza/",
            ]),
            blog_prefixes: strings(&["/blog/", "/icerik/"]),
            blog_category_markers: strings(&["/kategori/", "/category/"]),
            static_prefixes: strings(&[
                "/about",
                "/contact",
                "/faq",
                "/terms",
                "/privacy",
                "/hakkimizda",
                "/iletisim",
                "/sss",
                "/gizlilik",
                "/kullanim-kosullari",
                "/sayfa/",
                "/page/",
            ]),
        }
    }
}

pub(crate) fn starts_with_any(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| path.starts_with(p.as_str()))
}

pub(crate) fn contains_any(path: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| path.contains(n.as_str()))
}
