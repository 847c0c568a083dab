use scraper::Selector;
use serde::Deserialize;

/// One entry of a selector chain: a CSS selector, optionally reading an attribute
///
/// Written as `selector` or `selector@attribute`, e.g.
/// `meta[itemprop='price']@content`.
#[derive(Debug, Clone)]
pub struct SelectorRule {
    pub selector: Selector,
    pub attr: Option<String>,
}

impl SelectorRule {
    /// Compiles a rule; returns None if the selector does not parse
    pub fn parse(rule: &str) -> Option<Self> {
        let rule = rule.trim();
        let (selector, attr) = match rule.rsplit_once('@') {
            Some((selector, attr))
                if !attr.is_empty()
                    && attr
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':') =>
            {
                (selector, Some(attr.to_string()))
            }
            _ => (rule, None),
        };

        if selector.trim().is_empty() {
            return None;
        }

        Selector::parse(selector)
            .ok()
            .map(|selector| Self { selector, attr })
    }

    /// Compiles every rule of a chain, skipping any that do not parse
    pub fn compile_all(rules: &[String]) -> Vec<Self> {
        rules.iter().filter_map(|r| Self::parse(r)).collect()
    }
}

/// Ordered selector chains for every extracted field
///
/// Loaded once at startup (defaults, optionally replaced per field by the
/// `[extraction]` config section). In each chain the first rule yielding a
/// non-empty match wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractionRules {
    // Envelope
    pub breadcrumb: Vec<String>,
    pub breadcrumb_items: Vec<String>,

    // Kind markers
    pub blog_marker: Vec<String>,
    pub product_marker: Vec<String>,
    pub category_marker: Vec<String>,

    // Product
    pub price: Vec<String>,
    pub stock: Vec<String>,
    pub stock_negative_keywords: Vec<String>,
    pub feature_groups: Vec<String>,
    pub feature_paragraphs: Vec<String>,
    pub comments: Vec<String>,
    pub product_category: Vec<String>,
    pub product_images: Vec<String>,

    // Blog
    pub blog_date: Vec<String>,
    pub blog_description: Vec<String>,
    pub blog_paragraphs: Vec<String>,
    pub blog_categories: Vec<String>,
    pub blog_content: Vec<String>,
    pub blog_images: Vec<String>,
    pub placeholder_image: String,

    // Category
    pub category_path_prefixes: Vec<String>,
    pub category_heading: Vec<String>,
    pub category_images: Vec<String>,

    // Static
    pub static_content: Vec<String>,
    pub static_images: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            breadcrumb: strings(&[
                "nav.breadcrumb",
                "ol.breadcrumb",
                "ul.breadcrumb",
                ".breadcrumbs",
                "[itemtype*='BreadcrumbList']",
                "nav[aria-label='breadcrumb']",
            ]),
            breadcrumb_items: strings(&["li", "[itemprop='name']", "a"]),

            blog_marker: strings(&[
                "[itemtype*='BlogPosting']",
                "article.post",
                ".blog-post",
                ".single-post",
            ]),
            product_marker: strings(&[
                "[itemtype*='schema.org/Product']",
                ".product-detail",
                ".product-single",
                "#product",
            ]),
            category_marker: strings(&[
                ".category-products",
                ".products-grid",
                ".product-list",
                ".collection-products",
            ]),

            price: strings(&[
                "meta[itemprop='price']@content",
                "[itemprop='price']",
                ".product-price",
                ".price",
                ".urun-fiyat",
                ".fiyat",
                "meta[property='product:price:amount']@content",
            ]),
            stock: strings(&[
                "[itemprop='availability']@content",
                ".stock-status",
                ".availability",
                ".stock",
                ".stok-durumu",
            ]),
            stock_negative_keywords: strings(&["out", "tükendi", "yok"]),
            feature_groups: strings(&[
                ".product-features li",
                ".features li",
                "ul.specs li",
                ".urun-ozellikleri li",
                ".product-description li",
                "[itemprop='description'] li",
            ]),
            feature_paragraphs: strings(&[
                ".product-description p",
                "[itemprop='description'] p",
                ".description p",
                ".urun-aciklama p",
            ]),
            comments: strings(&[
                "[itemprop='reviewBody']",
                ".review-text",
                ".review .content",
                ".comment-content",
                ".yorum-metni",
            ]),
            product_category: strings(&[
                ".product-category a",
                ".product-category",
                ".posted_in a",
                "[itemprop='category']",
            ]),
            product_images: strings(&[
                ".product-gallery img",
                ".product-images img",
                ".woocommerce-product-gallery img",
                "[itemprop='image']@src",
                ".product-image img",
                ".urun-resim img",
            ]),

            blog_date: strings(&[
                "meta[property='article:published_time']@content",
                "time[datetime]@datetime",
                ".post-date",
                ".blog-date",
                ".entry-date",
                ".published",
                ".tarih",
            ]),
            blog_description: strings(&[
                ".post-excerpt",
                ".entry-summary",
                ".blog-summary",
                ".excerpt",
            ]),
            blog_paragraphs: strings(&[
                ".post-content p",
                ".entry-content p",
                ".blog-content p",
                "article p",
            ]),
            blog_categories: strings(&[
                ".post-categories a",
                ".cat-links a",
                "a[rel='category tag']",
                ".blog-category a",
                ".blog-kategori a",
            ]),
            blog_content: strings(&[
                ".post-content",
                ".entry-content",
                ".blog-content",
                "article",
            ]),
            blog_images: strings(&[
                ".featured-image img",
                ".post-thumbnail img",
                ".wp-post-image",
                ".post-content img",
                ".entry-content img",
                "article img",
            ]),
            placeholder_image: "https://placehold.co/800x450?text=Blog".to_string(),

            category_path_prefixes: strings(&[
                "/category/",
                "/kategori/",
                "/cat/",
                "/collections/",
                "/product-category/",
                "/urun-kategori/",
                "/urunler/",
            ]),
            category_heading: strings(&[
                "h1",
                ".category-title",
                ".page-title",
                ".collection-title",
            ]),
            category_images: strings(&[
                ".category-image img",
                ".collection-hero img",
                ".product-list img",
                ".products img",
            ]),

            static_content: strings(&[
                ".page-content",
                ".entry-content",
                ".content",
                "main",
                "article",
            ]),
            static_images: strings(&[".page-content img", "main img", "article img"]),
        }
    }
}

impl ExtractionRules {
    /// Every selector rule, paired with the name of the field it belongs to
    pub fn named_rules(&self) -> Vec<(&'static str, &String)> {
        let chains: Vec<(&'static str, &Vec<String>)> = vec![
            ("breadcrumb", &self.breadcrumb),
            ("breadcrumb-items", &self.breadcrumb_items),
            ("blog-marker", &self.blog_marker),
            ("product-marker", &self.product_marker),
            ("category-marker", &self.category_marker),
            ("price", &self.price),
            ("stock", &self.stock),
            ("feature-groups", &self.feature_groups),
            ("feature-paragraphs", &self.feature_paragraphs),
            ("comments", &self.comments),
            ("product-category", &self.product_category),
            ("product-images", &self.product_images),
            ("blog-date", &self.blog_date),
            ("blog-description", &self.blog_description),
            ("blog-paragraphs", &self.blog_paragraphs),
            ("blog-categories", &self.blog_categories),
            ("blog-content", &self.blog_content),
            ("blog-images", &self.blog_images),
            ("category-heading", &self.category_heading),
            ("category-images", &self.category_images),
            ("static-content", &self.static_content),
            ("static-images", &self.static_images),
        ];

        chains
            .into_iter()
            .flat_map(|(field, rules)| rules.iter().map(move |rule| (field, rule)))
            .collect()
    }
}

/// [`ExtractionRules`] with every selector chain compiled
///
/// Built once per extractor; extraction never parses a selector itself.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    // Envelope
    pub og_title: Vec<SelectorRule>,
    pub document_title: Vec<SelectorRule>,
    pub og_description: Vec<SelectorRule>,
    pub meta_description: Vec<SelectorRule>,
    pub og_image: Vec<SelectorRule>,
    pub heading: Vec<SelectorRule>,
    pub breadcrumb: Vec<SelectorRule>,
    pub breadcrumb_items: Vec<SelectorRule>,

    // Kind markers
    pub blog_marker: Vec<SelectorRule>,
    pub product_marker: Vec<SelectorRule>,
    pub category_marker: Vec<SelectorRule>,

    // Product
    pub price: Vec<SelectorRule>,
    pub stock: Vec<SelectorRule>,
    pub stock_negative_keywords: Vec<String>,
    pub feature_groups: Vec<SelectorRule>,
    pub feature_paragraphs: Vec<SelectorRule>,
    pub comments: Vec<SelectorRule>,
    pub product_category: Vec<SelectorRule>,
    pub product_images: Vec<SelectorRule>,

    // Blog
    pub blog_date: Vec<SelectorRule>,
    pub blog_description: Vec<SelectorRule>,
    pub blog_paragraphs: Vec<SelectorRule>,
    pub blog_categories: Vec<SelectorRule>,
    pub blog_content: Vec<SelectorRule>,
    pub blog_images: Vec<SelectorRule>,
    pub placeholder_image: String,

    // Category
    pub category_path_prefixes: Vec<String>,
    pub category_heading: Vec<SelectorRule>,
    pub category_images: Vec<SelectorRule>,

    // Static
    pub static_content: Vec<SelectorRule>,
    pub static_images: Vec<SelectorRule>,
}

impl Default for CompiledRules {
    fn default() -> Self {
        ExtractionRules::default().compile()
    }
}

fn fixed(rules: &[&str]) -> Vec<SelectorRule> {
    rules.iter().filter_map(|r| SelectorRule::parse(r)).collect()
}

impl ExtractionRules {
    /// Compiles every chain; rules that do not parse are dropped
    pub fn compile(&self) -> CompiledRules {
        let compile = SelectorRule::compile_all;
        CompiledRules {
            og_title: fixed(&["meta[property='og:title']@content"]),
            document_title: fixed(&["title"]),
            og_description: fixed(&["meta[property='og:description']@content"]),
            meta_description: fixed(&["meta[name='description']@content"]),
            og_image: fixed(&["meta[property='og:image']@content"]),
            heading: fixed(&["h1"]),
            breadcrumb: compile(&self.breadcrumb),
            breadcrumb_items: compile(&self.breadcrumb_items),

            blog_marker: compile(&self.blog_marker),
            product_marker: compile(&self.product_marker),
            category_marker: compile(&self.category_marker),

            price: compile(&self.price),
            stock: compile(&self.stock),
            stock_negative_keywords: self.stock_negative_keywords.clone(),
            feature_groups: compile(&self.feature_groups),
            feature_paragraphs: compile(&self.feature_paragraphs),
            comments: compile(&self.comments),
            product_category: compile(&self.product_category),
            product_images: compile(&self.product_images),

            blog_date: compile(&self.blog_date),
            blog_description: compile(&self.blog_description),
            blog_paragraphs: compile(&self.blog_paragraphs),
            blog_categories: compile(&self.blog_categories),
            blog_content: compile(&self.blog_content),
            blog_images: compile(&self.blog_images),
            placeholder_image: self.placeholder_image.clone(),

            category_path_prefixes: self.category_path_prefixes.clone(),
            category_heading: compile(&self.category_heading),
            category_images: compile(&self.category_images),

            static_content: compile(&self.static_content),
            static_images: compile(&self.static_images),
        }
    }
}
