use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use url::Url;

/// Content category a page belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Product,
    Blog,
    Category,
    Static,
    Others,
}

impl PageKind {
    /// All kinds, in reporting order
    pub const ALL: [PageKind; 5] = [
        PageKind::Product,
        PageKind::Blog,
        PageKind::Category,
        PageKind::Static,
        PageKind::Others,
    ];

    /// Returns the lowercase label used in output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Blog => "blog",
            Self::Category => "category",
            Self::Static => "static",
            Self::Others => "others",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields extracted from a product page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub price: Option<String>,
    pub stock_status: String,
    pub features: Vec<String>,
    pub comments: Vec<String>,
    pub category: String,
    pub images: Vec<String>,
}

/// Fields extracted from a blog post
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDetails {
    pub date: String,
    pub blog_categories: Vec<String>,
    pub blog_content: Option<String>,
    pub images: Vec<String>,
}

/// Fields extracted from a category listing
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetails {
    pub category: String,
    pub images: Vec<String>,
}

/// Image list shared by static and unclassified pages
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlainDetails {
    pub images: Vec<String>,
}

/// Category-specific payload, tagged by `type` when serialized
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PagePayload {
    Product(ProductDetails),
    Blog(BlogDetails),
    Category(CategoryDetails),
    Static(PlainDetails),
    Others(PlainDetails),
}

impl PagePayload {
    pub fn kind(&self) -> PageKind {
        match self {
            Self::Product(_) => PageKind::Product,
            Self::Blog(_) => PageKind::Blog,
            Self::Category(_) => PageKind::Category,
            Self::Static(_) => PageKind::Static,
            Self::Others(_) => PageKind::Others,
        }
    }

    pub fn images(&self) -> &[String] {
        match self {
            Self::Product(d) => &d.images,
            Self::Blog(d) => &d.images,
            Self::Category(d) => &d.images,
            Self::Static(d) | Self::Others(d) => &d.images,
        }
    }
}

/// One record per discovered URL
///
/// The envelope fields are common to every kind; `payload` carries the
/// fields of the kind the extractor settled on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_data: Option<serde_json::Value>,
    pub breadcrumb: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set on records injected by the coverage guarantor
    pub synthetic: bool,
    #[serde(flatten)]
    pub payload: PagePayload,
}

impl PageRecord {
    pub fn kind(&self) -> PageKind {
        self.payload.kind()
    }

    pub fn images(&self) -> &[String] {
        self.payload.images()
    }

    /// Record kept for a page that could not be fetched or parsed
    pub fn fallback(url: &str, error: impl Into<String>) -> Self {
        let title = title_from_url(url);
        Self {
            url: url.to_string(),
            description: title.clone(),
            title,
            timestamp: Utc::now(),
            structured_data: None,
            breadcrumb: Vec::new(),
            error: Some(error.into()),
            synthetic: false,
            payload: PagePayload::Others(PlainDetails::default()),
        }
    }

    /// Builds a minimal static record from nothing but the URL's slug
    ///
    /// ```
    /// use site_census::record::{PageKind, PageRecord};
    ///
    /// let record = PageRecord::minimal_static("https://example.com/about-us");
    /// assert_eq!(record.kind(), PageKind::Static);
    /// assert_eq!(record.title, "About Us");
    /// ```
    pub fn minimal_static(url: &str) -> Self {
        let title = title_from_url(url);
        Self {
            url: url.to_string(),
            description: title.clone(),
            title,
            timestamp: Utc::now(),
            structured_data: None,
            breadcrumb: Vec::new(),
            error: None,
            synthetic: false,
            payload: PagePayload::Static(PlainDetails::default()),
        }
    }
}

/// Returns the last non-empty, percent-decoded segment of a URL path
pub fn last_path_segment(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .last()?
        .to_string();
    Some(
        urlencoding::decode(&segment)
            .map(|s| s.into_owned())
            .unwrap_or(segment),
    )
}

/// Turns a slug such as `mens-running_shoes` into `Mens Running Shoes`
pub fn humanize_slug(slug: &str) -> String {
    let slug = slug
        .trim_end_matches(".html")
        .trim_end_matches(".htm")
        .trim_end_matches(".php");

    slug.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Humanized last path segment, or the host for a bare origin
pub fn title_from_url(url: &str) -> String {
    if let Some(segment) = last_path_segment(url) {
        let title = humanize_slug(&segment);
        if !title.is_empty() {
            return title;
        }
    }

    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}
