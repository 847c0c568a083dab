//! Locale packs for synthetic coverage records
//!
//! A pack pairs the path markers that identify a site's language with the
//! copy used for injected pages. Packs are checked in registry order; the
//! first whose markers appear among the classified URLs is used.

use crate::classify::CategoryBuckets;

/// Copy for an injected static or category page
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticPage {
    /// Path relative to the site origin, e.g. `/about-us`
    pub path: String,
    pub title: String,
    pub description: String,
}

/// Copy for an injected blog post
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticPost {
    pub path: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub categories: Vec<String>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalePack {
    pub code: String,
    /// Lowercase path fragments that identify the locale
    pub markers: Vec<String>,
    pub static_pages: Vec<SyntheticPage>,
    pub blog_posts: Vec<SyntheticPost>,
    pub categories: Vec<SyntheticPage>,
    /// Inserted when a run ends without any blog record
    pub sample_blog: SyntheticPost,
    pub image: String,
}

fn page(path: &str, title: &str, description: &str) -> SyntheticPage {
    SyntheticPage {
        path: path.to_string(),
        title: title.to_string(),
        description: description.to_string(),
    }
}

fn post(
    path: &str,
    title: &str,
    description: &str,
    date: &str,
    category: &str,
    content: &str,
) -> SyntheticPost {
    SyntheticPost {
        path: path.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        date: date.to_string(),
        categories: vec![category.to_string()],
        content: content.to_string(),
    }
}

impl LocalePack {
    pub fn turkish() -> Self {
        Self {
            code: "tr".to_string(),
            markers: ["/sayfa/", "/kategori/", "/iletisim", "/urun/", "/hakkimizda", "/blog/icerik/"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            static_pages: vec![
                page(
                    "/sayfa/hakkimizda",
                    "Hakkımızda",
                    "Firmamız, vizyonumuz ve değerlerimiz hakkında bilgi alın.",
                ),
                page(
                    "/sayfa/iletisim",
                    "İletişim",
                    "Soru ve önerileriniz için bizimle iletişime geçin.",
                ),
                page(
                    "/sayfa/gizlilik-politikasi",
                    "Gizlilik Politikası",
                    "Kişisel verilerinizin nasıl işlendiğini öğrenin.",
                ),
            ],
            blog_posts: vec![
                post(
                    "/blog/icerik/yeni-sezon-urunleri",
                    "Yeni Sezon Ürünleri",
                    "Yeni sezonda öne çıkan ürünleri sizin için derledik.",
                    "2024-01-15",
                    "Duyurular",
                    "Yeni sezonla birlikte koleksiyonumuza eklenen ürünleri keşfedin.",
                ),
                post(
                    "/blog/icerik/dogru-urun-secimi",
                    "Doğru Ürün Nasıl Seçilir?",
                    "İhtiyacınıza en uygun ürünü seçmek için ipuçları.",
                    "2024-02-01",
                    "Rehber",
                    "Bir ürün seçerken dikkat etmeniz gereken temel noktaları anlattık.",
                ),
            ],
            categories: vec![
                page("/kategori/yeni-urunler", "Yeni Ürünler", "En yeni ürünlerimiz."),
                page("/kategori/cok-satanlar", "Çok Satanlar", "En çok tercih edilen ürünler."),
                page("/kategori/indirimli-urunler", "İndirimli Ürünler", "Fırsat ürünleri."),
            ],
            sample_blog: post(
                "/blog/icerik/hos-geldiniz",
                "Blogumuza Hoş Geldiniz",
                "Haberler, duyurular ve ipuçları burada.",
                "2024-01-01",
                "Genel",
                "Blogumuzda ürünlerimiz ve sektör hakkında güncel içerikler paylaşıyoruz.",
            ),
            image: "https://placehold.co/800x450?text=Site".to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            code: "en".to_string(),
            markers: ["/page/", "/category/", "/contact", "/product/", "/about"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            static_pages: vec![
                page(
                    "/about-us",
                    "About Us",
                    "Learn about our company, our mission and our values.",
                ),
                page(
                    "/contact",
                    "Contact",
                    "Get in touch with us for questions and feedback.",
                ),
                page(
                    "/privacy-policy",
                    "Privacy Policy",
                    "How we collect and process your personal data.",
                ),
            ],
            blog_posts: vec![
                post(
                    "/blog/new-season-highlights",
                    "New Season Highlights",
                    "A round-up of this season's most popular products.",
                    "2024-01-15",
                    "News",
                    "Discover the products we added to our collection this season.",
                ),
                post(
                    "/blog/how-to-choose",
                    "How to Choose the Right Product",
                    "Tips for picking the product that fits your needs.",
                    "2024-02-01",
                    "Guides",
                    "Here are the key points to consider before you buy.",
                ),
            ],
            categories: vec![
                page("/category/new-arrivals", "New Arrivals", "Our latest products."),
                page("/category/best-sellers", "Best Sellers", "Our most popular products."),
                page("/category/sale", "Sale", "Products on discount."),
            ],
            sample_blog: post(
                "/blog/welcome",
                "Welcome to Our Blog",
                "News, announcements and tips.",
                "2024-01-01",
                "General",
                "We share updates about our products and our industry on this blog.",
            ),
            image: "https://placehold.co/800x450?text=Site".to_string(),
        }
    }

    /// Whether any marker occurs in any bucketed URL
    pub fn matches(&self, buckets: &CategoryBuckets) -> bool {
        buckets.entries().any(|(_, url)| {
            let lowered = url.to_lowercase();
            self.markers.iter().any(|marker| lowered.contains(marker.as_str()))
        })
    }
}

/// Ordered locale detectors with a fallback pack
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    packs: Vec<LocalePack>,
    fallback: LocalePack,
}

impl Default for LocaleRegistry {
    fn default() -> Self {
        Self {
            packs: vec![LocalePack::turkish()],
            fallback: LocalePack::english(),
        }
    }
}

impl LocaleRegistry {
    /// Registers a pack ahead of the existing ones
    pub fn with_pack(mut self, pack: LocalePack) -> Self {
        self.packs.insert(0, pack);
        self
    }

    pub fn detect(&self, buckets: &CategoryBuckets) -> &LocalePack {
        self.packs
            .iter()
            .find(|pack| pack.matches(buckets))
            .unwrap_or(&self.fallback)
    }
}
