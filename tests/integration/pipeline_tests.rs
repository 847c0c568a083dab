use crate::common::{mount_html, mount_xml, sitemap_index, test_config, urlset};
use site_census::crawler::{Pipeline, UrlLimit};
use site_census::output::{write_json, CountingObserver};
use site_census::record::{PageKind, PagePayload, PipelineResult};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRODUCT_PAGE: &str = r#"<html><head>
    <title>Koşu Ayakkabısı</title>
    <meta name="description" content="Hafif koşu ayakkabısı">
    </head><body>
    <div class="product-detail">
      <span class="price">1.299,00 TL</span>
      <span class="stock">Stokta</span>
      <div class="product-gallery"><img src="/img/runner.jpg"></div>
    </div>
    </body></html>"#;

const CATEGORY_PAGE: &str = r#"<html><head><title>Ayakkabılar</title></head><body>
    <h1>Ayakkabılar</h1>
    <ul class="product-list"><li><img src="/img/a.jpg"></li></ul>
    </body></html>"#;

const STATIC_PAGE: &str = r#"<html><head><title>Hakkımızda</title></head><body>
    <main><h1>Hakkımızda</h1><div class="page-content">Biz bir ayakkabı mağazasıyız.</div></main>
    </body></html>"#;

fn assert_stats_consistent(result: &PipelineResult) {
    let stats = &result.stats;
    let sum: usize = PageKind::ALL.iter().map(|k| stats.get(*k)).sum();
    assert_eq!(sum, stats.total);
    assert_eq!(stats.total, result.records.len());
    for kind in PageKind::ALL {
        assert_eq!(
            stats.get(kind),
            result.records.values().filter(|r| r.kind() == kind).count()
        );
    }
}

/// Serves a two-child sitemap index: one product, one category, one static page
async fn mount_small_shop(mock_server: &MockServer) {
    let base_url = mock_server.uri();

    mount_xml(
        mock_server,
        "/sitemap_index.xml",
        sitemap_index(&[
            format!("{}/sitemap-products.xml", base_url),
            format!("{}/sitemap-pages.xml", base_url),
        ]),
    )
    .await;
    mount_xml(
        mock_server,
        "/sitemap-products.xml",
        urlset(&[format!("{}/urun/1", base_url)]),
    )
    .await;
    mount_xml(
        mock_server,
        "/sitemap-pages.xml",
        urlset(&[
            format!("{}/kategori/a", base_url),
            format!("{}/sayfa/hakkimizda", base_url),
        ]),
    )
    .await;

    mount_html(mock_server, "/urun/1", PRODUCT_PAGE).await;
    mount_html(mock_server, "/kategori/a", CATEGORY_PAGE).await;
    mount_html(mock_server, "/sayfa/hakkimizda", STATIC_PAGE).await;
}

#[tokio::test]
async fn test_end_to_end_sitemap_index() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_small_shop(&mock_server).await;

    let observer = Arc::new(CountingObserver::new());
    let pipeline = Pipeline::with_observer(test_config(), observer.clone())
        .expect("Failed to create pipeline");
    let result = pipeline
        .run_site(&format!("{}/sitemap_index.xml", base_url), UrlLimit::Unlimited)
        .await;

    assert_stats_consistent(&result);
    assert_eq!(result.stats.product, 1);
    assert_eq!(result.stats.others, 0);
    assert!(result.stats.category >= 1);
    assert!(result.stats.static_pages >= 1);

    let real: Vec<_> = result.records.values().filter(|r| !r.synthetic).collect();
    assert_eq!(real.len(), 3);

    let product = &result.records[&format!("{}/urun/1", base_url)];
    match &product.payload {
        PagePayload::Product(details) => {
            assert_eq!(details.price.as_deref(), Some("1.299,00 TL"));
            assert_eq!(details.stock_status, "Available");
            assert_eq!(details.images, vec![format!("{}/img/runner.jpg", base_url)]);
        }
        other => panic!("expected product, got {:?}", other.kind()),
    }

    let category = &result.records[&format!("{}/kategori/a", base_url)];
    assert_eq!(category.kind(), PageKind::Category);
    assert!(!category.synthetic);

    // The real page wins over the synthetic page for the same URL
    let about = &result.records[&format!("{}/sayfa/hakkimizda", base_url)];
    assert_eq!(about.kind(), PageKind::Static);
    assert!(!about.synthetic);
    assert_eq!(about.description, "Biz bir ayakkabı mağazasıyız.");

    assert_eq!(observer.extracted(PageKind::Product), 1);
    assert_eq!(observer.extraction_errors(), 0);
    assert!(observer.synthetic() > 0);
}

#[tokio::test]
async fn test_every_category_populated() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_small_shop(&mock_server).await;

    let pipeline = Pipeline::new(test_config()).expect("Failed to create pipeline");
    let result = pipeline
        .run_site(&format!("{}/sitemap_index.xml", base_url), UrlLimit::Unlimited)
        .await;

    assert!(result.stats.product > 0);
    assert!(result.stats.blog > 0);
    assert!(result.stats.category > 0);
    assert!(result.stats.static_pages > 0);

    // The site uses Turkish paths, so injected copy is Turkish
    assert!(result
        .records
        .contains_key(&format!("{}/sayfa/iletisim", base_url)));
    for record in result.records.values().filter(|r| r.synthetic) {
        assert!(!record.title.is_empty());
        assert!(!record.description.is_empty());
        assert!(!record.images().is_empty());
    }
}

#[tokio::test]
async fn test_failed_page_becomes_fallback() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/urun/kayip-urun"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/urun/2", PRODUCT_PAGE).await;

    let pipeline = Pipeline::new(test_config()).expect("Failed to create pipeline");
    let result = pipeline
        .run(vec![
            format!("{}/urun/kayip-urun", base_url),
            format!("{}/urun/2", base_url),
        ])
        .await;

    assert_stats_consistent(&result);

    let failed = &result.records[&format!("{}/urun/kayip-urun", base_url)];
    assert_eq!(failed.kind(), PageKind::Others);
    assert_eq!(failed.title, "Kayip Urun");
    assert!(failed.error.as_deref().unwrap_or_default().contains("500"));

    let ok = &result.records[&format!("{}/urun/2", base_url)];
    assert_eq!(ok.kind(), PageKind::Product);
    assert!(ok.error.is_none());
    assert_eq!(result.stats.product, 1);
}

#[tokio::test]
async fn test_rate_limited_page_is_retried() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/urun/populer"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/urun/populer", PRODUCT_PAGE).await;

    let pipeline = Pipeline::new(test_config()).expect("Failed to create pipeline");
    let result = pipeline
        .run(vec![format!("{}/urun/populer", base_url)])
        .await;

    let record = &result.records[&format!("{}/urun/populer", base_url)];
    assert_eq!(record.kind(), PageKind::Product);
    assert!(record.error.is_none());
}

#[tokio::test]
async fn test_supplements_products_and_blogs() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/kategori/ayakkabi", base_url)]),
    )
    .await;
    mount_html(
        &mock_server,
        "/kategori/ayakkabi",
        r#"<html><body><h1>Ayakkabı</h1>
            <a href="/urun/runner">Runner</a>
            <a href="/urun/trail#reviews">Trail</a>
            <a href="https://elsewhere.example/urun/x">External</a>
            <a href="/sayfa/iletisim">İletişim</a>
        </body></html>"#,
    )
    .await;
    mount_html(
        &mock_server,
        "/blog",
        r#"<html><body><a href="/blog/icerik/ilk-yazi">İlk yazı</a></body></html>"#,
    )
    .await;
    mount_html(&mock_server, "/urun/runner", PRODUCT_PAGE).await;
    mount_html(&mock_server, "/urun/trail", PRODUCT_PAGE).await;
    mount_html(
        &mock_server,
        "/blog/icerik/ilk-yazi",
        r#"<html><head><title>İlk Yazı</title></head><body>
            <article class="post"><div class="post-content"><p>Merhaba dünya.</p></div></article>
        </body></html>"#,
    )
    .await;

    let pipeline = Pipeline::new(test_config()).expect("Failed to create pipeline");
    let result = pipeline
        .run_site(&format!("{}/sitemap.xml", base_url), UrlLimit::Unlimited)
        .await;

    assert_stats_consistent(&result);
    assert_eq!(result.stats.product, 2);
    assert!(result
        .records
        .contains_key(&format!("{}/urun/trail", base_url)));
    assert!(!result
        .records
        .keys()
        .any(|url| url.contains("elsewhere.example")));

    let post = &result.records[&format!("{}/blog/icerik/ilk-yazi", base_url)];
    assert!(!post.synthetic);
    match &post.payload {
        PagePayload::Blog(details) => {
            assert_eq!(details.blog_content.as_deref(), Some("Merhaba dünya."));
        }
        other => panic!("expected blog, got {:?}", other.kind()),
    }
}

#[tokio::test]
async fn test_blog_category_pages_supplement_posts() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[
            format!("{}/blog/kategori/haber", base_url),
            format!("{}/blog/icerik/mevcut", base_url),
        ]),
    )
    .await;
    mount_html(
        &mock_server,
        "/blog/kategori/haber",
        r#"<html><body><h1>Haberler</h1>
            <a href="/blog/icerik/a">A</a>
            <a href="/blog/icerik/b">B</a>
            <a href="/blog/icerik/mevcut">Mevcut</a>
        </body></html>"#,
    )
    .await;
    for route in ["/blog/icerik/a", "/blog/icerik/b", "/blog/icerik/mevcut"] {
        mount_html(
            &mock_server,
            route,
            r#"<html><head><title>Yazı</title></head><body>
                <article class="post"><div class="post-content"><p>İçerik.</p></div></article>
            </body></html>"#,
        )
        .await;
    }

    let pipeline = Pipeline::new(test_config()).expect("Failed to create pipeline");
    let result = pipeline
        .run_site(&format!("{}/sitemap.xml", base_url), UrlLimit::Unlimited)
        .await;

    assert_stats_consistent(&result);
    for slug in ["a", "b", "mevcut"] {
        let record = &result.records[&format!("{}/blog/icerik/{}", base_url, slug)];
        assert_eq!(record.kind(), PageKind::Blog);
        assert!(!record.synthetic);
        assert!(record.error.is_none());
    }
}

#[tokio::test]
async fn test_empty_sitemap_gives_empty_result() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_xml(&mock_server, "/sitemap.xml", urlset(&[])).await;

    let pipeline = Pipeline::new(test_config()).expect("Failed to create pipeline");
    let result = pipeline
        .run_site(&format!("{}/sitemap.xml", base_url), UrlLimit::Unlimited)
        .await;

    assert!(result.is_empty());
    assert_eq!(result.stats.total, 0);
}

#[tokio::test]
async fn test_json_output_is_flat_array() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_small_shop(&mock_server).await;

    let pipeline = Pipeline::new(test_config()).expect("Failed to create pipeline");
    let result = pipeline
        .run_site(&format!("{}/sitemap_index.xml", base_url), UrlLimit::Max(1))
        .await;

    let mut buffer = Vec::new();
    write_json(&result, &mut buffer).expect("Failed to write JSON");
    let value: serde_json::Value = serde_json::from_slice(&buffer).expect("Invalid JSON");

    let array = value.as_array().expect("Expected a JSON array");
    assert_eq!(array.len(), result.stats.total);

    let product = array
        .iter()
        .find(|r| r["type"] == "product")
        .expect("Expected a product record");
    assert_eq!(product["url"], format!("{}/urun/1", base_url));
    assert_eq!(product["stockStatus"], "Available");
    assert_eq!(product["synthetic"], false);
}
