use crate::common::{mount_html, mount_xml, sitemap_index, test_config, urlset};
use site_census::crawler::{Pipeline, UrlLimit};
use site_census::output::CountingObserver;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_cyclic_index_terminates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // The index lists itself next to a real urlset
    mount_xml(
        &mock_server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/sitemap.xml", base_url),
            format!("{}/pages.xml", base_url),
        ]),
    )
    .await;
    mount_xml(
        &mock_server,
        "/pages.xml",
        urlset(&[format!("{}/sayfa/hakkimizda", base_url)]),
    )
    .await;

    let pipeline = Pipeline::new(test_config()).expect("Failed to create pipeline");
    let urls = pipeline
        .discover(&format!("{}/sitemap.xml", base_url), UrlLimit::Unlimited)
        .await;

    assert_eq!(urls, vec![format!("{}/sayfa/hakkimizda", base_url)]);
}

#[tokio::test]
async fn test_failed_child_keeps_siblings() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        sitemap_index(&[
            format!("{}/broken.xml", base_url),
            format!("{}/garbage.xml", base_url),
            format!("{}/good.xml", base_url),
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/garbage.xml", "<html>not a sitemap</html>").await;
    mount_xml(
        &mock_server,
        "/good.xml",
        urlset(&[
            format!("{}/urun/1", base_url),
            "/relative/skipped".to_string(),
        ]),
    )
    .await;

    let observer = Arc::new(CountingObserver::new());
    let pipeline = Pipeline::with_observer(test_config(), observer.clone())
        .expect("Failed to create pipeline");
    let urls = pipeline
        .discover(&format!("{}/sitemap_index.xml", base_url), UrlLimit::Unlimited)
        .await;

    assert_eq!(urls, vec![format!("{}/urun/1", base_url)]);
    assert_eq!(observer.sitemap_failures(), 2);
}

#[tokio::test]
async fn test_bare_site_uses_robots_declaration() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "User-agent: *\nAllow: /\nSitemap: {}/maps/site-map.xml\n",
            base_url
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/maps/site-map.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    mount_xml(
        &mock_server,
        "/maps/site-map.xml",
        urlset(&[
            format!("{}/kategori/a", base_url),
            format!("{}/kategori/b", base_url),
        ]),
    )
    .await;

    let pipeline = Pipeline::new(test_config()).expect("Failed to create pipeline");
    let urls = pipeline
        .discover(&format!("{}/", base_url), UrlLimit::Unlimited)
        .await;

    assert_eq!(urls.len(), 2);
    assert!(urls.contains(&format!("{}/kategori/b", base_url)));
}

#[tokio::test]
async fn test_bare_site_falls_back_to_default_location() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // No robots.txt and no HEAD support: every probe fails
    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/blog/icerik/post", base_url)]),
    )
    .await;

    let pipeline = Pipeline::new(test_config()).expect("Failed to create pipeline");
    let urls = pipeline.discover(&base_url, UrlLimit::Unlimited).await;

    assert_eq!(urls, vec![format!("{}/blog/icerik/post", base_url)]);
}

#[tokio::test]
async fn test_limit_counts_distinct_urls() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let page = |p: &str| format!("{}{}", base_url, p);
    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[page("/a"), page("/a"), page("/b"), page("/c")]),
    )
    .await;

    let pipeline = Pipeline::new(test_config()).expect("Failed to create pipeline");
    let urls = pipeline
        .discover(&page("/sitemap.xml"), UrlLimit::Max(2))
        .await;

    assert_eq!(urls, vec![page("/a"), page("/b")]);
}
