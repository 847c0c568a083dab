use site_census::config::Config;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration tuned for fast local runs
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.fetcher.timeout_secs = 5;
    config.fetcher.page_timeout_secs = 5;
    config.fetcher.default_retry_after_secs = 1;
    config.fetcher.max_rate_limit_retries = Some(2);
    config.user_agent.crawler_name = "TestBot".to_string();
    config.scheduler.window_size = 2;
    config.scheduler.batch_delay_ms = 0;
    config.discovery.max_depth = 3;
    config
}

pub fn urlset(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<url><loc>{}</loc></url>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

pub fn sitemap_index(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<sitemap><loc>{}</loc></sitemap>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

/// Mounts a GET route returning `body` with the given content type
pub async fn mount_get(server: &MockServer, route: &str, body: String, content_type: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", content_type),
        )
        .mount(server)
        .await;
}

pub async fn mount_xml(server: &MockServer, route: &str, body: String) {
    mount_get(server, route, body, "application/xml").await;
}

pub async fn mount_html(server: &MockServer, route: &str, body: &str) {
    mount_get(server, route, body.to_string(), "text/html").await;
}
