//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the pipeline, including:
//! - Building the HTTP client with an identifying user agent string
//! - HEAD requests used to probe for sitemap locations
//! - GET requests returning the page body
//! - Waiting out HTTP 429 responses and re-issuing the request

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::CensusError;
use reqwest::header::{HeaderValue, RETRY_AFTER};
use reqwest::{Client, Method, Response, StatusCode};
use std::time::Duration;

/// Per-request options
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Overrides the client's default timeout for this request
    pub timeout: Option<Duration>,
}

impl FetchOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site_census::config::{FetcherConfig, UserAgentConfig};
/// use site_census::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    config: &FetcherConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(config.timeout())
        .connect_timeout(Duration::from_secs(10).min(config.timeout()))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Rate-limit aware HTTP client
///
/// A 429 response is answered by sleeping for the server's `retry-after`
/// (whole seconds, falling back to the configured default) and sending the
/// identical request again. Every 429 earns one retry, so retries chain for
/// as long as the server keeps answering 429 unless a bound is configured.
/// Any other error status is returned to the caller unchanged.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    default_retry_after: Duration,
    max_rate_limit_retries: Option<u32>,
}

impl Fetcher {
    pub fn new(config: &FetcherConfig, user_agent: &UserAgentConfig) -> Result<Self, CensusError> {
        Ok(Self::with_client(build_http_client(config, user_agent)?, config))
    }

    pub fn with_client(client: Client, config: &FetcherConfig) -> Self {
        Self {
            client,
            default_retry_after: config.default_retry_after(),
            max_rate_limit_retries: config.max_rate_limit_retries,
        }
    }

    /// Fetches a URL and returns its body as text
    pub async fn get(&self, url: &str, options: FetchOptions) -> Result<String, CensusError> {
        let response = self.send(Method::GET, url, options).await?;
        response.text().await.map_err(|e| classify_error(url, e))
    }

    /// Sends a HEAD request; success statuses are returned, others are errors
    pub async fn head(&self, url: &str) -> Result<StatusCode, CensusError> {
        let response = self.send(Method::HEAD, url, FetchOptions::default()).await?;
        Ok(response.status())
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        options: FetchOptions,
    ) -> Result<Response, CensusError> {
        let mut attempts = 0;

        loop {
            let mut request = self.client.request(method.clone(), url);
            if let Some(timeout) = options.timeout {
                request = request.timeout(timeout);
            }

            let response = request.send().await.map_err(|e| classify_error(url, e))?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if self
                    .max_rate_limit_retries
                    .is_some_and(|max| attempts >= max)
                {
                    return Err(CensusError::RateLimited {
                        url: url.to_string(),
                        attempts,
                    });
                }

                let wait =
                    parse_retry_after(response.headers().get(RETRY_AFTER), self.default_retry_after);
                attempts += 1;
                tracing::warn!(
                    "Rate limited on {}, retrying in {:?} (attempt {})",
                    url,
                    wait,
                    attempts
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                return Err(CensusError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            return Ok(response);
        }
    }
}

/// Reads a `retry-after` header as whole seconds
pub fn parse_retry_after(value: Option<&HeaderValue>, default: Duration) -> Duration {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

fn classify_error(url: &str, error: reqwest::Error) -> CensusError {
    if error.is_timeout() {
        CensusError::Timeout {
            url: url.to_string(),
        }
    } else {
        CensusError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_fetcher(max_retries: Option<u32>) -> Fetcher {
        let config = FetcherConfig {
            max_rate_limit_retries: max_retries,
            default_retry_after_secs: 0,
            ..FetcherConfig::default()
        };
        Fetcher::new(&config, &UserAgentConfig::default()).unwrap()
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&FetcherConfig::default(), &UserAgentConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_parse_retry_after() {
        let default = Duration::from_secs(30);
        assert_eq!(
            parse_retry_after(Some(&HeaderValue::from_static("2")), default),
            Duration::from_secs(2)
        );
        assert_eq!(
            parse_retry_after(Some(&HeaderValue::from_static("soon")), default),
            default
        );
        assert_eq!(parse_retry_after(None, default), default);
    }

    #[tokio::test]
    async fn test_get_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let fetcher = test_fetcher(None);
        let body = fetcher
            .get(&format!("{}/page", server.uri()), FetchOptions::default())
            .await
            .unwrap();
        assert_eq!(body, "hello");
    }

    #[tokio::test]
    async fn test_retries_after_429() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
            .up_to_n_times(2)
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(200).set_body_string("done"))
            .with_priority(2)
            .mount(&server)
            .await;

        let fetcher = test_fetcher(None);
        let body = fetcher
            .get(&format!("{}/busy", server.uri()), FetchOptions::default())
            .await
            .unwrap();
        assert_eq!(body, "done");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 3);
    }

    #[tokio::test]
    async fn test_repeated_429_chain_without_bound() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
            .up_to_n_times(8)
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(200).set_body_string("done"))
            .with_priority(2)
            .mount(&server)
            .await;

        let config = FetcherConfig {
            default_retry_after_secs: 0,
            ..FetcherConfig::default()
        };
        assert_eq!(config.max_rate_limit_retries, None);
        let fetcher = Fetcher::new(&config, &UserAgentConfig::default()).unwrap();

        let body = fetcher
            .get(&format!("{}/busy", server.uri()), FetchOptions::default())
            .await
            .unwrap();
        assert_eq!(body, "done");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 9);
    }

    #[tokio::test]
    async fn test_gives_up_after_retry_bound() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
            .mount(&server)
            .await;

        let fetcher = test_fetcher(Some(1));
        let err = fetcher
            .get(&format!("{}/busy", server.uri()), FetchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CensusError::RateLimited { attempts: 1, .. }));
    }

    #[tokio::test]
    async fn test_error_status_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = test_fetcher(None);
        let err = fetcher
            .get(&format!("{}/missing", server.uri()), FetchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CensusError::Status { status: 404, .. }));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_head_probe() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let fetcher = test_fetcher(None);
        assert!(fetcher
            .head(&format!("{}/sitemap.xml", server.uri()))
            .await
            .is_ok());
        assert!(fetcher
            .head(&format!("{}/other.xml", server.uri()))
            .await
            .is_err());
    }
}
