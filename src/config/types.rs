use crate::classify::ClassifierRules;
use crate::extract::ExtractionRules;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Site-Census
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub scheduler: SchedulerConfig,
    pub discovery: DiscoveryConfig,
    pub coverage: CoverageConfig,
    pub classifier: ClassifierRules,
    pub extraction: ExtractionRules,
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Default per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Timeout used when fetching a page for extraction (seconds)
    pub page_timeout_secs: u64,

    /// Wait applied on HTTP 429 when `retry-after` is absent or invalid (seconds)
    pub default_retry_after_secs: u64,

    /// Optional bound on chained 429 retries for a single request
    ///
    /// Unset means every 429 is waited out, however many arrive.
    pub max_rate_limit_retries: Option<u32>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            page_timeout_secs: 15,
            default_retry_after_secs: 30,
            max_rate_limit_retries: None,
        }
    }
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn default_retry_after(&self) -> Duration {
        Duration::from_secs(self.default_retry_after_secs)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,

    /// Email address for crawler-related contact
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SiteCensus".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/site-census/site-census".to_string(),
            contact_email: "crawler@site-census.dev".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the user agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Batch scheduling configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SchedulerConfig {
    /// Number of items run concurrently in one window
    pub window_size: usize,

    /// Pause between consecutive windows (milliseconds)
    pub batch_delay_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            batch_delay_ms: 500,
        }
    }
}

/// Sitemap discovery configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DiscoveryConfig {
    /// Deepest sitemap index nesting followed; deeper nodes yield nothing
    pub max_depth: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self { max_depth: 5 }
    }
}

/// Coverage guarantor configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CoverageConfig {
    /// Category pages crawled when looking for missing product URLs
    pub max_category_pages: usize,

    /// Synthetic categories are injected below this many real category records
    pub min_category_records: usize,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            max_category_pages: 10,
            min_category_records: 3,
        }
    }
}
