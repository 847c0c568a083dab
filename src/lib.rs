//! Site-Census: a sitemap-driven site inventory
//!
//! This crate discovers every page of a website through its sitemap, sorts each
//! URL into a content category, extracts category-specific fields from the
//! page markup, and backfills categories the site under-represents so that
//! every category reported carries at least one record.

pub mod classify;
pub mod config;
pub mod coverage;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod record;
pub mod sitemap;

use thiserror::Error;

/// Main error type for Site-Census operations
#[derive(Debug, Error)]
pub enum CensusError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Still rate limited after {attempts} retries: {url}")]
    RateLimited { url: String, attempts: u32 },

    #[error("Sitemap XML error for {url}: {message}")]
    Xml { url: String, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector for {field}: '{selector}'")]
    InvalidSelector { field: String, selector: String },
}

/// Result type alias for Site-Census operations
pub type Result<T> = std::result::Result<T, CensusError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use classify::{CategoryBuckets, Classifier};
pub use config::Config;
pub use crawler::{Pipeline, UrlLimit};
pub use record::{PageKind, PagePayload, PageRecord, PipelineResult, PipelineStats};
