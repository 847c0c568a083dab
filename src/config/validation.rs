use crate::config::types::{
    Config, CoverageConfig, DiscoveryConfig, FetcherConfig, SchedulerConfig, UserAgentConfig,
};
use crate::extract::{ExtractionRules, SelectorRule};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_scheduler_config(&config.scheduler)?;
    validate_discovery_config(&config.discovery)?;
    validate_coverage_config(&config.coverage)?;
    validate_extraction_rules(&config.extraction)?;
    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 || config.page_timeout_secs == 0 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be > 0s, got timeout-secs={} page-timeout-secs={}",
            config.timeout_secs, config.page_timeout_secs
        )));
    }

    if config.default_retry_after_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "default-retry-after-secs must be <= 600, got {}",
            config.default_retry_after_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

fn validate_scheduler_config(config: &SchedulerConfig) -> Result<(), ConfigError> {
    if config.window_size < 1 || config.window_size > 100 {
        return Err(ConfigError::Validation(format!(
            "window-size must be between 1 and 100, got {}",
            config.window_size
        )));
    }

    Ok(())
}

fn validate_discovery_config(config: &DiscoveryConfig) -> Result<(), ConfigError> {
    if config.max_depth > 10 {
        return Err(ConfigError::Validation(format!(
            "max-depth must be <= 10, got {}",
            config.max_depth
        )));
    }

    Ok(())
}

fn validate_coverage_config(config: &CoverageConfig) -> Result<(), ConfigError> {
    if config.max_category_pages == 0 {
        return Err(ConfigError::Validation(
            "max-category-pages must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Every extraction selector must compile, so extraction never meets a bad rule
fn validate_extraction_rules(rules: &ExtractionRules) -> Result<(), ConfigError> {
    for (field, rule) in rules.named_rules() {
        if SelectorRule::parse(rule).is_none() {
            return Err(ConfigError::InvalidSelector {
                field: field.to_string(),
                selector: rule.to_string(),
            });
        }
    }

    Ok(())
}

/// Validates an email address (basic format check)
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact-email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    Ok(())
}
