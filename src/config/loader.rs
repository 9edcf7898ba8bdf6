//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, applying environment overrides,
//! validating all parameters and providing clear error messages
//! for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::AppConfig;
use crate::usecases::catalog::MAX_PAGE_SIZE;

/// Overrides the configured venue base URL.
pub const BASE_URL_ENV: &str = "KALSHI_API_BASE_URL";
/// Overrides the configured per-call timeout (milliseconds).
pub const TIMEOUT_MS_ENV: &str = "KALSHI_TIMEOUT_MS";

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - An environment override is malformed
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    base_url = %config.api.base_url,
    timeout_ms = config.api.timeout_ms,
    page_size = config.catalog.page_size,
    top_n = config.catalog.top_n,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Like `load_config`, but a missing file yields the defaults.
///
/// A file that exists and is invalid is still an error.
pub fn load_config_or_default(path: &str) -> Result<AppConfig> {
  if Path::new(path).exists() {
    return load_config(path);
  }
  warn!(path, "Config file not found, using defaults");
  let mut config = AppConfig::default();
  apply_overrides(&mut config, |key| std::env::var(key).ok())?;
  validate_config(&config)?;
  Ok(config)
}

/// Parse TOML text, apply process env overrides, validate.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let mut config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse config.toml")?;
  apply_overrides(&mut config, |key| std::env::var(key).ok())?;
  validate_config(&config)?;
  Ok(config)
}

/// Apply environment overrides read through `lookup`.
pub fn apply_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<()>
where
  F: Fn(&str) -> Option<String>,
{
  if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
    config.api.base_url = url.trim().to_string();
  }
  if let Some(raw) = lookup(TIMEOUT_MS_ENV) {
    config.api.timeout_ms = raw
      .trim()
      .parse()
      .with_context(|| format!("{TIMEOUT_MS_ENV} must be an integer, got {raw:?}"))?;
  }
  Ok(())
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  // Logging
  anyhow::ensure!(
    matches!(config.client.log_format.as_str(), "json" | "pretty"),
    "log_format must be \"json\" or \"pretty\", got {:?}",
    config.client.log_format
  );

  // API validation
  anyhow::ensure!(
    config.api.base_url.starts_with("https://") || config.api.base_url.starts_with("http://"),
    "API base_url must be an http(s) URL, got {:?}",
    config.api.base_url
  );
  anyhow::ensure!(
    config.api.timeout_ms > 0,
    "timeout_ms must be positive"
  );
  anyhow::ensure!(
    config.api.max_concurrent > 0,
    "max_concurrent must be positive"
  );
  anyhow::ensure!(
    config.api.requests_per_second > 0,
    "requests_per_second must be positive"
  );

  // Catalog validation
  anyhow::ensure!(
    (1..=MAX_PAGE_SIZE).contains(&config.catalog.page_size),
    "page_size must be in [1, {}], got {}",
    MAX_PAGE_SIZE,
    config.catalog.page_size
  );
  anyhow::ensure!(config.catalog.top_n > 0, "top_n must be positive");

  // Orders validation
  anyhow::ensure!(config.orders.lot_size > 0, "lot_size must be positive");

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_empty_file_is_all_defaults() {
    let config: AppConfig = toml::from_str("").unwrap();
    assert!(validate_config(&config).is_ok());
    assert_eq!(config.api.timeout_ms, 10_000);
    assert_eq!(config.catalog.page_size, 200);
    assert_eq!(config.orders.lot_size, 1);
    assert_eq!(config.client.log_format, "json");
  }

  #[test]
  fn test_partial_section_keeps_other_defaults() {
    let config: AppConfig = toml::from_str(
      r#"
        [catalog]
        top_n = 25
      "#,
    )
    .unwrap();
    assert_eq!(config.catalog.top_n, 25);
    assert_eq!(config.catalog.page_size, 200);
  }

  #[test]
  fn test_rejects_oversized_page() {
    let config: AppConfig = toml::from_str("[catalog]\npage_size = 500").unwrap();
    assert!(validate_config(&config).is_err());
  }

  #[test]
  fn test_rejects_unknown_log_format() {
    let config: AppConfig = toml::from_str("[client]\nlog_format = \"xml\"").unwrap();
    assert!(validate_config(&config).is_err());
  }

  #[test]
  fn test_env_overrides() {
    let mut config = AppConfig::default();
    apply_overrides(&mut config, |key| match key {
      BASE_URL_ENV => Some("https://demo-api.kalshi.co".to_string()),
      TIMEOUT_MS_ENV => Some("2500".to_string()),
      _ => None,
    })
    .unwrap();
    assert_eq!(config.api.base_url, "https://demo-api.kalshi.co");
    assert_eq!(config.api.client_config().timeout.as_millis(), 2500);
  }

  #[test]
  fn test_malformed_timeout_override_fails() {
    let mut config = AppConfig::default();
    let result = apply_overrides(&mut config, |key| {
      (key == TIMEOUT_MS_ENV).then(|| "soon".to_string())
    });
    assert!(result.is_err());
  }
}
