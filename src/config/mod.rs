//! Configuration Module - TOML-based Client Configuration
//!
//! Loads and validates configuration from `config.toml` with
//! environment variable overrides via `.env` files.
//! Credentials never live here; they are read from the environment
//! by `Credentials::from_env`.

pub mod loader;

use std::time::Duration;

use serde::Deserialize;

use crate::adapters::api::{KALSHI_PROD_URL, KalshiClientConfig};
use crate::domain::SizingRules;
use crate::domain::trending::DEFAULT_TOP_N;
use crate::usecases::catalog::DEFAULT_PAGE_SIZE;

/// Top-level client configuration.
///
/// Every section has defaults, so an empty file is a valid config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
  /// Client identity and logging.
  #[serde(default)]
  pub client: ClientConfig,
  /// Venue API endpoint and throttling.
  #[serde(default)]
  pub api: ApiConfig,
  /// Catalog fetch and trending parameters.
  #[serde(default)]
  pub catalog: CatalogConfig,
  /// Order sizing and listing parameters.
  #[serde(default)]
  pub orders: OrdersConfig,
}

/// Client identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
  /// Human-readable client name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// `json` or `pretty`.
  #[serde(default = "default_log_format")]
  pub log_format: String,
}

/// API endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Venue base URL (scheme + host).
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Per-call timeout in milliseconds.
  #[serde(default = "default_timeout_ms")]
  pub timeout_ms: u64,
  /// Maximum in-flight requests.
  #[serde(default = "default_max_concurrent")]
  pub max_concurrent: usize,
  /// Sustained request rate.
  #[serde(default = "default_requests_per_second")]
  pub requests_per_second: u32,
}

/// Catalog configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
  /// Events requested per page (1..=200).
  #[serde(default = "default_page_size")]
  pub page_size: u32,
  /// Events kept by the trending ranker.
  #[serde(default = "default_top_n")]
  pub top_n: usize,
}

/// Order configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersConfig {
  /// Computed order counts are rounded down to a multiple of this.
  #[serde(default = "default_lot_size")]
  pub lot_size: u32,
  /// Orders shown by `orders --recent` when no count is given.
  #[serde(default = "default_recent_limit")]
  pub recent_limit: usize,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
      log_format: default_log_format(),
    }
  }
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      timeout_ms: default_timeout_ms(),
      max_concurrent: default_max_concurrent(),
      requests_per_second: default_requests_per_second(),
    }
  }
}

impl Default for CatalogConfig {
  fn default() -> Self {
    Self {
      page_size: default_page_size(),
      top_n: default_top_n(),
    }
  }
}

impl Default for OrdersConfig {
  fn default() -> Self {
    Self {
      lot_size: default_lot_size(),
      recent_limit: default_recent_limit(),
    }
  }
}

impl ApiConfig {
  /// Transport settings for `KalshiClient`.
  pub fn client_config(&self) -> KalshiClientConfig {
    KalshiClientConfig {
      base_url: self.base_url.clone(),
      timeout: Duration::from_millis(self.timeout_ms),
      max_concurrent: self.max_concurrent,
      requests_per_second: self.requests_per_second,
    }
  }
}

impl OrdersConfig {
  pub fn sizing_rules(&self) -> SizingRules {
    SizingRules {
      lot_size: self.lot_size,
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "kalshi-venue".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_log_format() -> String {
  "json".to_string()
}

fn default_base_url() -> String {
  KALSHI_PROD_URL.to_string()
}

fn default_timeout_ms() -> u64 {
  10_000
}

fn default_max_concurrent() -> usize {
  10
}

fn default_requests_per_second() -> u32 {
  10
}

fn default_page_size() -> u32 {
  DEFAULT_PAGE_SIZE
}

fn default_top_n() -> usize {
  DEFAULT_TOP_N
}

fn default_lot_size() -> u32 {
  1
}

fn default_recent_limit() -> usize {
  20
}
