//! Venue HTTP Client - Signed, Throttled REST Transport
//!
//! Wraps reqwest with request signing, a concurrency cap, a
//! requests-per-second limiter and a hard per-call timeout.
//! Implements the `VenueTransport` port. Never retries.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method, Request};
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::auth::Credentials;
use crate::error::{CredentialError, Result, VenueError};
use crate::ports::transport::{Access, HttpMethod, VenueRequest, VenueTransport};

/// Production trading API host.
pub const KALSHI_PROD_URL: &str = "https://api.elections.kalshi.com";
/// Demo (paper trading) API host.
pub const KALSHI_DEMO_URL: &str = "https://demo-api.kalshi.co";

/// Configuration for the venue HTTP client.
#[derive(Debug, Clone)]
pub struct KalshiClientConfig {
  /// Base URL (scheme + host) for the venue API.
  pub base_url: String,
  /// Hard bound on one call: throttling wait, send and body read.
  pub timeout: Duration,
  /// Maximum concurrent requests.
  pub max_concurrent: usize,
  /// Sustained request rate.
  pub requests_per_second: u32,
}

impl Default for KalshiClientConfig {
  fn default() -> Self {
    Self {
      base_url: KALSHI_PROD_URL.to_string(),
      timeout: Duration::from_secs(10),
      max_concurrent: 10,
      requests_per_second: 10,
    }
  }
}

/// Venue REST client.
///
/// Holds only immutable state (credentials, config) plus thread-safe
/// throttles, so one instance is shared across concurrent callers.
pub struct KalshiClient {
  /// Underlying HTTP client.
  http: Client,
  /// Signing credentials; `None` restricts the client to public endpoints.
  credentials: Option<Arc<Credentials>>,
  /// Client configuration.
  config: KalshiClientConfig,
  /// Concurrency limiter.
  semaphore: Arc<Semaphore>,
  /// Requests-per-second limiter.
  limiter: DefaultDirectRateLimiter,
}

impl KalshiClient {
  /// Create a new venue client.
  pub fn new(credentials: Option<Arc<Credentials>>, config: KalshiClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(5)
      .build()
      .map_err(|e| VenueError::Transport {
        method: HttpMethod::Get,
        path: config.base_url.clone(),
        message: format!("failed to build HTTP client: {e}"),
      })?;

    let rps = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
    let limiter = RateLimiter::direct(Quota::per_second(rps));
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent.max(1)));

    Ok(Self {
      http,
      credentials,
      config,
      semaphore,
      limiter,
    })
  }

  /// Whether signed endpoints are reachable with this client.
  pub fn has_credentials(&self) -> bool {
    self.credentials.is_some()
  }

  pub fn config(&self) -> &KalshiClientConfig {
    &self.config
  }

  /// Build the HTTP request for `request`, signing it when required.
  ///
  /// A fresh timestamp and signature are produced on every call.
  pub fn build_request(&self, request: &VenueRequest) -> Result<Request> {
    let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), request.path);
    let mut builder = self
      .http
      .request(to_reqwest_method(request.method), &url)
      .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if !request.query.is_empty() {
      builder = builder.query(&request.query);
    }

    if request.access == Access::Signed {
      let credentials = self
        .credentials
        .as_ref()
        .ok_or(CredentialError::Missing("KALSHI_API_KEY"))?;
      let signed = credentials.sign_request(request.method, &request.path)?;
      for (name, value) in credentials.auth_headers(&signed) {
        builder = builder.header(name, value);
      }
    }

    match (&request.body, request.method.carries_body()) {
      (Some(body), true) => builder = builder.json(body),
      (Some(_), false) => {
        debug!(method = %request.method, path = %request.path, "Dropping body on bodyless method");
      }
      (None, _) => {}
    }

    builder.build().map_err(|e| VenueError::Transport {
      method: request.method,
      path: request.path.clone(),
      message: e.to_string(),
    })
  }

  async fn execute(&self, request: &VenueRequest) -> Result<Value> {
    let _permit = self
      .semaphore
      .acquire()
      .await
      .map_err(|_| VenueError::Transport {
        method: request.method,
        path: request.path.clone(),
        message: "request semaphore closed".to_string(),
      })?;
    self.limiter.until_ready().await;

    // Signed after throttling so the timestamp is as fresh as possible.
    let http_request = self.build_request(request)?;
    let response = self
      .http
      .execute(http_request)
      .await
      .map_err(|e| self.classify_reqwest_error(request, &e))?;

    let status = response.status().as_u16();
    let body = response
      .text()
      .await
      .map_err(|e| self.classify_reqwest_error(request, &e))?;

    decode_response(request.method, &request.path, status, &body)
  }

  fn classify_reqwest_error(&self, request: &VenueRequest, err: &reqwest::Error) -> VenueError {
    if err.is_timeout() {
      VenueError::Timeout {
        method: request.method,
        path: request.path.clone(),
        after: self.config.timeout,
      }
    } else {
      VenueError::Transport {
        method: request.method,
        path: request.path.clone(),
        message: err.to_string(),
      }
    }
  }
}

#[async_trait]
impl VenueTransport for KalshiClient {
  async fn send(&self, request: VenueRequest) -> Result<Value> {
    let started = Instant::now();
    let outcome = tokio::time::timeout(self.config.timeout, self.execute(&request))
      .await
      .unwrap_or_else(|_| {
        Err(VenueError::Timeout {
          method: request.method,
          path: request.path.clone(),
          after: self.config.timeout,
        })
      });

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    match &outcome {
      Ok(_) => debug!(method = %request.method, path = %request.path, elapsed_ms, "Venue call ok"),
      Err(e) => warn!(
        method = %request.method,
        path = %request.path,
        status = ?e.status(),
        elapsed_ms,
        error = %e,
        "Venue call failed"
      ),
    }
    outcome
  }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
  match method {
    HttpMethod::Get => Method::GET,
    HttpMethod::Post => Method::POST,
    HttpMethod::Put => Method::PUT,
    HttpMethod::Delete => Method::DELETE,
  }
}

/// Map a raw HTTP outcome to the port contract.
///
/// Any status outside `[200, 300)` becomes `VenueRequest` with the body
/// verbatim. An empty 2xx body decodes to `Value::Null`.
pub fn decode_response(method: HttpMethod, path: &str, status: u16, body: &str) -> Result<Value> {
  if !(200..300).contains(&status) {
    return Err(VenueError::VenueRequest {
      method,
      path: path.to_string(),
      status,
      body: body.to_string(),
    });
  }
  if body.trim().is_empty() {
    return Ok(Value::Null);
  }
  serde_json::from_str(body).map_err(|e| VenueError::decode("venue", e))
}
