//! Kalshi REST API Adapter
//!
//! Implements the `VenueTransport` port over HTTPS. Handles request
//! signing, throttling and status mapping for every venue call.
//!
//! Sub-modules:
//! - `auth`: RSA-PSS request signing and credential loading
//! - `client`: HTTP client with concurrency cap, rate limit and timeout

pub mod auth;
pub mod client;

pub use auth::{Credentials, SignedRequest};
pub use client::{KALSHI_DEMO_URL, KALSHI_PROD_URL, KalshiClient, KalshiClientConfig};
