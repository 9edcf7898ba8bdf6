//! Venue Error Taxonomy
//!
//! Every failure surfaced by the signer, the transport and the use cases
//! is a `VenueError`. Variants carry enough context (method, path, HTTP
//! status, verbatim venue body) for the caller to decide on a retry.
//! Nothing in this crate retries on its own.

use std::time::Duration;

use thiserror::Error;

use crate::ports::transport::HttpMethod;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, VenueError>;

/// Missing or unusable key material. Fatal, never retried.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential not configured: {0}")]
    Missing(&'static str),
    #[error("invalid private key (tried {tried}): {reason}")]
    InvalidKey { tried: String, reason: String },
}

#[derive(Debug, Error)]
pub enum VenueError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("signing failed: {0}")]
    Signing(String),

    /// Non-2xx answer from the venue. `body` is the venue payload verbatim.
    #[error("venue rejected {method} {path}: HTTP {status}: {body}")]
    VenueRequest {
        method: HttpMethod,
        path: String,
        status: u16,
        body: String,
    },

    /// The request never produced an HTTP status (DNS, TLS, connection reset).
    #[error("transport failure on {method} {path}: {message}")]
    Transport {
        method: HttpMethod,
        path: String,
        message: String,
    },

    #[error("{method} {path} timed out after {after:?}")]
    Timeout {
        method: HttpMethod,
        path: String,
        after: Duration,
    },

    #[error("pagination protocol violation: {0}")]
    PaginationProtocol(String),

    #[error("budget of {budget_cents}c buys no whole lot at {price}c")]
    InvalidOrderSize { budget_cents: u64, price: u32 },

    #[error("order count must be at least one contract, got {count}")]
    InvalidOrderCount { count: u32 },

    #[error("order price {price}c outside the tradable range 1..=99")]
    InvalidOrderPrice { price: u32 },

    #[error("order {order_id} not found: {body}")]
    OrderNotFound { order_id: String, body: String },

    #[error("order {order_id} is already filled or canceled (HTTP {status}): {body}")]
    OrderAlreadyTerminal {
        order_id: String,
        status: u16,
        body: String,
    },

    #[error("failed to decode {operation} response: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },

    #[error("unexpected venue response: {0}")]
    UnexpectedResponse(String),
}

impl VenueError {
    /// Whether a caller may safely re-issue the same request.
    ///
    /// Only bodyless idempotent calls (GET/DELETE) qualify, and only on
    /// throttling, server errors, timeouts or transport drops. A placement
    /// POST is never retryable: re-submit with a fresh client order id instead.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::VenueRequest { method, status, .. } => {
                method.is_idempotent() && (*status == 429 || *status >= 500)
            }
            Self::Timeout { method, .. } | Self::Transport { method, .. } => {
                method.is_idempotent()
            }
            _ => false,
        }
    }

    /// HTTP status reported by the venue, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::VenueRequest { status, .. } | Self::OrderAlreadyTerminal { status, .. } => {
                Some(*status)
            }
            Self::OrderNotFound { .. } => Some(404),
            _ => None,
        }
    }

    pub(crate) fn decode(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            operation,
            message: err.to_string(),
        }
    }
}
