//! Venue Transport Port - Authenticated HTTP Interface
//!
//! Defines the single seam between the use cases and the network.
//! Use cases describe *what* to call with a `VenueRequest`; the adapter
//! decides how to sign, throttle and send it.
//!
//! Key design decisions:
//! - GET/DELETE are bodyless, POST/PUT carry a JSON body
//! - The signed path is the route path only, query string excluded
//! - Public endpoints (catalog, market snapshot) are sent unsigned

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// HTTP verbs used by the venue API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Upper-case verb, exactly as it enters the signing message.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether the venue accepts a payload for this verb.
    pub const fn carries_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    /// Safe to repeat without changing venue state twice.
    pub const fn is_idempotent(self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the request needs the signed access-key header triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Signed,
}

/// A single venue call, described independently of any HTTP library.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueRequest {
    pub method: HttpMethod,
    /// Route path, e.g. `/trade-api/v2/portfolio/orders`. Never contains `?`.
    pub path: String,
    /// Query parameters appended to the URL but not to the signing message.
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub access: Access,
}

impl VenueRequest {
    fn new(method: HttpMethod, path: impl Into<String>, access: Access) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            access,
        }
    }

    /// Unsigned GET against a public endpoint.
    pub fn public_get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path, Access::Public)
    }

    pub fn signed_get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path, Access::Signed)
    }

    pub fn signed_delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path, Access::Signed)
    }

    pub fn signed_post(path: impl Into<String>, body: Value) -> Self {
        let mut req = Self::new(HttpMethod::Post, path, Access::Signed);
        req.body = Some(body);
        req
    }

    pub fn signed_put(path: impl Into<String>, body: Value) -> Self {
        let mut req = Self::new(HttpMethod::Put, path, Access::Signed);
        req.body = Some(body);
        req
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Append a query parameter only when a value is present.
    #[must_use]
    pub fn with_optional_query(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.with_query(key, v),
            None => self,
        }
    }

    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Trait for venue transports.
///
/// Implementors attach authentication (for `Access::Signed`), enforce
/// timeouts, and turn any status outside `[200, 300)` into
/// `VenueError::VenueRequest` carrying the verbatim body. A successful
/// call yields the decoded JSON body (`Value::Null` when empty).
///
/// Implementations must hold no per-call mutable state: the same
/// transport is shared by concurrent callers.
#[async_trait]
pub trait VenueTransport: Send + Sync + 'static {
    /// Perform one call. Never retries.
    async fn send(&self, request: VenueRequest) -> Result<Value>;
}
