//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies. Each sub-module groups adapters by
//! infrastructure concern.
//!
//! Adapter categories:
//! - `api`: Kalshi REST API client and RSA-PSS request signing

pub mod api;
