//! Kalshi Venue Client - Library Root
//!
//! Signed REST access to the Kalshi trading venue: market catalog
//! fetch, trending ranking and limit order management.
//! Re-exports all modules for the binary, integration tests and benchmarks.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod usecases;

pub use error::{CredentialError, Result, VenueError};
