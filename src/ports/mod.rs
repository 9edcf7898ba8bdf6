//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interface the use cases require from the outside world
//! and the wire contract spoken across it. Adapters implement the traits.
//!
//! Port categories:
//! - `VenueTransport`: signed/public HTTP calls to the venue
//! - `wire`: route paths and request/response envelopes

pub mod transport;
pub mod wire;
