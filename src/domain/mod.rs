//! Domain layer - Venue entities and pure trading logic.
//!
//! Markets, events and orders as the venue reports them, plus the pure
//! functions that rank events and price orders. Nothing here performs
//! I/O (hexagonal architecture inner ring), so every rule is testable
//! without a network.

pub mod market;
pub mod order;
pub mod pricing;
pub mod trending;

// Re-export core types for convenience
pub use market::{Event, Market, Ticker};
pub use order::{
    ClientOrderId, Contracts, Order, OrderAction, OrderId, OrderState, OrderStatus, PriceCents,
    Side,
};
pub use pricing::{OrderQuote, SizingRules};
pub use trending::{RankedEvent, TrendingRanker};
