//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with the transport port to implement the
//! client's workflows. Each use case is stateless between calls and can
//! be shared across concurrent tasks.
//!
//! Use cases:
//! - `MarketCatalog`: Exhaustive open-event fetch, market snapshots
//! - `TrendingScanner`: Fetch + rank the event universe
//! - `OrderManager`: Limit order lifecycle (place, list, get, cancel, amend)
//! - `PortfolioService`: Account balance

pub mod catalog;
pub mod order_manager;
pub mod pagination;
pub mod portfolio;
pub mod trending;

pub use catalog::MarketCatalog;
pub use order_manager::{OrderFilter, OrderManager};
pub use portfolio::{Balance, PortfolioService};
pub use trending::TrendingScanner;
