//! Limit order pricing and sizing.
//!
//! Pure function from (market snapshot, side, budget) to (price, count).
//! The order joins one cent above the best resting bid on its side and
//! buys as many whole lots as the budget covers at that price.

use serde::Serialize;

use super::market::Market;
use super::order::{Contracts, PriceCents, Side};
use crate::error::{Result, VenueError};

/// Lowest and highest prices an order may carry.
pub const MIN_PRICE_CENTS: PriceCents = 1;
pub const MAX_PRICE_CENTS: PriceCents = 99;

/// Improvement over the best bid, in cents.
pub const BID_IMPROVEMENT_CENTS: PriceCents = 1;

/// Venue sizing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizingRules {
    /// Contracts per lot; counts are rounded down to a multiple of this.
    pub lot_size: Contracts,
}

impl Default for SizingRules {
    fn default() -> Self {
        Self { lot_size: 1 }
    }
}

/// Parameters for a single limit buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderQuote {
    pub side: Side,
    pub price: PriceCents,
    pub count: Contracts,
}

impl OrderQuote {
    /// Notional cost of the quote in cents.
    pub fn cost_cents(&self) -> u64 {
        u64::from(self.price) * u64::from(self.count)
    }
}

/// Best resting bid on `side`, clamped at zero.
pub fn best_bid(market: &Market, side: Side) -> PriceCents {
    let bid = match side {
        Side::Yes => market.yes_bid,
        Side::No => market.no_bid,
    };
    PriceCents::try_from(bid.max(0)).unwrap_or(PriceCents::MAX)
}

/// Validate a caller-chosen limit price.
pub fn check_price(price: PriceCents) -> Result<PriceCents> {
    if (MIN_PRICE_CENTS..=MAX_PRICE_CENTS).contains(&price) {
        Ok(price)
    } else {
        Err(VenueError::InvalidOrderPrice { price })
    }
}

/// Whole-lot contract count affordable with `budget_cents` at `price`.
///
/// # Errors
/// `InvalidOrderSize` when the count rounds down to zero.
pub fn size_for_budget(budget_cents: u64, price: PriceCents, rules: SizingRules) -> Result<Contracts> {
    let price = check_price(price)?;
    let lot = rules.lot_size.max(1);
    let count = (budget_cents / u64::from(price)) / u64::from(lot) * u64::from(lot);

    if count == 0 {
        return Err(VenueError::InvalidOrderSize {
            budget_cents,
            price,
        });
    }
    Ok(Contracts::try_from(count).unwrap_or(Contracts::MAX / lot * lot))
}

/// Price and size a limit buy against a market snapshot.
///
/// # Errors
/// - `InvalidOrderPrice` when the improved bid leaves the 1..=99 range
/// - `InvalidOrderSize` when the budget buys no whole lot
pub fn quote_buy(market: &Market, side: Side, budget_cents: u64, rules: SizingRules) -> Result<OrderQuote> {
    let price = check_price(best_bid(market, side).saturating_add(BID_IMPROVEMENT_CENTS))?;
    let count = size_for_budget(budget_cents, price, rules)?;
    Ok(OrderQuote { side, price, count })
}
