//! Portfolio - Account Balance
//!
//! Reads the signed balance endpoint. The venue reports cents; the
//! dollar view uses exact decimals.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::error::{Result, VenueError};
use crate::ports::transport::{VenueRequest, VenueTransport};
use crate::ports::wire::{BALANCE_PATH, BalanceResponse};

/// Account balance as reported by the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub balance_cents: i64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Balance {
    /// Balance in dollars, exact to the cent.
    pub fn dollars(&self) -> Decimal {
        Decimal::new(self.balance_cents, 2)
    }
}

impl From<BalanceResponse> for Balance {
    fn from(raw: BalanceResponse) -> Self {
        Self {
            balance_cents: raw.balance,
            updated_at: raw
                .updated_ts
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        }
    }
}

pub struct PortfolioService<T: VenueTransport> {
    transport: Arc<T>,
}

impl<T: VenueTransport> PortfolioService<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    #[instrument(skip(self))]
    pub async fn balance(&self) -> Result<Balance> {
        let value = self
            .transport
            .send(VenueRequest::signed_get(BALANCE_PATH))
            .await?;
        let raw: BalanceResponse =
            serde_json::from_value(value).map_err(|e| VenueError::decode("balance", e))?;

        debug!(balance_cents = raw.balance, "Balance fetched");
        Ok(raw.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_dollars_is_exact() {
        let b = Balance::from(BalanceResponse {
            balance: 12_345,
            updated_ts: Some(1_700_000_000),
        });
        assert_eq!(b.dollars(), dec!(123.45));
        assert!(b.updated_at.is_some());
    }
}
