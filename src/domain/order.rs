//! Order domain types.
//!
//! Orders are owned by the venue. This module only models what the
//! venue reports: the wire status, fill counters, and the lifecycle
//! state derived from them. Nothing here mutates an order locally.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Venue-assigned order identifier.
pub type OrderId = String;

/// Price in cents, 1..=99 for an order.
pub type PriceCents = u32;

/// Whole number of contracts.
pub type Contracts = u32;

/// Contract side of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Yes,
    No,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "yes"),
            Self::No => write!(f, "no"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            other => Err(format!("side must be `yes` or `no`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderAction {
    Buy,
    Sell,
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Status string as reported by the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Resting,
    Executed,
    #[serde(alias = "cancelled")]
    Canceled,
    #[serde(other)]
    Unknown,
}

/// Lifecycle state: `Pending -> {Resting, PartiallyFilled, Filled, Canceled}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum OrderState {
    Pending,
    Resting,
    PartiallyFilled,
    Filled,
    Canceled,
    Unknown,
}

impl OrderState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Filled | Self::Canceled)
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Resting => "RESTING",
            Self::PartiallyFilled => "PARTIALLY_FILLED",
            Self::Filled => "FILLED",
            Self::Canceled => "CANCELED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

impl FromStr for OrderState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "resting" => Ok(Self::Resting),
            "partially_filled" => Ok(Self::PartiallyFilled),
            "filled" | "executed" => Ok(Self::Filled),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            other => Err(format!("unknown order state `{other}`")),
        }
    }
}

/// Idempotency token minted once per logical placement attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientOrderId(String);

impl ClientOrderId {
    /// 32 hex characters from a v4 UUID.
    pub fn fresh() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An order as last confirmed by the venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    #[serde(default)]
    pub client_order_id: String,
    pub ticker: String,
    pub action: OrderAction,
    pub side: Side,
    #[serde(rename = "type", default)]
    pub order_type: String,
    #[serde(default)]
    pub yes_price: PriceCents,
    #[serde(default)]
    pub no_price: PriceCents,
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "deserialize_venue_time")]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub initial_count: Contracts,
    #[serde(default)]
    pub remaining_count: Contracts,
    #[serde(default)]
    pub fill_count: Contracts,
}

impl Order {
    pub fn state(&self) -> OrderState {
        match self.status {
            OrderStatus::Pending => OrderState::Pending,
            OrderStatus::Resting if self.fill_count > 0 => OrderState::PartiallyFilled,
            OrderStatus::Resting => OrderState::Resting,
            OrderStatus::Executed => OrderState::Filled,
            OrderStatus::Canceled => OrderState::Canceled,
            OrderStatus::Unknown => OrderState::Unknown,
        }
    }

    /// Limit price on the order's own side.
    pub fn limit_price(&self) -> PriceCents {
        match self.side {
            Side::Yes => self.yes_price,
            Side::No => self.no_price,
        }
    }
}

/// Sort most-recent-first by `created_time`; orders without a time go last.
/// Stable, so equal times keep venue order.
pub fn sort_recent_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_time.cmp(&a.created_time));
}

/// Count of orders per lifecycle state.
pub fn status_summary(orders: &[Order]) -> BTreeMap<OrderState, usize> {
    let mut summary = BTreeMap::new();
    for order in orders {
        *summary.entry(order.state()).or_insert(0) += 1;
    }
    summary
}

/// The venue has reported times both as RFC 3339 strings and as epoch millis.
fn deserialize_venue_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTime {
        Text(String),
        Millis(i64),
    }

    match Option::<RawTime>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawTime::Text(s)) if s.is_empty() => Ok(None),
        Some(RawTime::Text(s)) => DateTime::parse_from_rfc3339(&s)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
        Some(RawTime::Millis(ms)) => DateTime::from_timestamp_millis(ms)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {ms}"))),
    }
}
