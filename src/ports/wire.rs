//! Venue Wire Contract - Routes and JSON Envelopes
//!
//! Defines the route paths and the serialization types exchanged with
//! the venue REST API (`/trade-api/v2`). Domain types are nested inside
//! the envelopes below.

use serde::{Deserialize, Serialize};

use crate::domain::{ClientOrderId, Contracts, Event, Market, Order, OrderAction, PriceCents, Side};

/// API prefix shared by every route.
pub const API_PREFIX: &str = "/trade-api/v2";

/// `GET` signed: account balance.
pub const BALANCE_PATH: &str = "/trade-api/v2/portfolio/balance";

/// `GET` list / `POST` place, signed.
pub const ORDERS_PATH: &str = "/trade-api/v2/portfolio/orders";

/// `GET` public, paginated.
pub const EVENTS_PATH: &str = "/trade-api/v2/events";

/// `/trade-api/v2/portfolio/orders/{id}` for get, cancel and amend.
pub fn order_path(order_id: &str) -> String {
  format!("{ORDERS_PATH}/{order_id}")
}

/// `/trade-api/v2/markets/{ticker}`, public.
pub fn market_path(ticker: &str) -> String {
  format!("{API_PREFIX}/markets/{ticker}")
}

/// One page of `GET /events`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventsPage {
  /// Opaque cursor for the next page; absent, null or empty on the last.
  #[serde(default)]
  pub cursor: Option<String>,
  #[serde(default)]
  pub events: Vec<Event>,
}

/// One page of `GET /portfolio/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersPage {
  #[serde(default)]
  pub cursor: Option<String>,
  #[serde(default)]
  pub orders: Vec<Order>,
}

/// `{ "market": { ... } }`
#[derive(Debug, Clone, Deserialize)]
pub struct MarketEnvelope {
  pub market: Market,
}

/// `{ "order": { ... } }` returned by get, place, cancel and amend.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderEnvelope {
  pub order: Order,
}

/// Account balance in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
  pub balance: i64,
  /// Unix seconds of the last balance update.
  #[serde(default)]
  pub updated_ts: Option<i64>,
}

/// Limit order placement payload.
///
/// Exactly one of `yes_price` / `no_price` is set, matching `side`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
  pub ticker: String,
  pub action: OrderAction,
  pub side: Side,
  pub count: Contracts,
  #[serde(rename = "type")]
  pub order_type: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub yes_price: Option<PriceCents>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub no_price: Option<PriceCents>,
  pub client_order_id: ClientOrderId,
}

impl CreateOrderRequest {
  /// Limit buy at `price` cents on `side`.
  pub fn limit_buy(
    ticker: &str,
    side: Side,
    price: PriceCents,
    count: Contracts,
    client_order_id: ClientOrderId,
  ) -> Self {
    let (yes_price, no_price) = match side {
      Side::Yes => (Some(price), None),
      Side::No => (None, Some(price)),
    };
    Self {
      ticker: ticker.to_string(),
      action: OrderAction::Buy,
      side,
      count,
      order_type: "limit",
      yes_price,
      no_price,
      client_order_id,
    }
  }
}

/// Price/size amendment payload. The price is expressed in YES terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AmendOrderRequest {
  pub yes_price: PriceCents,
  pub count: Contracts,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_limit_buy_sets_only_its_side_price() {
    let req = CreateOrderRequest::limit_buy("KX-1", Side::No, 42, 3, ClientOrderId::fresh());
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["no_price"], 42);
    assert!(json.get("yes_price").is_none());
    assert_eq!(json["type"], "limit");
    assert_eq!(json["action"], "buy");
    assert_eq!(json["side"], "no");
    assert_eq!(json["client_order_id"].as_str().unwrap().len(), 32);
  }

  #[test]
  fn test_events_page_null_cursor() {
    let page: EventsPage = serde_json::from_str(r#"{"cursor": null, "events": []}"#).unwrap();
    assert!(page.cursor.is_none());
  }

  #[test]
  fn test_paths() {
    assert_eq!(order_path("abc"), "/trade-api/v2/portfolio/orders/abc");
    assert_eq!(market_path("KX-1"), "/trade-api/v2/markets/KX-1");
  }
}
