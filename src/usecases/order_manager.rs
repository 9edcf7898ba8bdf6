//! Order Manager - Limit Order Lifecycle
//!
//! Manages the full lifecycle of limit orders against the venue:
//! - Pricing one cent above the best bid and sizing from a budget
//! - Placing with a fresh client order id per submission
//! - Listing (all pages), fetching, cancelling and amending
//!
//! The venue is authoritative for order state. Nothing here caches or
//! mutates an order; every returned `Order` is the venue's own answer.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::catalog::MarketCatalog;
use super::pagination::CursorGuard;
use crate::domain::order::sort_recent_first;
use crate::domain::pricing::{self, OrderQuote, SizingRules};
use crate::domain::{ClientOrderId, Contracts, Order, PriceCents, Side};
use crate::error::{Result, VenueError};
use crate::ports::transport::{VenueRequest, VenueTransport};
use crate::ports::wire::{
  AmendOrderRequest, CreateOrderRequest, ORDERS_PATH, OrderEnvelope, OrdersPage, order_path,
};

/// Venue error-body fragments meaning "the order can no longer change".
const TERMINAL_MARKERS: &[&str] = &[
  "already",
  "executed",
  "filled",
  "canceled",
  "cancelled",
  "not_cancelable",
  "cannot be canceled",
];

/// Optional narrowing of an order listing. Goes to the query string only.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
  pub ticker: Option<String>,
  /// Venue status string, e.g. `resting`.
  pub status: Option<String>,
}

/// Places and manages limit orders.
pub struct OrderManager<T: VenueTransport> {
  /// Signed venue transport.
  transport: Arc<T>,
  /// Source of pre-trade market snapshots.
  catalog: MarketCatalog<T>,
  /// Lot-size rounding for computed counts.
  rules: SizingRules,
}

impl<T: VenueTransport> OrderManager<T> {
  /// Create a new order manager.
  pub fn new(transport: Arc<T>, rules: SizingRules) -> Self {
    Self {
      catalog: MarketCatalog::new(Arc::clone(&transport)),
      transport,
      rules,
    }
  }

  /// Price and size a limit buy from the live book, then place it.
  ///
  /// A fresh client order id is minted for this submission.
  ///
  /// # Errors
  /// - `InvalidOrderSize` when the budget buys no whole lot
  /// - `InvalidOrderPrice` when the best bid is already 99c
  /// - `VenueRequest` when the venue rejects the order
  #[instrument(skip(self))]
  pub async fn place_order(&self, ticker: &str, side: Side, budget_cents: u64) -> Result<Order> {
    let market = self.catalog.get_market(ticker).await?;
    let quote = pricing::quote_buy(&market, side, budget_cents, self.rules)?;

    debug!(
      best_bid = pricing::best_bid(&market, side),
      price = quote.price,
      count = quote.count,
      "Order quoted"
    );

    self.submit(ticker, &quote, ClientOrderId::fresh()).await
  }

  /// Submit an already-quoted limit buy under `client_order_id`.
  ///
  /// Callers that retry a placement must mint a new id for each attempt
  /// they intend as a new order, and reuse the id only to re-send the
  /// exact same attempt.
  #[instrument(skip(self, quote), fields(price = quote.price, count = quote.count))]
  pub async fn submit(
    &self,
    ticker: &str,
    quote: &OrderQuote,
    client_order_id: ClientOrderId,
  ) -> Result<Order> {
    let payload =
      CreateOrderRequest::limit_buy(ticker, quote.side, quote.price, quote.count, client_order_id);
    let body = serde_json::to_value(&payload)
      .map_err(|e| VenueError::decode("place order request", e))?;

    let value = self
      .transport
      .send(VenueRequest::signed_post(ORDERS_PATH, body))
      .await?;
    let order = parse_order(value, "place order")?;

    info!(
      order_id = %order.order_id,
      state = %order.state(),
      "Order placed"
    );
    Ok(order)
  }

  /// Every order on the account matching `filter`, across all pages.
  #[instrument(skip(self))]
  pub async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
    let mut guard = CursorGuard::new();
    let mut cursor: Option<String> = None;
    let mut orders = Vec::new();

    loop {
      let request = VenueRequest::signed_get(ORDERS_PATH)
        .with_optional_query("ticker", filter.ticker.as_deref())
        .with_optional_query("status", filter.status.as_deref())
        .with_optional_query("cursor", cursor.as_deref());

      let page: OrdersPage = serde_json::from_value(self.transport.send(request).await?)
        .map_err(|e| VenueError::decode("orders page", e))?;
      orders.extend(page.orders);

      match guard.advance(page.cursor)? {
        Some(next) => cursor = Some(next),
        None => break,
      }
    }

    debug!(pages = guard.pages(), orders = orders.len(), "Orders listed");
    Ok(orders)
  }

  /// The `limit` most recently created orders matching `filter`, newest first.
  pub async fn recent_orders(&self, filter: &OrderFilter, limit: usize) -> Result<Vec<Order>> {
    let mut orders = self.list_orders(filter).await?;
    sort_recent_first(&mut orders);
    orders.truncate(limit);
    Ok(orders)
  }

  /// Fetch one order.
  #[instrument(skip(self))]
  pub async fn get_order(&self, order_id: &str) -> Result<Order> {
    let value = self
      .transport
      .send(VenueRequest::signed_get(order_path(order_id)))
      .await
      .map_err(|e| classify_not_found(e, order_id))?;
    parse_order(value, "get order")
  }

  /// Cancel a resting order.
  ///
  /// # Errors
  /// - `OrderNotFound` on 404
  /// - `OrderAlreadyTerminal` when the venue reports it filled or canceled
  #[instrument(skip(self))]
  pub async fn cancel_order(&self, order_id: &str) -> Result<Order> {
    let value = self
      .transport
      .send(VenueRequest::signed_delete(order_path(order_id)))
      .await
      .map_err(|e| classify_order_error(e, order_id))?;
    let order = parse_order(value, "cancel order")?;

    info!(order_id = %order.order_id, state = %order.state(), "Order canceled");
    Ok(order)
  }

  /// Change price and size of a resting order.
  ///
  /// Rejections (for instance on an order that has begun filling) are
  /// surfaced as errors, never absorbed.
  #[instrument(skip(self))]
  pub async fn amend_order(
    &self,
    order_id: &str,
    new_price: PriceCents,
    new_count: Contracts,
  ) -> Result<Order> {
    let price = pricing::check_price(new_price)?;
    if new_count == 0 {
      return Err(VenueError::InvalidOrderCount { count: new_count });
    }

    let body = serde_json::to_value(AmendOrderRequest {
      yes_price: price,
      count: new_count,
    })
    .map_err(|e| VenueError::decode("amend order request", e))?;

    let value = self
      .transport
      .send(VenueRequest::signed_put(order_path(order_id), body))
      .await
      .map_err(|e| classify_order_error(e, order_id))?;
    let order = parse_order(value, "amend order")?;

    if order.order_id != order_id {
      warn!(requested = %order_id, returned = %order.order_id, "Amend answered for another order");
      return Err(VenueError::UnexpectedResponse(format!(
        "amend of {order_id} returned order {}",
        order.order_id
      )));
    }

    info!(order_id = %order.order_id, price, count = new_count, "Order amended");
    Ok(order)
  }
}

fn parse_order(value: serde_json::Value, operation: &'static str) -> Result<Order> {
  serde_json::from_value::<OrderEnvelope>(value)
    .map(|envelope| envelope.order)
    .map_err(|e| VenueError::decode(operation, e))
}

/// 404 on a per-order route means the order does not exist.
fn classify_not_found(err: VenueError, order_id: &str) -> VenueError {
  match err {
    VenueError::VenueRequest {
      status: 404, body, ..
    } => VenueError::OrderNotFound {
      order_id: order_id.to_string(),
      body,
    },
    other => other,
  }
}

/// Turn cancel/amend rejections into their specific error variants.
fn classify_order_error(err: VenueError, order_id: &str) -> VenueError {
  match classify_not_found(err, order_id) {
    VenueError::VenueRequest { status, body, .. }
      if status == 409 || ((400..500).contains(&status) && mentions_terminal(&body)) =>
    {
      VenueError::OrderAlreadyTerminal {
        order_id: order_id.to_string(),
        status,
        body,
      }
    }
    other => other,
  }
}

fn mentions_terminal(body: &str) -> bool {
  let body = body.to_ascii_lowercase();
  TERMINAL_MARKERS.iter().any(|marker| body.contains(marker))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ports::transport::HttpMethod;

  fn rejected(status: u16, body: &str) -> VenueError {
    VenueError::VenueRequest {
      method: HttpMethod::Delete,
      path: order_path("o-1"),
      status,
      body: body.to_string(),
    }
  }

  #[test]
  fn test_404_is_order_not_found() {
    assert!(matches!(
      classify_order_error(rejected(404, r#"{"error":"not_found"}"#), "o-1"),
      VenueError::OrderNotFound { order_id, body } if order_id == "o-1" && body == r#"{"error":"not_found"}"#
    ));
  }

  #[test]
  fn test_read_path_maps_only_not_found() {
    assert!(matches!(
      classify_not_found(rejected(409, "{}"), "o-1"),
      VenueError::VenueRequest { status: 409, .. }
    ));
    assert!(matches!(
      classify_not_found(rejected(400, "order canceled"), "o-1"),
      VenueError::VenueRequest { status: 400, .. }
    ));
    assert!(matches!(
      classify_not_found(rejected(404, ""), "o-1"),
      VenueError::OrderNotFound { .. }
    ));
  }

  #[test]
  fn test_terminal_body_is_already_terminal() {
    let body = r#"{"error":{"code":"order_already_executed","message":"Order is already filled"}}"#;
    assert!(matches!(
      classify_order_error(rejected(400, body), "o-1"),
      VenueError::OrderAlreadyTerminal { status: 400, .. }
    ));
    assert!(matches!(
      classify_order_error(rejected(409, "{}"), "o-1"),
      VenueError::OrderAlreadyTerminal { status: 409, .. }
    ));
  }

  #[test]
  fn test_other_rejections_pass_through() {
    assert!(matches!(
      classify_order_error(rejected(400, r#"{"error":"invalid price"}"#), "o-1"),
      VenueError::VenueRequest { status: 400, .. }
    ));
    assert!(matches!(
      classify_order_error(rejected(503, "canceled upstream"), "o-1"),
      VenueError::VenueRequest { status: 503, .. }
    ));
  }
}
