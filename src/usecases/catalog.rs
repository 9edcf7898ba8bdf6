//! Market Catalog - Open Event Universe and Market Snapshots
//!
//! Pages through `GET /events` until the venue cursor is exhausted and
//! returns every open event in server order. The fetch is all-or-nothing:
//! any failed page discards everything fetched so far, since trending
//! decisions need the complete universe.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::pagination::CursorGuard;
use crate::domain::{Event, Market};
use crate::error::{Result, VenueError};
use crate::ports::transport::{VenueRequest, VenueTransport};
use crate::ports::wire::{EVENTS_PATH, EventsPage, MarketEnvelope, market_path};

/// Events requested per page by default.
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Largest page the venue serves.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Read-only access to the public market catalog.
pub struct MarketCatalog<T: VenueTransport> {
    transport: Arc<T>,
}

impl<T: VenueTransport> Clone for MarketCatalog<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: VenueTransport> MarketCatalog<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Fetch every open event, with nested markets, across all pages.
    ///
    /// # Errors
    /// - Any page failure aborts the whole fetch
    /// - `PaginationProtocol` when the venue repeats a cursor
    #[instrument(skip(self))]
    pub async fn fetch_all_open_events(&self, page_size: u32) -> Result<Vec<Event>> {
        let limit = page_size.clamp(1, MAX_PAGE_SIZE);
        if limit != page_size {
            warn!(requested = page_size, used = limit, "Page size clamped");
        }

        let mut guard = CursorGuard::new();
        let mut cursor: Option<String> = None;
        let mut events = Vec::new();

        loop {
            let request = VenueRequest::public_get(EVENTS_PATH)
                .with_query("limit", limit.to_string())
                .with_query("status", "open")
                .with_query("with_nested_markets", "true")
                .with_optional_query("cursor", cursor.as_deref());

            let page: EventsPage = serde_json::from_value(self.transport.send(request).await?)
                .map_err(|e| VenueError::decode("events page", e))?;

            debug!(
                page = guard.pages() + 1,
                events = page.events.len(),
                has_cursor = page.cursor.is_some(),
                "Events page fetched"
            );
            events.extend(page.events);

            match guard.advance(page.cursor)? {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        info!(pages = guard.pages(), events = events.len(), "Open event universe fetched");
        Ok(events)
    }

    /// Current snapshot of one market.
    #[instrument(skip(self))]
    pub async fn get_market(&self, ticker: &str) -> Result<Market> {
        let value = self
            .transport
            .send(VenueRequest::public_get(market_path(ticker)))
            .await?;
        let envelope: MarketEnvelope =
            serde_json::from_value(value).map_err(|e| VenueError::decode("market", e))?;

        debug!(
            ticker = %envelope.market.ticker,
            yes_bid = envelope.market.yes_bid,
            no_bid = envelope.market.no_bid,
            "Market snapshot fetched"
        );
        Ok(envelope.market)
    }
}
