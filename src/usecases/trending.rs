//! Trending Scanner - Fetch the Universe, Rank It
//!
//! Combines the catalog fetch with the pure `TrendingRanker`. The scan
//! fails whenever the fetch fails: ranking a partial universe would
//! silently misreport what is trending.

use tracing::{info, instrument};

use super::catalog::MarketCatalog;
use crate::domain::{RankedEvent, TrendingRanker};
use crate::error::Result;
use crate::ports::transport::VenueTransport;

pub struct TrendingScanner<T: VenueTransport> {
    catalog: MarketCatalog<T>,
    ranker: TrendingRanker,
    page_size: u32,
}

impl<T: VenueTransport> TrendingScanner<T> {
    pub fn new(catalog: MarketCatalog<T>, ranker: TrendingRanker, page_size: u32) -> Self {
        Self {
            catalog,
            ranker,
            page_size,
        }
    }

    /// Fetch all open events and return the top `N` by activity.
    #[instrument(skip(self), fields(top_n = self.ranker.top_n(), page_size = self.page_size))]
    pub async fn scan(&self) -> Result<Vec<RankedEvent>> {
        let events = self.catalog.fetch_all_open_events(self.page_size).await?;
        let universe = events.len();
        let ranked = self.ranker.rank(events);

        info!(
            universe,
            ranked = ranked.len(),
            top_score = ranked.first().map_or(0, |r| r.score),
            "Trending events ranked"
        );
        Ok(ranked)
    }
}
