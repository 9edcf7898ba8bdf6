//! Trending event ranking.
//!
//! Score of an event = sum over its markets of `volume_24h + open_interest`.
//! Events without activity are dropped; the rest are ordered by score,
//! descending, with ties kept in fetch order (stable sort).
//!
//! Optionally each ranked event is annotated with a representative
//! market: the liquid, traded market whose last price sits closest to
//! 50c, i.e. the most contested one.

use serde::Serialize;

use super::market::{Event, Market};

/// Number of events returned when the caller does not say.
pub const DEFAULT_TOP_N: usize = 10;

/// An event with its derived score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEvent {
    pub event: Event,
    pub score: i64,
    pub representative: Option<Market>,
}

/// Sum of market activity for one event.
pub fn event_score(event: &Event) -> i64 {
    event
        .markets
        .iter()
        .fold(0i64, |acc, m| acc.saturating_add(m.activity()))
}

/// Pick the most contested liquid market, falling back to the first one.
///
/// Ties on distance from 50c go to the first market encountered.
pub fn representative_market(markets: &[Market]) -> Option<&Market> {
    markets
        .iter()
        .filter(|m| m.has_signal())
        .min_by_key(|m| m.distance_from_even())
        .or_else(|| markets.first())
}

/// Event ranker.
#[derive(Debug, Clone, Copy)]
pub struct TrendingRanker {
    top_n: usize,
    with_representatives: bool,
}

impl TrendingRanker {
    pub fn new(top_n: usize) -> Self {
        Self {
            top_n,
            with_representatives: false,
        }
    }

    /// Also select a representative market per ranked event.
    #[must_use]
    pub fn with_representatives(mut self, enabled: bool) -> Self {
        self.with_representatives = enabled;
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Rank events, keeping the top `N`.
    pub fn rank(&self, events: Vec<Event>) -> Vec<RankedEvent> {
        let mut ranked: Vec<RankedEvent> = events
            .into_iter()
            .map(|event| RankedEvent {
                score: event_score(&event),
                event,
                representative: None,
            })
            .filter(|r| r.score > 0)
            .collect();

        // `sort_by` is stable: equal scores keep fetch order.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(self.top_n);

        if self.with_representatives {
            for r in &mut ranked {
                r.representative = representative_market(&r.event.markets).cloned();
            }
        }
        ranked
    }
}

impl Default for TrendingRanker {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}
