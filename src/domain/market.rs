//! Market catalog types.
//!
//! `Market` and `Event` mirror the venue's JSON. Every numeric field is
//! optional on the wire and defaults to zero, so a sparse market never
//! fails to decode and never contributes phantom activity.

use serde::{Deserialize, Deserializer, Serialize};

/// Absent and `null` both decode to the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Unique identifier of a tradable market.
pub type Ticker = String;

/// Read-only market snapshot. Prices are in cents (0-100).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    pub ticker: Ticker,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_price: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub yes_bid: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub no_bid: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub volume_24h: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub liquidity: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub open_interest: i64,
}

impl Market {
    /// Activity contributed to the owning event's trending score.
    pub fn activity(&self) -> i64 {
        self.volume_24h.saturating_add(self.open_interest)
    }

    /// Liquid and traded (or held) at all.
    pub fn has_signal(&self) -> bool {
        self.liquidity > 0 && (self.volume_24h > 0 || self.open_interest > 0)
    }

    /// Distance of the last trade from maximal uncertainty (50c).
    pub fn distance_from_even(&self) -> i64 {
        (self.last_price - 50).abs()
    }
}

/// A venue event grouping one or more markets, in venue order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_ticker: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub series_ticker: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub markets: Vec<Market>,
}

impl Event {
    /// Public web page for this event.
    pub fn web_url(&self) -> String {
        format!(
            "https://kalshi.com/markets/{}/{}",
            self.series_ticker.to_lowercase(),
            self.event_ticker.to_lowercase()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_market_decodes_with_zero_defaults() {
        let json = r#"{"ticker": "KXTEST-1", "title": "Will it?"}"#;
        let m: Market = serde_json::from_str(json).unwrap();
        assert_eq!(m.ticker, "KXTEST-1");
        assert_eq!(m.volume_24h, 0);
        assert_eq!(m.open_interest, 0);
        assert_eq!(m.activity(), 0);
        assert!(!m.has_signal());
    }

    #[test]
    fn test_null_fields_decode_as_zero() {
        let json = r#"{"ticker": "KXTEST-1", "title": null, "volume_24h": 12,
                       "open_interest": null, "liquidity": null, "last_price": null}"#;
        let m: Market = serde_json::from_str(json).unwrap();
        assert_eq!(m.title, "");
        assert_eq!(m.open_interest, 0);
        assert_eq!(m.liquidity, 0);
        assert_eq!(m.activity(), 12);
    }

    #[test]
    fn test_null_markets_list_is_empty() {
        let json = r#"{"event_ticker": "KXEV", "series_ticker": null, "markets": null}"#;
        let e: Event = serde_json::from_str(json).unwrap();
        assert!(e.markets.is_empty());
        assert!(e.series_ticker.is_empty());
    }

    #[test]
    fn test_event_without_markets_decodes() {
        let json = r#"{"event_ticker": "KXEV", "series_ticker": "KXS", "title": "t"}"#;
        let e: Event = serde_json::from_str(json).unwrap();
        assert!(e.markets.is_empty());
    }

    #[test]
    fn test_web_url_is_lowercased() {
        let e = Event {
            event_ticker: "KXNCAAF-26".to_string(),
            series_ticker: "KXNCAAF".to_string(),
            ..Event::default()
        };
        assert_eq!(e.web_url(), "https://kalshi.com/markets/kxncaaf/kxncaaf-26");
    }
}
