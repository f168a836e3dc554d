//! YES mid-price snapshots.

use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info, instrument};

use crate::error::MarketError;
use crate::market::client::MarketDataClient;
use crate::market::types::Outcome;

use super::types::OrderBookResponse;

/// Top-of-book prices for a market's YES token at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceSnapshot {
    /// Condition identifier of the market.
    pub market_id: String,
    /// Local capture time.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Best YES bid, 0 when there are no bids.
    pub yes_bid: Decimal,
    /// Best YES ask, 1 when there are no asks.
    pub yes_ask: Decimal,
    /// Mean of `yes_bid` and `yes_ask`.
    pub yes_mid: Decimal,
}

impl PriceSnapshot {
    /// Build a snapshot from a YES order book.
    ///
    /// A one-sided or empty book still yields a mid, skewed toward the
    /// missing side's bound.
    pub fn from_book(
        market_id: impl Into<String>,
        book: &OrderBookResponse,
        timestamp: OffsetDateTime,
    ) -> Self {
        let yes_bid = book.best_bid_or_floor();
        let yes_ask = book.best_ask_or_ceiling();

        Self {
            market_id: market_id.into(),
            timestamp,
            yes_bid,
            yes_ask,
            yes_mid: (yes_bid + yes_ask) / Decimal::TWO,
        }
    }

    /// Spread between ask and bid.
    pub fn spread(&self) -> Decimal {
        self.yes_ask - self.yes_bid
    }
}

/// Resolves a market to its YES token and samples the token's book.
#[derive(Debug, Clone)]
pub struct PriceSnapshotter<C> {
    client: C,
}

impl<C: MarketDataClient> PriceSnapshotter<C> {
    /// Create a snapshotter over a market data client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Fetch the YES best bid/ask for `market_id` and compute the mid.
    ///
    /// Fails with [`MarketError::NoYesToken`] before any book request when
    /// the market has no token labelled exactly "YES".
    #[instrument(skip(self))]
    pub async fn fetch_yes_mid(&self, market_id: &str) -> Result<PriceSnapshot, MarketError> {
        let market = self.client.get_market(market_id).await?;

        let token_id = market
            .token(Outcome::Yes)
            .ok_or_else(|| MarketError::NoYesToken {
                market_id: market_id.to_string(),
            })?
            .token_id
            .as_deref()
            .ok_or_else(|| {
                MarketError::Parse(format!("YES token of market {} has no token_id", market_id))
            })?;

        debug!(token_id = %token_id, "Resolved YES token");

        let book = self.client.get_order_book(token_id).await?;
        let snapshot = PriceSnapshot::from_book(market_id, &book, OffsetDateTime::now_utc());

        info!(
            yes_bid = %snapshot.yes_bid,
            yes_ask = %snapshot.yes_ask,
            yes_mid = %snapshot.yes_mid,
            "Captured YES snapshot"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::mock::{MockClobClient, MockConfig};
    use crate::orderbook::types::OrderLevel;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use time::macros::datetime;

    fn book(bids: &[Decimal], asks: &[Decimal]) -> OrderBookResponse {
        OrderBookResponse {
            bids: Some(bids.iter().map(|p| OrderLevel::new(*p, dec!(10))).collect()),
            asks: Some(asks.iter().map(|p| OrderLevel::new(*p, dec!(10))).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn mid_of_populated_book() {
        let ts = datetime!(2025-01-01 00:00:00 UTC);
        let snapshot = PriceSnapshot::from_book("m", &book(&[dec!(0.48)], &[dec!(0.52)]), ts);
        assert_eq!(snapshot.yes_bid, dec!(0.48));
        assert_eq!(snapshot.yes_ask, dec!(0.52));
        assert_eq!(snapshot.yes_mid, dec!(0.50));
        assert_eq!(snapshot.yes_mid, (snapshot.yes_bid + snapshot.yes_ask) / Decimal::TWO);
        assert_eq!(snapshot.spread(), dec!(0.04));
        assert!(snapshot.yes_bid <= snapshot.yes_mid && snapshot.yes_mid <= snapshot.yes_ask);
    }

    #[test]
    fn mid_of_empty_book_uses_bounds() {
        let ts = datetime!(2025-01-01 00:00:00 UTC);
        let snapshot = PriceSnapshot::from_book("m", &OrderBookResponse::default(), ts);
        assert_eq!(snapshot.yes_bid, Decimal::ZERO);
        assert_eq!(snapshot.yes_ask, Decimal::ONE);
        assert_eq!(snapshot.yes_mid, dec!(0.5));
    }

    #[test]
    fn mid_with_only_bids() {
        let ts = datetime!(2025-01-01 00:00:00 UTC);
        let snapshot = PriceSnapshot::from_book("m", &book(&[dec!(0.3)], &[]), ts);
        assert_eq!(snapshot.yes_ask, Decimal::ONE);
        assert_eq!(snapshot.yes_mid, dec!(0.65));
    }

    #[test]
    fn snapshot_serializes_timestamp_as_rfc3339() {
        let ts = datetime!(2025-01-01 12:30:00 UTC);
        let snapshot = PriceSnapshot::from_book("0xabc", &book(&[dec!(0.4)], &[dec!(0.6)]), ts);
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["timestamp"], json!("2025-01-01T12:30:00Z"));
        assert_eq!(value["market_id"], json!("0xabc"));
    }

    #[tokio::test]
    async fn empty_bid_side_scenario() {
        let client = MockClobClient::new();
        client.set_market("0xm", &[("NO", "1"), ("YES", "2")]);
        client.set_order_book("2", json!({"bids": [], "asks": [{"price": "0.7"}]}));

        let snapshotter = PriceSnapshotter::new(client.clone());
        let snapshot = snapshotter.fetch_yes_mid("0xm").await.unwrap();

        assert_eq!(snapshot.market_id, "0xm");
        assert_eq!(snapshot.yes_bid, dec!(0.0));
        assert_eq!(snapshot.yes_ask, dec!(0.7));
        assert_eq!(snapshot.yes_mid, dec!(0.35));
        assert_eq!(client.requests(), vec!["market 0xm", "book 2"]);
    }

    #[tokio::test]
    async fn missing_yes_token_skips_book_fetch() {
        let client = MockClobClient::new();
        client.set_market("0xm", &[("NO", "1")]);

        let snapshotter = PriceSnapshotter::new(client.clone());
        let err = snapshotter.fetch_yes_mid("0xm").await.unwrap_err();

        assert!(matches!(err, MarketError::NoYesToken { ref market_id } if market_id == "0xm"));
        assert!(!err.is_transport());
        assert_eq!(client.requests(), vec!["market 0xm"]);
    }

    #[tokio::test]
    async fn lowercase_yes_is_not_a_yes_token() {
        let client = MockClobClient::new();
        client.set_market("0xm", &[("Yes", "1"), ("No", "2")]);

        let snapshotter = PriceSnapshotter::new(client);
        let err = snapshotter.fetch_yes_mid("0xm").await.unwrap_err();
        assert!(matches!(err, MarketError::NoYesToken { .. }));
    }

    #[tokio::test]
    async fn transport_errors_propagate_from_either_step() {
        let client = MockClobClient::with_config(MockConfig {
            fail_market: true,
            ..Default::default()
        });
        let err = PriceSnapshotter::new(client).fetch_yes_mid("0xm").await.unwrap_err();
        assert!(err.is_transport());

        let client = MockClobClient::with_config(MockConfig {
            fail_order_book: true,
            ..Default::default()
        });
        client.set_market("0xm", &[("YES", "2")]);
        let err = PriceSnapshotter::new(client).fetch_yes_mid("0xm").await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn unknown_market_is_a_transport_error() {
        let client = MockClobClient::new();
        let err = PriceSnapshotter::new(client).fetch_yes_mid("missing").await.unwrap_err();
        assert!(matches!(err, MarketError::HttpStatus { status: 404, .. }));
    }
}
