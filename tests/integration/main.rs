//! Integration tests for the market scout.
//!
//! The mock-backed tests run by default. The live tests hit the public
//! Polymarket CLOB API and are ignored unless requested:
//! Run with: cargo test --test integration -- --ignored

use std::num::NonZeroUsize;

use market_scout::config::Config;
use market_scout::error::MarketError;
use market_scout::market::{ClobClient, MarketSearcher, MockClobClient};
use market_scout::orderbook::PriceSnapshotter;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

fn n(value: usize) -> NonZeroUsize {
    NonZeroUsize::new(value).unwrap()
}

/// Search, then snapshot the first match, the way `search --probe` does.
#[test]
fn search_then_probe_first_match() {
    let client = MockClobClient::new();
    client.set_page(
        None,
        json!({
            "data": [
                {"question": "Fed decision in September?", "condition_id": "0xfed",
                 "active": true, "end_date_iso": "2099-09-17T00:00:00Z"},
                {"question": "Fed decision in October?", "condition_id": "0xoct",
                 "active": true}
            ],
            "next_cursor": "LTE="
        }),
    );
    client.set_market("0xfed", &[("YES", "111"), ("NO", "222")]);
    client.set_order_book(
        "111",
        json!({
            "bids": [{"price": "0.62", "size": "10"}, {"price": "0.61", "size": "5"}],
            "asks": [{"price": "0.64", "size": "7"}]
        }),
    );

    let (found, snapshot) = tokio_test::block_on(async {
        let found = MarketSearcher::new(&client)
            .find_markets(&["fed", "decision"], n(1), n(100))
            .await
            .unwrap();
        let snapshot = PriceSnapshotter::new(&client)
            .fetch_yes_mid(&found[0].condition_id)
            .await
            .unwrap();
        (found, snapshot)
    });

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].condition_id, "0xfed");
    assert_eq!(snapshot.yes_bid, dec!(0.62));
    assert_eq!(snapshot.yes_ask, dec!(0.64));
    assert_eq!(snapshot.yes_mid, dec!(0.63));
    assert_eq!(client.requests(), vec!["page", "market 0xfed", "book 111"]);
}

/// Two pages, three matches, two fetches.
#[tokio::test]
async fn search_spans_pages_until_match_limit() {
    let client = MockClobClient::new();
    let record = |id: &str| {
        json!({"question": format!("Will oil close above {}?", id), "condition_id": id, "active": true})
    };
    client.set_page(None, json!({"data": [record("80"), record("90")], "next_cursor": "abc"}));
    client.set_page(Some("abc"), json!({"data": [record("100")], "next_cursor": null}));

    let found = MarketSearcher::new(client.clone())
        .find_markets(&["OIL"], n(3), n(100))
        .await
        .unwrap();

    let ids: Vec<_> = found.iter().map(|m| m.condition_id.as_str()).collect();
    assert_eq!(ids, vec!["80", "90", "100"]);
    assert_eq!(client.requests(), vec!["page", "page abc"]);
}

/// A market with only a NO token is unsupported, not a transport failure.
#[tokio::test]
async fn snapshot_of_market_without_yes_token() {
    let client = MockClobClient::new();
    client.set_market("0xno", &[("NO", "1")]);

    let err = PriceSnapshotter::new(&client)
        .fetch_yes_mid("0xno")
        .await
        .unwrap_err();

    assert!(matches!(err, MarketError::NoYesToken { .. }));
    assert!(!err.is_transport());
    assert_eq!(client.requests(), vec!["market 0xno"]);
}

/// Live: the first listing page decodes and a bounded search completes.
#[tokio::test]
#[ignore = "requires network access to clob.polymarket.com"]
async fn live_search_completes() {
    let client = ClobClient::new(&Config::default()).expect("client");

    let found = MarketSearcher::new(&client)
        .find_markets(&["will"], n(3), n(2))
        .await;
    assert!(found.is_ok(), "Search failed: {:?}", found.err());

    let found = found.unwrap();
    assert!(found.len() <= 3);
    for market in &found {
        assert!(market.status.is_active());
        println!("{} - {}", market.condition_id, market.question);
    }
}

/// Live: snapshot the first active match, tolerating markets whose tokens
/// are not labelled "YES".
#[tokio::test]
#[ignore = "requires network access to clob.polymarket.com"]
async fn live_snapshot_invariants() {
    let client = ClobClient::new(&Config::default()).expect("client");

    let found = MarketSearcher::new(&client)
        .find_markets(&["will"], n(1), n(5))
        .await
        .expect("search");
    let Some(market) = found.first() else {
        println!("Skipping: no active market found");
        return;
    };

    match PriceSnapshotter::new(&client)
        .fetch_yes_mid(&market.condition_id)
        .await
    {
        Ok(snapshot) => {
            assert!(snapshot.yes_bid >= Decimal::ZERO);
            assert!(snapshot.yes_ask <= Decimal::ONE);
            assert_eq!(snapshot.yes_mid, (snapshot.yes_bid + snapshot.yes_ask) / Decimal::TWO);
            println!("{:?}", snapshot);
        }
        Err(MarketError::NoYesToken { market_id }) => {
            println!("Market {} has no YES token", market_id);
        }
        Err(e) => panic!("Snapshot failed: {}", e),
    }
}
