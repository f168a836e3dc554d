//! Mock market data client for unit testing.
//!
//! This module provides an in-memory client that can be used in tests
//! without making real network requests. Responses are stored as raw JSON
//! and decoded the same way the HTTP client decodes response bodies;
//! anything not configured answers like a 404.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::MarketError;
use crate::orderbook::types::OrderBookResponse;

use super::client::MarketDataClient;
use super::types::{MarketDetail, MarketsPage};

/// Configuration for mock client behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Whether to fail listing requests with HTTP 500.
    pub fail_listing: bool,
    /// Whether to fail market requests with HTTP 500.
    pub fail_market: bool,
    /// Whether to fail order book requests with HTTP 500.
    pub fail_order_book: bool,
}

#[derive(Debug, Default)]
struct MockState {
    /// Listing pages keyed by the cursor that requests them.
    pages: HashMap<Option<String>, Value>,
    /// Market resources by condition ID.
    markets: HashMap<String, Value>,
    /// Order books by token ID.
    books: HashMap<String, Value>,
    /// Every request served, in order.
    requests: Vec<String>,
}

/// Mock market data client for testing.
///
/// Clones share state, so a test can keep one handle to inspect the
/// request log while another is owned by the component under test.
#[derive(Debug, Clone, Default)]
pub struct MockClobClient {
    config: MockConfig,
    state: Arc<Mutex<MockState>>,
}

impl MockClobClient {
    /// Create a new mock client with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock client with custom configuration.
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            state: Arc::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the listing page served for `cursor` (`None` is the first page).
    pub fn set_page(&self, cursor: Option<&str>, page: Value) {
        self.state().pages.insert(cursor.map(str::to_string), page);
    }

    /// Set a market whose tokens are `(outcome, token_id)` pairs.
    pub fn set_market(&self, market_id: &str, tokens: &[(&str, &str)]) {
        let tokens: Vec<Value> = tokens
            .iter()
            .map(|(outcome, token_id)| json!({"outcome": outcome, "token_id": token_id}))
            .collect();
        self.set_market_json(market_id, json!({"condition_id": market_id, "tokens": tokens}));
    }

    /// Set a market resource from raw JSON.
    pub fn set_market_json(&self, market_id: &str, market: Value) {
        self.state().markets.insert(market_id.to_string(), market);
    }

    /// Set the order book served for a token.
    pub fn set_order_book(&self, token_id: &str, book: Value) {
        self.state().books.insert(token_id.to_string(), book);
    }

    /// Requests served so far, e.g. `"page"`, `"page abc"`, `"market 0x1"`,
    /// `"book 42"`.
    pub fn requests(&self) -> Vec<String> {
        self.state().requests.clone()
    }

    /// Number of listing pages requested so far.
    pub fn page_requests(&self) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|r| r.starts_with("page"))
            .count()
    }

    /// Clear all mock data and the request log.
    pub fn clear(&self) {
        *self.state() = MockState::default();
    }

    fn serve<T: DeserializeOwned>(
        &self,
        request: String,
        path: String,
        fail: bool,
        lookup: impl FnOnce(&MockState) -> Option<Value>,
    ) -> Result<T, MarketError> {
        let mut state = self.state();
        state.requests.push(request);

        if fail {
            return Err(MarketError::HttpStatus {
                url: path,
                status: 500,
            });
        }

        let body = lookup(&*state).ok_or(MarketError::HttpStatus {
            url: path.clone(),
            status: 404,
        })?;

        serde_json::from_value(body).map_err(|e| MarketError::Parse(format!("{}: {}", path, e)))
    }
}

#[async_trait]
impl MarketDataClient for MockClobClient {
    async fn list_markets(&self, cursor: Option<&str>) -> Result<MarketsPage, MarketError> {
        let (request, path) = match cursor {
            Some(c) => (format!("page {}", c), format!("mock://markets?next_cursor={}", c)),
            None => ("page".to_string(), "mock://markets".to_string()),
        };
        let key = cursor.map(str::to_string);
        self.serve(request, path, self.config.fail_listing, |state| {
            state.pages.get(&key).cloned()
        })
    }

    async fn get_market(&self, market_id: &str) -> Result<MarketDetail, MarketError> {
        self.serve(
            format!("market {}", market_id),
            format!("mock://markets/{}", market_id),
            self.config.fail_market,
            |state| state.markets.get(market_id).cloned(),
        )
    }

    async fn get_order_book(&self, token_id: &str) -> Result<OrderBookResponse, MarketError> {
        self.serve(
            format!("book {}", token_id),
            format!("mock://book?token_id={}", token_id),
            self.config.fail_order_book,
            |state| state.books.get(token_id).cloned(),
        )
    }
}
