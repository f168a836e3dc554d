//! Polymarket CLOB API client wrapper.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::error::MarketError;
use crate::orderbook::types::OrderBookResponse;

use super::types::{MarketDetail, MarketsPage};

/// Read-only market data capability used by the searcher and snapshotter.
///
/// Implementations issue one GET per call and fail on non-2xx responses.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Fetch one page of the market listing, continuing from `cursor`.
    async fn list_markets(&self, cursor: Option<&str>) -> Result<MarketsPage, MarketError>;

    /// Fetch a single market by condition identifier.
    async fn get_market(&self, market_id: &str) -> Result<MarketDetail, MarketError>;

    /// Fetch the order book for one outcome token.
    async fn get_order_book(&self, token_id: &str) -> Result<OrderBookResponse, MarketError>;
}

#[async_trait]
impl<T: MarketDataClient + ?Sized> MarketDataClient for &T {
    async fn list_markets(&self, cursor: Option<&str>) -> Result<MarketsPage, MarketError> {
        (**self).list_markets(cursor).await
    }

    async fn get_market(&self, market_id: &str) -> Result<MarketDetail, MarketError> {
        (**self).get_market(market_id).await
    }

    async fn get_order_book(&self, token_id: &str) -> Result<OrderBookResponse, MarketError> {
        (**self).get_order_book(token_id).await
    }
}

/// Polymarket CLOB API client.
#[derive(Debug, Clone)]
pub struct ClobClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL for CLOB API.
    base_url: Url,
}

impl ClobClient {
    /// Create a new client from config.
    pub fn new(config: &Config) -> Result<Self, MarketError> {
        let base_url = Url::parse(&config.polymarket_clob_url)
            .map_err(|e| MarketError::InvalidEndpoint(format!("{}: {}", config.polymarket_clob_url, e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(Duration::from_millis(config.http_connect_timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Get the CLOB base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL.
    ///
    /// Segments are percent-encoded, so an identifier can never escape its
    /// position in the path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, MarketError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MarketError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `url` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, MarketError> {
        let response = self.http.get(url.clone()).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::HttpStatus {
                url: response.url().to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MarketError::Parse(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl MarketDataClient for ClobClient {
    #[instrument(skip(self))]
    async fn list_markets(&self, cursor: Option<&str>) -> Result<MarketsPage, MarketError> {
        let url = self.endpoint(&["markets"])?;
        let page: MarketsPage = match cursor {
            Some(cursor) => self.get_json(url, &[("next_cursor", cursor)]).await?,
            None => self.get_json(url, &[]).await?,
        };

        debug!(
            records = page.data.len(),
            next_cursor = ?page.next_cursor,
            "Fetched market page"
        );
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn get_market(&self, market_id: &str) -> Result<MarketDetail, MarketError> {
        let url = self.endpoint(&["markets", market_id])?;
        let market: MarketDetail = self.get_json(url, &[]).await?;

        debug!(tokens = market.tokens.len(), "Fetched market");
        Ok(market)
    }

    #[instrument(skip(self))]
    async fn get_order_book(&self, token_id: &str) -> Result<OrderBookResponse, MarketError> {
        let url = self.endpoint(&["book"])?;
        let book: OrderBookResponse = self.get_json(url, &[("token_id", token_id)]).await?;

        debug!(
            bids = book.bids.as_ref().map_or(0, Vec::len),
            asks = book.asks.as_ref().map_or(0, Vec::len),
            "Fetched order book"
        );
        Ok(book)
    }
}
