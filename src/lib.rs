//! Polymarket market finder and YES mid-price sampler.
//!
//! This library walks the paginated CLOB market listing looking for active,
//! unexpired markets whose question contains a set of keywords, and samples
//! the top of book for a market's YES token.
//!
//! # Pieces
//!
//! ```text
//! MarketSearcher    GET /markets[?next_cursor=..]  -> Vec<MarketListing>
//! PriceSnapshotter  GET /markets/{id}, GET /book   -> PriceSnapshot
//! ```
//!
//! Both run over a [`market::MarketDataClient`], so tests can swap the HTTP
//! client for [`market::MockClobClient`].
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`market`]: Market listing types, API client and keyword search
//! - [`orderbook`]: Order book payloads and price snapshots

pub mod config;
pub mod error;
pub mod market;
pub mod orderbook;

pub use config::Config;
pub use error::{MarketError, Result, ScoutError};
pub use market::{ClobClient, MarketDataClient, MarketListing, MarketSearcher};
pub use orderbook::{PriceSnapshot, PriceSnapshotter};
