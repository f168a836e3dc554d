//! Market module for Polymarket listings.
//!
//! This module handles:
//! - Market types and raw API payloads
//! - The market data client capability and its HTTP implementation
//! - Keyword search across the paginated listing
//! - Mock client for testing

pub mod client;
pub mod mock;
pub mod search;
pub mod types;

pub use client::{ClobClient, MarketDataClient};
pub use mock::{MockClobClient, MockConfig};
pub use search::{question_matches, MarketSearcher};
pub use types::{MarketListing, MarketStatus, Outcome};
