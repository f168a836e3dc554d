//! Order book payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Single price level in an order book.
///
/// The API sends prices as strings; plain JSON numbers are accepted too.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderLevel {
    /// Price at this level.
    pub price: Decimal,
    /// Size available at this level.
    #[serde(default)]
    pub size: Option<Decimal>,
}

impl OrderLevel {
    /// Create a new price level.
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self {
            price,
            size: Some(size),
        }
    }
}

/// Order book response for one outcome token.
///
/// Levels are kept in the order the API sent them, best first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderBookResponse {
    /// Bid levels.
    #[serde(default)]
    pub bids: Option<Vec<OrderLevel>>,
    /// Ask levels.
    #[serde(default)]
    pub asks: Option<Vec<OrderLevel>>,
    /// Market (condition) ID.
    #[serde(default)]
    pub market: Option<String>,
    /// Token ID.
    #[serde(default)]
    pub asset_id: Option<String>,
}

impl OrderBookResponse {
    /// Price of the first bid, if the book has any bids.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.as_deref().and_then(<[_]>::first).map(|l| l.price)
    }

    /// Price of the first ask, if the book has any asks.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.as_deref().and_then(<[_]>::first).map(|l| l.price)
    }

    /// Best bid, or 0 when the bid side is empty.
    pub fn best_bid_or_floor(&self) -> Decimal {
        self.best_bid().unwrap_or(Decimal::ZERO)
    }

    /// Best ask, or 1 when the ask side is empty.
    pub fn best_ask_or_ceiling(&self) -> Decimal {
        self.best_ask().unwrap_or(Decimal::ONE)
    }
}
