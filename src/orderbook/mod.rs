//! Order book payloads and YES mid-price snapshots.

pub mod snapshot;
pub mod types;

pub use snapshot::{PriceSnapshot, PriceSnapshotter};
pub use types::{OrderBookResponse, OrderLevel};
