//! Market listing types and raw API payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Cursor the listing endpoint hands out on its final page.
pub const END_CURSOR: &str = "LTE=";

/// Outcome label of a binary market token.
///
/// Parsing is case-sensitive: only the exact labels "YES" and "NO" map to a
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Outcome {
    /// The YES token.
    #[strum(serialize = "YES")]
    #[serde(rename = "YES")]
    Yes,
    /// The NO token.
    #[strum(serialize = "NO")]
    #[serde(rename = "NO")]
    No,
}

/// Trading status of a listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MarketStatus {
    /// Market accepts trading.
    Active,
    /// Market is closed or paused.
    #[default]
    Inactive,
}

impl MarketStatus {
    /// Whether the market is active.
    pub fn is_active(&self) -> bool {
        matches!(self, MarketStatus::Active)
    }
}

/// A market listing taken from one page of the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketListing {
    /// Market question text.
    pub question: String,
    /// Condition identifier, unique per market.
    pub condition_id: String,
    /// Trading status.
    pub status: MarketStatus,
    /// Parsed end date, if present and parsable.
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
    /// End date exactly as the API sent it.
    pub end_date_iso: Option<String>,
}

impl MarketListing {
    /// Build a listing from a raw page record.
    ///
    /// Returns `None` when the record is not a JSON object. Missing string
    /// fields default to empty and a missing `active` flag means inactive.
    pub fn from_record(record: &Value) -> Option<Self> {
        let fields = record.as_object()?;

        let text = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let status = if fields.get("active").and_then(Value::as_bool) == Some(true) {
            MarketStatus::Active
        } else {
            MarketStatus::Inactive
        };

        let end_date_iso = fields
            .get("end_date_iso")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let end_date = end_date_iso.as_deref().and_then(parse_end_date);

        Some(Self {
            question: text("question"),
            condition_id: text("condition_id"),
            status,
            end_date,
            end_date_iso,
        })
    }

    /// Whether the end date is known and strictly before `now`.
    ///
    /// An unparsable end date is unknown, so the listing is not expired.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.end_date.is_some_and(|end| end < now)
    }

    /// Human-readable end date annotated relative to `now`.
    pub fn end_date_label(&self, now: OffsetDateTime) -> String {
        match (&self.end_date_iso, self.end_date) {
            (Some(raw), Some(end)) if end >= now => format!("{} (future)", raw),
            (Some(raw), Some(_)) => format!("{} (past)", raw),
            (Some(raw), None) => format!("{} (unknown parse)", raw),
            (None, _) => "N/A".to_string(),
        }
    }
}

/// Parse an ISO-8601 end date.
///
/// Accepts RFC 3339 timestamps, naive date-times (taken as UTC) and bare
/// dates (midnight UTC).
pub fn parse_end_date(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt);
    }

    if let Ok(dt) = PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    ) {
        return Some(dt.assume_utc());
    }

    if let Ok(dt) = PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Some(dt.assume_utc());
    }

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// One page of the market listing endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MarketsPage {
    /// Raw market records. Kept untyped so a malformed record can be
    /// skipped without failing the page.
    #[serde(default)]
    pub data: Vec<Value>,
    /// Cursor for the following page.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl MarketsPage {
    /// Cursor to request next, or `None` when the listing is exhausted.
    pub fn continuation(&self) -> Option<&str> {
        self.next_cursor
            .as_deref()
            .filter(|cursor| !cursor.is_empty() && *cursor != END_CURSOR)
    }
}

/// Outcome token entry of a market.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TokenInfo {
    /// Outcome label ("YES", "NO", ...).
    #[serde(default)]
    pub outcome: String,
    /// CLOB token identifier.
    #[serde(default)]
    pub token_id: Option<String>,
}

/// Single market resource.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MarketDetail {
    /// Condition identifier, when echoed back.
    #[serde(default)]
    pub condition_id: Option<String>,
    /// Market question, when echoed back.
    #[serde(default)]
    pub question: Option<String>,
    /// Outcome tokens.
    #[serde(default)]
    pub tokens: Vec<TokenInfo>,
}

impl MarketDetail {
    /// First token whose outcome label is exactly `outcome`.
    pub fn token(&self, outcome: Outcome) -> Option<&TokenInfo> {
        self.tokens
            .iter()
            .find(|token| token.outcome.parse::<Outcome>().ok() == Some(outcome))
    }
}
