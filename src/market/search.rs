//! Keyword search across the paginated market listing.

use std::num::NonZeroUsize;

use time::OffsetDateTime;
use tracing::{debug, info, instrument};

use super::client::MarketDataClient;
use super::types::MarketListing;
use crate::error::MarketError;

/// Whether every keyword occurs in `question`, ignoring case.
///
/// Matching is by substring, not whole word. An empty keyword list matches
/// any question.
pub fn question_matches<S: AsRef<str>>(question: &str, keywords: &[S]) -> bool {
    let question = question.to_lowercase();
    keywords
        .iter()
        .all(|keyword| question.contains(&keyword.as_ref().to_lowercase()))
}

/// Walks the market listing page by page and collects keyword matches.
#[derive(Debug, Clone)]
pub struct MarketSearcher<C> {
    client: C,
}

impl<C: MarketDataClient> MarketSearcher<C> {
    /// Create a searcher over a market data client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Find up to `max_matches` active, unexpired markets whose question
    /// contains every keyword, scanning at most `max_pages` pages.
    ///
    /// Returns as soon as the match limit is reached, even mid-page. Any
    /// request failure aborts the whole search.
    #[instrument(skip(self, keywords), fields(keywords = ?keywords))]
    pub async fn find_markets<S: AsRef<str> + std::fmt::Debug>(
        &self,
        keywords: &[S],
        max_matches: NonZeroUsize,
        max_pages: NonZeroUsize,
    ) -> Result<Vec<MarketListing>, MarketError> {
        let mut cursor: Option<String> = None;
        let mut pages_scanned = 0usize;
        let mut matches = Vec::new();

        while pages_scanned < max_pages.get() {
            let page = self.client.list_markets(cursor.as_deref()).await?;
            let now = OffsetDateTime::now_utc();

            let mut skipped = 0usize;
            for record in &page.data {
                let Some(listing) = MarketListing::from_record(record) else {
                    skipped += 1;
                    continue;
                };

                if !listing.status.is_active() || listing.is_expired(now) {
                    continue;
                }

                if question_matches(&listing.question, keywords) {
                    debug!(condition_id = %listing.condition_id, "Matched market");
                    matches.push(listing);
                    if matches.len() == max_matches.get() {
                        info!(
                            pages = pages_scanned + 1,
                            matches = matches.len(),
                            "Reached match limit"
                        );
                        return Ok(matches);
                    }
                }
            }

            debug!(
                page = pages_scanned + 1,
                records = page.data.len(),
                malformed = skipped,
                matches = matches.len(),
                "Scanned market page"
            );

            match page.continuation() {
                Some(next) => cursor = Some(next.to_string()),
                None => {
                    debug!("Market listing exhausted");
                    break;
                }
            }

            pages_scanned += 1;
        }

        info!(
            pages = pages_scanned,
            matches = matches.len(),
            "Market search finished"
        );
        Ok(matches)
    }
}
