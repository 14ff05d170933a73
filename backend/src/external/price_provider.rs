use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::PricePoint;

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("no data found")]
    NotFound,
}

/// Source of daily closing prices for a ticker.
///
/// Both methods return points oldest first. An empty vector and
/// `PriceProviderError::NotFound` mean the same thing to callers: no data.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Closes from `start` up to but not including `end`, so a partial
    /// session on `end` is never returned.
    async fn fetch_range(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, PriceProviderError>;

    /// Closes for roughly the last `days` calendar days.
    async fn fetch_recent(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, PriceProviderError>;
}
