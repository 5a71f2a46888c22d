//! Exchange rate data and the provider abstraction

use crate::core::currency::CurrencyPair;
use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

/// One realtime exchange rate reading, kept exactly as the provider reported
/// it. Display code renders these fields verbatim and never re-formats them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateSnapshot {
    pub from_code: String,
    pub to_code: String,
    /// Decimal text, e.g. "1.08420000".
    pub rate: String,
    pub last_refreshed: String,
    pub time_zone: String,
}

impl RateSnapshot {
    /// Numeric view of `rate` for comparisons. The displayed value stays text.
    pub fn rate_value(&self) -> Option<Decimal> {
        self.rate.trim().parse().ok()
    }
}

/// Why a fetch attempt produced no snapshot. The display strings are fixed
/// and user-facing; diagnostic detail goes to the log at the point of failure.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The endpoint answered, but not with the expected payload.
    #[error("Failed to retrieve data. Please check your API key and try again.")]
    UnexpectedShape,
    /// The request itself failed: connect, timeout, or a non-success status.
    #[error("Error fetching data. Please try again later.")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // Request errors embed the full URL, which carries the API key.
        FetchError::Transport(err.without_url().to_string())
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rate(
        &self,
        api_key: &str,
        pair: &CurrencyPair,
    ) -> Result<RateSnapshot, FetchError>;
}
