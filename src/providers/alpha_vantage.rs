//! Alpha Vantage realtime exchange rate provider

use crate::core::{CurrencyPair, FetchError, RateProvider, RateSnapshot};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

pub struct AlphaVantageProvider {
    base_url: String,
    client: reqwest::Client,
}

impl AlphaVantageProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fxwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(AlphaVantageProvider {
            base_url: base_url.to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RateEnvelope {
    #[serde(rename = "Realtime Currency Exchange Rate")]
    rate: Option<WireRate>,
}

#[derive(Debug, Deserialize)]
struct WireRate {
    #[serde(rename = "1. From_Currency Code")]
    from_currency_code: String,
    #[serde(rename = "2. To_Currency Code")]
    to_currency_code: String,
    #[serde(rename = "5. Exchange Rate")]
    exchange_rate: String,
    #[serde(rename = "6. Last Refreshed")]
    last_refreshed: String,
    #[serde(rename = "7. Time Zone")]
    time_zone: String,
}

impl From<WireRate> for RateSnapshot {
    fn from(wire: WireRate) -> Self {
        RateSnapshot {
            from_code: wire.from_currency_code,
            to_code: wire.to_currency_code,
            rate: wire.exchange_rate,
            last_refreshed: wire.last_refreshed,
            time_zone: wire.time_zone,
        }
    }
}

#[async_trait]
impl RateProvider for AlphaVantageProvider {
    // The full URL carries the API key, so logs only ever see the base URL.
    #[instrument(name = "AlphaVantageFetch", skip(self, api_key), fields(pair = %pair))]
    async fn fetch_rate(
        &self,
        api_key: &str,
        pair: &CurrencyPair,
    ) -> Result<RateSnapshot, FetchError> {
        let url = format!(
            "{}/query?function=CURRENCY_EXCHANGE_RATE&from_currency={}&to_currency={}&apikey={}",
            self.base_url,
            pair.from_code(),
            pair.to_code(),
            api_key
        );
        debug!("Requesting exchange rate from {}/query", self.base_url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!("Exchange rate endpoint answered with HTTP {status}");
            return Err(FetchError::Transport(format!("HTTP status {status}")));
        }

        let body = response.text().await?;
        let envelope: RateEnvelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(err) => {
                debug!("Response was not the expected JSON shape: {err}");
                return Err(FetchError::UnexpectedShape);
            }
        };

        match envelope.rate {
            Some(wire) => Ok(wire.into()),
            None => {
                debug!("Response is missing the realtime exchange rate object");
                Err(FetchError::UnexpectedShape)
            }
        }
    }
}
