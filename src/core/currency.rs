//! Currency pair types and the fixed set of watchable pairs.

use anyhow::{Result, anyhow};
use std::fmt::Display;
use std::str::FromStr;

/// Pairs offered by the selector. The first entry is the default.
const SUPPORTED_PAIRS: [(&str, &str); 6] = [
    ("EUR", "USD"),
    ("USD", "JPY"),
    ("GBP", "USD"),
    ("USD", "CHF"),
    ("AUD", "USD"),
    ("USD", "CAD"),
];

/// An ordered pair of ISO 4217 currency codes, e.g. EUR/USD.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    from: String,
    to: String,
}

impl CurrencyPair {
    pub fn new(from: &str, to: &str) -> Result<Self> {
        Ok(CurrencyPair {
            from: validate_code(from)?,
            to: validate_code(to)?,
        })
    }

    pub fn from_code(&self) -> &str {
        &self.from
    }

    pub fn to_code(&self) -> &str {
        &self.to
    }

    /// The fixed list of pairs the application offers.
    pub fn supported() -> Vec<CurrencyPair> {
        SUPPORTED_PAIRS
            .iter()
            .map(|(from, to)| CurrencyPair {
                from: (*from).to_string(),
                to: (*to).to_string(),
            })
            .collect()
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_PAIRS
            .iter()
            .any(|(from, to)| self.from == *from && self.to == *to)
    }
}

fn validate_code(code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(anyhow!("Invalid currency code: {code}"))
    }
}

impl Default for CurrencyPair {
    fn default() -> Self {
        CurrencyPair {
            from: "EUR".to_string(),
            to: "USD".to_string(),
        }
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

impl FromStr for CurrencyPair {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once('/')
            .ok_or_else(|| anyhow!("Invalid currency pair: {s} (expected FROM/TO, e.g. EUR/USD)"))?;
        CurrencyPair::new(from, to)
    }
}
