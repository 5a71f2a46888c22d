pub mod cli;
pub mod core;
pub mod providers;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::core::CurrencyPair;
use crate::core::config::{AppConfig, DEFAULT_POLL_INTERVAL_SECS};
use crate::providers::alpha_vantage::{AlphaVantageProvider, DEFAULT_BASE_URL};

/// Environment variable consulted for the API key when no flag is given.
pub const API_KEY_ENV: &str = "FXWATCH_API_KEY";

#[derive(Debug)]
pub enum AppCommand {
    Watch {
        pair: Option<String>,
        api_key: Option<String>,
        interval_secs: Option<u64>,
    },
    Fetch {
        pairs: Vec<String>,
        api_key: Option<String>,
        all: bool,
    },
    Pairs,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxwatch starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    let base_url = config
        .providers
        .alpha_vantage
        .as_ref()
        .map_or(DEFAULT_BASE_URL, |p| &p.base_url);
    let provider = AlphaVantageProvider::new(base_url)?;

    match command {
        AppCommand::Watch {
            pair,
            api_key,
            interval_secs,
        } => {
            let api_key = resolve_api_key(api_key, &config)?;
            let pair = resolve_pair(pair.as_deref(), &config)?;
            let period = resolve_poll_interval(interval_secs, &config)?;
            cli::watch::run(Arc::new(provider), &api_key, pair, period).await
        }
        AppCommand::Fetch {
            pairs,
            api_key,
            all,
        } => {
            let api_key = resolve_api_key(api_key, &config)?;
            let pairs = if all {
                CurrencyPair::supported()
            } else if pairs.is_empty() {
                vec![resolve_pair(None, &config)?]
            } else {
                pairs
                    .iter()
                    .map(|raw| resolve_pair(Some(raw.as_str()), &config))
                    .collect::<Result<Vec<_>>>()?
            };
            cli::fetch::run(&provider, &api_key, &pairs).await
        }
        AppCommand::Pairs => {
            cli::pairs::run();
            Ok(())
        }
    }
}

fn resolve_api_key(flag: Option<String>, config: &AppConfig) -> Result<String> {
    let env_key = std::env::var(API_KEY_ENV).ok();
    resolve_api_key_from(flag, env_key, config)
}

/// Key precedence: command line flag, then environment, then config file.
fn resolve_api_key_from(
    flag: Option<String>,
    env_key: Option<String>,
    config: &AppConfig,
) -> Result<String> {
    let key = flag.or(env_key).or_else(|| config.api_key.clone());
    match key {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => bail!(
            "No API key given. Pass --api-key, set {API_KEY_ENV}, or add api_key to the config file"
        ),
    }
}

fn resolve_pair(raw: Option<&str>, config: &AppConfig) -> Result<CurrencyPair> {
    let pair = match raw {
        Some(raw) => raw.parse::<CurrencyPair>()?,
        None => match &config.default_pair {
            Some(raw) => raw
                .parse::<CurrencyPair>()
                .context("Invalid default_pair in config")?,
            None => CurrencyPair::default(),
        },
    };
    if !pair.is_supported() {
        bail!(
            "Unsupported currency pair: {pair}. Supported pairs: {}",
            supported_pairs_list()
        );
    }
    Ok(pair)
}

/// Interval precedence: command line flag, then config file, then the 10s
/// default. Zero is rejected rather than silently bumped.
fn resolve_poll_interval(flag: Option<u64>, config: &AppConfig) -> Result<Duration> {
    let secs = flag
        .or(config.poll_interval_secs)
        .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
    if secs == 0 {
        bail!("Polling interval must be at least 1 second");
    }
    Ok(Duration::from_secs(secs))
}

fn supported_pairs_list() -> String {
    CurrencyPair::supported()
        .iter()
        .map(|pair| pair.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
