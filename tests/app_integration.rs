use std::fs;
use tracing::{error, info};

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const RATE_RESPONSE: &str = r#"{
        "Realtime Currency Exchange Rate": {
            "1. From_Currency Code": "EUR",
            "2. To_Currency Code": "USD",
            "3. From_Currency Name": "Euro",
            "4. To_Currency Name": "United States Dollar",
            "5. Exchange Rate": "1.08420000",
            "6. Last Refreshed": "2026-01-05 09:30:01",
            "7. Time Zone": "UTC",
            "8. Bid Price": "1.08410000",
            "9. Ask Price": "1.08430000"
        }
    }"#;

    pub async fn create_rate_server(mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }
}

#[test_log::test(tokio::test)]
async fn test_full_fetch_flow_with_mock() {
    let mock_server = test_utils::create_rate_server(test_utils::RATE_RESPONSE).await;

    // Setup config file pointing the provider at the mock
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    let config_content = format!(
        r#"
        api_key: "demo"
        default_pair: "EUR/USD"
        providers:
          alpha_vantage:
            base_url: {}
    "#,
        mock_server.uri()
    );

    fs::write(config_path, &config_content).expect("Failed to write config file");

    // Run app and verify success
    let result = fxwatch::run_command(
        fxwatch::AppCommand::Fetch {
            pairs: vec![],
            api_key: None,
            all: false,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Fetch command failed with: {:?}",
        result.err()
    );

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording should be enabled");
    assert_eq!(requests.len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_fetch_flow_rejects_unsupported_pair() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    fs::write(config_path, "api_key: \"demo\"\n").expect("Failed to write config file");

    let result = fxwatch::run_command(
        fxwatch::AppCommand::Fetch {
            pairs: vec!["EUR/XXX".to_string()],
            api_key: None,
            all: false,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("Unsupported pair should be rejected");
    assert!(err.to_string().contains("Unsupported currency pair"));
}

#[test_log::test(tokio::test)]
async fn test_watch_flow_polls_until_stopped() {
    use fxwatch::core::{CurrencyPair, RateWatcher};
    use fxwatch::providers::alpha_vantage::AlphaVantageProvider;
    use std::sync::Arc;
    use std::time::Duration;

    let mock_server = test_utils::create_rate_server(test_utils::RATE_RESPONSE).await;
    let provider =
        AlphaVantageProvider::new(&mock_server.uri()).expect("Failed to build provider");
    let watcher = RateWatcher::new(Arc::new(provider), Duration::from_millis(50));

    let handle = watcher
        .start("demo", CurrencyPair::default())
        .expect("Failed to start watch");
    tokio::time::sleep(Duration::from_millis(230)).await;
    handle.stop().await;

    let at_stop = mock_server
        .received_requests()
        .await
        .expect("Request recording should be enabled")
        .len();
    info!(?at_stop, "Requests observed while watching");
    assert!(
        at_stop >= 2,
        "Expected repeated polling, saw {at_stop} requests"
    );

    // No further requests may arrive once the session is stopped.
    tokio::time::sleep(Duration::from_millis(150)).await;
    let after_stop = mock_server
        .received_requests()
        .await
        .expect("Request recording should be enabled")
        .len();
    assert_eq!(at_stop, after_stop, "Polling continued after stop");
}

#[test_log::test(tokio::test)]
async fn test_watch_flow_requires_api_key() {
    use fxwatch::core::{CurrencyPair, MissingApiKey, RateWatcher};
    use fxwatch::providers::alpha_vantage::AlphaVantageProvider;
    use std::sync::Arc;
    use std::time::Duration;

    let mock_server = test_utils::create_rate_server(test_utils::RATE_RESPONSE).await;
    let provider =
        AlphaVantageProvider::new(&mock_server.uri()).expect("Failed to build provider");
    let watcher = RateWatcher::new(Arc::new(provider), Duration::from_millis(50));

    let rejected = watcher.start("", CurrencyPair::default());
    assert_eq!(rejected.err(), Some(MissingApiKey));
    tokio::time::sleep(Duration::from_millis(150)).await;

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording should be enabled");
    assert!(
        requests.is_empty(),
        "A rejected session must not touch the network"
    );
}

#[test_log::test(tokio::test)]
#[ignore = "hits the live Alpha Vantage API"]
async fn test_real_alpha_vantage_api() {
    use fxwatch::core::{CurrencyPair, RateProvider};
    use fxwatch::providers::alpha_vantage::{AlphaVantageProvider, DEFAULT_BASE_URL};

    let provider = AlphaVantageProvider::new(DEFAULT_BASE_URL).expect("Failed to build provider");

    // USD/JPY is the pair the public demo key answers for.
    let pair: CurrencyPair = "USD/JPY".parse().unwrap();
    info!(%pair, "Fetching exchange rate from Alpha Vantage");

    let result = provider.fetch_rate("demo", &pair).await;

    match result {
        Ok(snapshot) => {
            info!(?snapshot, "Received successful exchange rate response");
            assert_eq!(snapshot.from_code, "USD");
            assert_eq!(snapshot.to_code, "JPY");
            assert!(
                snapshot.rate_value().is_some(),
                "Rate should be decimal text"
            );
            assert!(!snapshot.last_refreshed.is_empty());
            assert!(!snapshot.time_zone.is_empty());

            info!(
                "Real API Response - {}: {} ({})",
                pair, snapshot.rate, snapshot.last_refreshed
            );
        }
        Err(e) => {
            error!("Exchange rate API request failed: {e}\n{e:?}");
            panic!("Exchange rate API request failed: {e}");
        }
    }
}
