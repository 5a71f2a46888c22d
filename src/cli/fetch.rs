//! One-shot rate fetch for one or more pairs.

use anyhow::{Result, anyhow};
use comfy_table::Cell;
use futures::future::join_all;

use super::ui;
use crate::core::{CurrencyPair, FetchError, RateProvider, RateSnapshot};

pub async fn run(provider: &dyn RateProvider, api_key: &str, pairs: &[CurrencyPair]) -> Result<()> {
    let pb = ui::new_progress_bar(pairs.len() as u64);
    pb.set_message("Fetching rates...");

    let rate_futures = pairs.iter().map(|pair| {
        let pb = pb.clone();
        async move {
            let outcome = provider.fetch_rate(api_key, pair).await;
            pb.inc(1);
            (pair.clone(), outcome)
        }
    });
    let results = join_all(rate_futures).await;
    pb.finish_and_clear();

    println!("{}", render_results(&results));

    if results.iter().all(|(_, outcome)| outcome.is_err()) {
        return Err(anyhow!("No exchange rate could be fetched"));
    }
    Ok(())
}

fn render_results(results: &[(CurrencyPair, Result<RateSnapshot, FetchError>)]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Pair"),
        ui::header_cell("Exchange Rate"),
        ui::header_cell("Last Refreshed"),
        ui::header_cell("Time Zone"),
    ]);

    for (pair, outcome) in results {
        match outcome {
            Ok(snapshot) => {
                table.add_row(vec![
                    Cell::new(pair.to_string()),
                    Cell::new(&snapshot.rate),
                    Cell::new(&snapshot.last_refreshed),
                    Cell::new(&snapshot.time_zone),
                ]);
            }
            Err(err) => {
                table.add_row(vec![
                    Cell::new(pair.to_string()),
                    ui::error_cell(&err.to_string()),
                ]);
            }
        }
    }

    table.to_string()
}
