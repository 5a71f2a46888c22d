//! The live watch screen.
//!
//! Subscribes to a [`RateWatcher`] session and redraws the terminal on every
//! state change. The five response fields are rendered exactly as the
//! provider reported them; only the trend arrow is derived locally.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use comfy_table::Cell;
use console::Term;
use rust_decimal::Decimal;
use tracing::debug;

use super::ui::{self, StyleType};
use crate::core::{CurrencyPair, RateProvider, RateSnapshot, RateWatcher, Session, SessionState};

pub async fn run(
    provider: Arc<dyn RateProvider>,
    api_key: &str,
    pair: CurrencyPair,
    period: Duration,
) -> Result<()> {
    let watcher = RateWatcher::new(provider, period);
    let handle = watcher.start(api_key, pair)?;
    let mut updates = handle.updates();

    let term = Term::stdout();
    let mut trend = None;

    let session = updates.borrow().clone();
    draw(&term, &render_session(&session, &mut trend, period));

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let session = updates.borrow_and_update().clone();
                draw(&term, &render_session(&session, &mut trend, period));
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("Ctrl-C received; stopping watch");
                break;
            }
        }
    }

    handle.stop().await;
    Ok(())
}

fn draw(term: &Term, frame: &str) {
    term.clear_screen().ok();
    println!("{frame}");
}

fn render_session(
    session: &Session,
    trend: &mut Option<(String, Decimal)>,
    period: Duration,
) -> String {
    let title = format!("Currency Exchange Rate ({})", session.pair());
    let mut output = format!("{}\n", ui::style_text(&title, StyleType::Title));

    match session.state() {
        SessionState::Idle => {
            output.push_str(&format!(
                "\n{}\n",
                ui::style_text("Waiting for the next fetch...", StyleType::Subtle)
            ));
        }
        SessionState::Fetching => {
            output.push_str(&format!(
                "\n{}\n",
                ui::style_text("Loading data...", StyleType::Subtle)
            ));
        }
        SessionState::Success(snapshot) => {
            let delta = trend_against(trend, snapshot);
            output.push_str(&format!("\n{}\n", snapshot_table(snapshot, delta)));

            if let Some(fetched) = session.last_fetched() {
                let local = fetched.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
                output.push_str(&format!(
                    "\n{} {}\n",
                    ui::style_text("Last fetched:", StyleType::Label),
                    ui::style_text(&local.to_string(), StyleType::Value)
                ));
            }

            let footer = format!(
                "Refreshing every {}s. Press Ctrl-C to quit.",
                period.as_secs()
            );
            output.push_str(&format!(
                "\n{}\n",
                ui::style_text(&footer, StyleType::Subtle)
            ));
        }
        SessionState::Error(message) => {
            output.push_str(&format!(
                "\n{}\n",
                ui::style_text(message, StyleType::Error)
            ));
        }
    }

    if session.prompt_visible() {
        output.push_str(&format!("\n{}\n", key_prompt()));
    }

    output
}

fn snapshot_table(snapshot: &RateSnapshot, delta: Option<Decimal>) -> comfy_table::Table {
    let mut table = ui::new_styled_table();
    table.add_row(vec![
        ui::header_cell("From Currency Code"),
        Cell::new(&snapshot.from_code),
    ]);
    table.add_row(vec![
        ui::header_cell("To Currency Code"),
        Cell::new(&snapshot.to_code),
    ]);
    let mut rate_row = vec![ui::header_cell("Exchange Rate"), Cell::new(&snapshot.rate)];
    if let Some(delta) = delta {
        rate_row.push(ui::trend_cell(delta));
    }
    table.add_row(rate_row);
    table.add_row(vec![
        ui::header_cell("Last Refreshed"),
        Cell::new(&snapshot.last_refreshed),
    ]);
    table.add_row(vec![
        ui::header_cell("Time Zone"),
        Cell::new(&snapshot.time_zone),
    ]);
    table
}

/// Movement since the previous reading of the same pair. Unparseable rate
/// text yields no arrow and keeps the previous reference point.
fn trend_against(trend: &mut Option<(String, Decimal)>, snapshot: &RateSnapshot) -> Option<Decimal> {
    let current = snapshot.rate_value()?;
    let key = format!("{}/{}", snapshot.from_code, snapshot.to_code);
    let delta = match trend {
        Some((prev_key, prev)) if *prev_key == key => Some(current - *prev),
        _ => None,
    };
    *trend = Some((key, current));
    delta
}

fn key_prompt() -> String {
    let lines = [
        format!(
            "Set your Alpha Vantage API key with --api-key, the {} environment variable, or `fxwatch setup`.",
            crate::API_KEY_ENV
        ),
        "Pick a pair with --pair; run `fxwatch pairs` to list the supported pairs.".to_string(),
    ];
    lines
        .iter()
        .map(|line| ui::style_text(line, StyleType::Subtle))
        .collect::<Vec<_>>()
        .join("\n")
}
