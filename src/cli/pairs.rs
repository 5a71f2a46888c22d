//! Lists the supported currency pairs.

use comfy_table::Cell;

use super::ui;
use crate::core::CurrencyPair;

pub fn run() {
    println!("{}", render_pairs());
}

fn render_pairs() -> String {
    let default_pair = CurrencyPair::default();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Pair"),
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell(""),
    ]);

    for pair in CurrencyPair::supported() {
        let marker = if pair == default_pair { "default" } else { "" };
        table.add_row(vec![
            Cell::new(pair.to_string()),
            Cell::new(pair.from_code()),
            Cell::new(pair.to_code()),
            Cell::new(marker),
        ]);
    }

    table.to_string()
}
