use super::ui;
use crate::core::catalog::TickerCatalog;
use comfy_table::Cell;

pub fn tickers_table(catalog: &TickerCatalog) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Ticker"), ui::header_cell("Company")]);
    for (ticker, info) in catalog.iter() {
        table.add_row(vec![Cell::new(ticker), Cell::new(&info.name)]);
    }
    table.to_string()
}

pub fn run(catalog: &TickerCatalog) {
    println!("{}", tickers_table(catalog));
}
