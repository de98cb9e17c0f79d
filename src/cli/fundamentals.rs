use super::{report_error, ui};
use crate::core::catalog::TickerCatalog;
use crate::core::{Fundamentals, FundamentalsProvider};
use comfy_table::{Cell, CellAlignment};
use tracing::info;

fn metric_cell(value: Option<f64>, suffix: &str) -> Cell {
    value.map_or_else(
        ui::na_cell,
        |v| Cell::new(format!("{v:.2}{suffix}")).set_alignment(CellAlignment::Right),
    )
}

/// Key ratios. Missing dividend yield reads as zero, other gaps as N/A.
pub fn fundamentals_table(fundamentals: &Fundamentals) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Indicator"), ui::header_cell("Value")]);

    table.add_row(vec![
        Cell::new("P/E ratio"),
        metric_cell(fundamentals.trailing_pe, ""),
    ]);
    table.add_row(vec![
        Cell::new("Dividend yield"),
        metric_cell(Some(fundamentals.dividend_yield_percent()), "%"),
    ]);
    table.add_row(vec![
        Cell::new("Return on equity"),
        metric_cell(fundamentals.return_on_equity_percent(), "%"),
    ]);
    table.add_row(vec![
        Cell::new("Profit margin"),
        metric_cell(fundamentals.profit_margins_percent(), "%"),
    ]);

    table.to_string()
}

pub async fn run(
    ticker: &str,
    catalog: &TickerCatalog,
    provider: &dyn FundamentalsProvider,
) -> anyhow::Result<()> {
    let ticker = ticker.trim().to_uppercase();
    info!("Fetching fundamentals for {ticker}");

    let pb = ui::new_spinner(&format!("Fetching fundamentals for {ticker}..."));
    let result = provider.fetch_fundamentals(&ticker).await;
    pb.finish_and_clear();

    match result {
        Ok(fundamentals) => {
            let name = fundamentals
                .short_name
                .clone()
                .unwrap_or_else(|| catalog.display_name(&ticker));
            println!(
                "{}\n",
                ui::style_text(&format!("{name} ({ticker})"), ui::StyleType::Title)
            );
            println!("{}", fundamentals_table(&fundamentals));
            println!(
                "\nSearch: {}",
                ui::style_text(&fundamentals.search_url(), ui::StyleType::Subtle)
            );
        }
        Err(e) => report_error(&e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fundamentals_table_full() {
        let f = Fundamentals {
            symbol: "AAPL".to_string(),
            short_name: Some("Apple Inc.".to_string()),
            trailing_pe: Some(28.456),
            dividend_yield: Some(0.0052),
            return_on_equity: Some(1.4725),
            profit_margins: Some(0.2531),
        };
        let text = fundamentals_table(&f);
        assert!(text.contains("28.46"));
        assert!(text.contains("0.52%"));
        assert!(text.contains("147.25%"));
        assert!(text.contains("25.31%"));
        assert!(!text.contains("N/A"));
    }

    #[test]
    fn test_fundamentals_table_missing_values() {
        let f = Fundamentals {
            symbol: "XYZ".to_string(),
            ..Default::default()
        };
        let text = fundamentals_table(&f);
        assert!(text.contains("0.00%"));
        assert_eq!(text.matches("N/A").count(), 3);
    }
}
