use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::{Decimal, RoundingStrategy};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Rounds half away from zero to `dp` places for display.
pub fn format_decimal(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.prec$}", prec = dp as usize)
}

/// Right-aligned amount with two decimal places.
pub fn amount_cell(value: Decimal) -> Cell {
    Cell::new(format_decimal(value, 2)).set_alignment(CellAlignment::Right)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or_else(na_cell, |v| {
        Cell::new(format_fn(v)).set_alignment(CellAlignment::Right)
    })
}

/// Creates a cell colored by sign: green for gains, red for losses.
pub fn change_cell(change: Decimal, suffix: &str) -> Cell {
    let text = format!("{}{suffix}", format_decimal(change, 2));
    let color = if change.is_sign_negative() && !change.is_zero() {
        Color::Red
    } else {
        Color::Green
    };
    Cell::new(text).fg(color).set_alignment(CellAlignment::Right)
}

/// Right-aligned, dimmed "N/A" for missing values.
pub fn na_cell() -> Cell {
    Cell::new("N/A")
        .fg(Color::DarkGrey)
        .set_alignment(CellAlignment::Right)
}

/// Creates a spinner shown while waiting on a provider.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_decimal_rounds_half_away_from_zero() {
        assert_eq!(format_decimal(Decimal::from_str("14.4714").unwrap(), 2), "14.47");
        assert_eq!(format_decimal(Decimal::from_str("2.345").unwrap(), 2), "2.35");
        assert_eq!(format_decimal(Decimal::from_str("-2.345").unwrap(), 2), "-2.35");
        assert_eq!(format_decimal(Decimal::from(10), 2), "10.00");
        assert_eq!(format_decimal(Decimal::from_str("1.23456").unwrap(), 4), "1.2346");
    }

    #[test]
    fn test_change_cell_text() {
        let cell = change_cell(Decimal::from_str("-12.5").unwrap(), "%");
        assert_eq!(cell.content(), "-12.50%");
        let cell = change_cell(Decimal::ZERO, "");
        assert_eq!(cell.content(), "0.00");
    }

    #[test]
    fn test_missing_values_render_as_na() {
        assert_eq!(na_cell().content(), "N/A");
        let missing: Option<Decimal> = None;
        assert_eq!(format_optional_cell(missing, |v| format_decimal(v, 2)).content(), "N/A");
        let present = format_optional_cell(Some(Decimal::new(15, 1)), |v| format_decimal(v, 2));
        assert_eq!(present.content(), "1.50");
    }
}
