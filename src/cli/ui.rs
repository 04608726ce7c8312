use crate::core::valuation::Trend;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
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

/// Right-aligned cell for amounts.
pub fn amount_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Colour for a value moving in the given direction.
fn trend_color(trend: Trend) -> Option<Color> {
    match trend {
        Trend::Gain => Some(Color::Green),
        Trend::Loss => Some(Color::Red),
        Trend::Neutral => None,
    }
}

/// Percentage with a `+` only on gains, e.g. `+8.00%`, `-2.50%`, `0.00%`.
/// A gain that rounds to zero is shown unsigned.
pub fn format_change(change: Decimal, trend: Trend) -> String {
    let rounded = change.round_dp(2);
    let sign = if trend == Trend::Gain && rounded > Decimal::ZERO { "+" } else { "" };
    format!("{sign}{rounded:.2}%")
}

/// Creates a cell for displaying percentage change with color coding.
pub fn change_cell(change: Decimal, trend: Trend) -> Cell {
    let cell = Cell::new(format_change(change, trend)).set_alignment(CellAlignment::Right);
    match trend_color(trend) {
        Some(color) => cell.fg(color),
        None => cell,
    }
}

/// Creates a cell for an amount coloured by its trend.
pub fn trend_amount_cell(text: String, trend: Trend) -> Cell {
    let cell = amount_cell(text);
    match trend_color(trend) {
        Some(color) => cell.fg(color),
        None => cell,
    }
}

/// Short Indian notation: crore (`Cr`), lakh (`L`) and thousand (`K`).
pub fn format_indian_amount(amount: Decimal, currency_symbol: &str) -> String {
    let crore = Decimal::from(10_000_000);
    let lakh = Decimal::from(100_000);
    let thousand = Decimal::from(1_000);
    let abs = amount.abs();

    let body = if abs >= crore {
        format!("{:.2} Cr", (amount / crore).round_dp(2))
    } else if abs >= lakh {
        format!("{:.2} L", (amount / lakh).round_dp(2))
    } else if abs >= thousand {
        format!("{:.2} K", (amount / thousand).round_dp(2))
    } else {
        format!("{:.2}", amount.round_dp(2))
    };
    format!("{currency_symbol}{body}")
}

/// Full amount with two decimals, for per-unit prices.
pub fn format_amount(amount: Decimal, currency_symbol: &str) -> String {
    format!("{currency_symbol}{:.2}", amount.round_dp(2))
}

/// Creates a spinner for requests of unknown length.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
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
