use super::ui;
use crate::core::asset::AssetType;
use crate::core::controller::PortfolioController;
use crate::core::state::PortfolioState;
use crate::core::valuation::{Valuation, ValueTotals};
use anyhow::Result;
use comfy_table::Cell;
use rust_decimal::Decimal;

/// Renders class totals, allocation and price status for a state snapshot.
pub fn render(state: &PortfolioState, currency_symbol: &str) -> String {
    let valuation = state.valuation();
    let mut output = format!(
        "{}\n\n",
        ui::style_text("Portfolio Summary", ui::StyleType::Title)
    );
    output.push_str(&totals_table(&valuation, currency_symbol));

    let allocation = valuation.allocation();
    if !allocation.is_empty() {
        output.push_str(&format!(
            "\n\n{}\n",
            ui::style_text("Asset Distribution", ui::StyleType::TotalLabel)
        ));
        output.push_str(&allocation_table(&allocation, &valuation, currency_symbol));
    }

    if let Some(error) = &state.error {
        output.push_str(&format!("\n\n{}", ui::style_text(error, ui::StyleType::Error)));
    }
    if let Some(error) = &state.price_error {
        output.push_str(&format!("\n\n{}", ui::style_text(error, ui::StyleType::Error)));
    }
    if let Some(updated) = state.last_price_update {
        let line = format!("Last price update: {}", updated.format("%H:%M:%S"));
        output.push_str(&format!("\n\n{}", ui::style_text(&line, ui::StyleType::Subtle)));
    }

    output
}

fn totals_table(valuation: &Valuation, currency_symbol: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Asset Class"),
        ui::header_cell("Purchase Value"),
        ui::header_cell("Current Value"),
        ui::header_cell("Gain/Loss"),
        ui::header_cell("Change"),
    ]);

    let rows = AssetType::ALL
        .into_iter()
        .map(|t| (t.label(), *valuation.class(t)))
        .chain(std::iter::once(("Total", valuation.total)));
    for (label, totals) in rows {
        table.add_row(totals_row(label, &totals, currency_symbol));
    }
    table.to_string()
}

fn totals_row(label: &str, totals: &ValueTotals, currency_symbol: &str) -> Vec<Cell> {
    let trend = totals.trend();
    // Nothing invested means there is no meaningful change to show.
    let change = (totals.purchase > Decimal::ZERO).then(|| totals.percent_change());
    vec![
        Cell::new(label),
        ui::amount_cell(ui::format_indian_amount(totals.purchase, currency_symbol)),
        ui::trend_amount_cell(
            ui::format_indian_amount(totals.current, currency_symbol),
            trend,
        ),
        ui::trend_amount_cell(
            ui::format_indian_amount(totals.gain(), currency_symbol),
            trend,
        ),
        change.map_or_else(
            || ui::format_optional_cell(None::<Decimal>, |c| c.to_string()),
            |c| ui::change_cell(c, trend),
        ),
    ]
}

fn allocation_table(
    allocation: &[(AssetType, Decimal)],
    valuation: &Valuation,
    currency_symbol: &str,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Asset Class"),
        ui::header_cell("Current Value"),
        ui::header_cell("Share (%)"),
    ]);
    for (asset_type, share) in allocation {
        table.add_row(vec![
            Cell::new(asset_type.label()),
            ui::amount_cell(ui::format_indian_amount(
                valuation.class(*asset_type).current,
                currency_symbol,
            )),
            ui::amount_cell(format!("{:.1}%", share.round_dp(1))),
        ]);
    }
    table.to_string()
}

pub async fn run(controller: &PortfolioController, currency_symbol: &str) -> Result<()> {
    let pb = ui::new_spinner("Loading portfolio...");
    let loaded = controller.load_assets().await;
    pb.finish_and_clear();

    let state = controller.snapshot().await;
    println!("{}", render(&state, currency_symbol));
    loaded?;
    Ok(())
}
