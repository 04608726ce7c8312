use super::ui;
use crate::core::asset::AssetType;
use crate::core::controller::PortfolioController;
use crate::core::valuation::HoldingValue;
use anyhow::Result;
use comfy_table::Cell;

/// One table per asset class, optionally restricted to a single class.
pub fn render(
    holdings: &[HoldingValue],
    filter: Option<AssetType>,
    currency_symbol: &str,
) -> String {
    let classes: Vec<AssetType> = match filter {
        Some(asset_type) => vec![asset_type],
        None => AssetType::ALL.to_vec(),
    };

    let mut sections = Vec::new();
    for asset_type in classes {
        let rows: Vec<&HoldingValue> = holdings
            .iter()
            .filter(|h| h.asset_type == Some(asset_type))
            .collect();
        if rows.is_empty() {
            continue;
        }
        sections.push(format!(
            "{}\n{}",
            ui::style_text(asset_type.label(), ui::StyleType::TotalLabel),
            holdings_table(&rows, currency_symbol)
        ));
    }

    if sections.is_empty() {
        return ui::style_text("No assets found.", ui::StyleType::Subtle);
    }
    sections.join("\n\n")
}

fn holdings_table(rows: &[&HoldingValue], currency_symbol: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Symbol"),
        ui::header_cell("Quantity"),
        ui::header_cell("Purchase Price"),
        ui::header_cell("Live Price"),
        ui::header_cell("Current Value"),
        ui::header_cell("P/L"),
        ui::header_cell("Change"),
    ]);

    for holding in rows {
        let trend = holding.totals.trend();
        table.add_row(vec![
            Cell::new(holding.id.as_str()),
            Cell::new(&holding.symbol),
            ui::amount_cell(holding.quantity.normalize().to_string()),
            ui::amount_cell(ui::format_amount(holding.purchase_price, currency_symbol)),
            ui::format_optional_cell(holding.live_price, |p| {
                ui::format_amount(p, currency_symbol)
            }),
            ui::amount_cell(ui::format_indian_amount(
                holding.totals.current,
                currency_symbol,
            )),
            ui::trend_amount_cell(
                ui::format_indian_amount(holding.profit_loss(), currency_symbol),
                trend,
            ),
            match holding.percent_change() {
                Some(change) => ui::change_cell(change, trend),
                None => ui::format_optional_cell(None::<String>, |s| s),
            },
        ]);
    }
    table.to_string()
}

pub async fn run(
    controller: &PortfolioController,
    filter: Option<AssetType>,
    currency_symbol: &str,
) -> Result<()> {
    let pb = ui::new_spinner("Loading assets...");
    let loaded = controller.load_assets().await;
    pb.finish_and_clear();
    loaded?;

    let state = controller.snapshot().await;
    println!("{}", render(&state.holdings(), filter, currency_symbol));
    if let Some(error) = &state.price_error {
        println!("\n{}", ui::style_text(error, ui::StyleType::Error));
    }
    Ok(())
}
