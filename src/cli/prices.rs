use super::ui;
use crate::core::asset::AssetType;
use crate::core::controller::PortfolioController;
use crate::core::price::PriceProvider;
use crate::core::symbol::{SymbolInfo, SymbolProvider};
use anyhow::Result;
use comfy_table::Cell;
use futures::future::join_all;
use tracing::warn;

pub async fn price(
    provider: &dyn PriceProvider,
    symbol: &str,
    asset_type: AssetType,
    currency_symbol: &str,
) -> Result<()> {
    let symbol = symbol.trim().to_uppercase();
    let pb = ui::new_spinner(&format!("Fetching price for {symbol}..."));
    let fetched = provider.fetch_price(&symbol, asset_type).await;
    pb.finish_and_clear();

    let price = fetched?;
    println!(
        "{} ({}): {}",
        symbol,
        asset_type,
        ui::style_text(
            &ui::format_amount(price, currency_symbol),
            ui::StyleType::TotalValue
        )
    );
    Ok(())
}

pub fn render_symbols(catalogues: &[(AssetType, Vec<SymbolInfo>)]) -> String {
    let mut sections = Vec::new();
    for (asset_type, symbols) in catalogues {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Symbol"), ui::header_cell("Name")]);
        for info in symbols {
            table.add_row(vec![Cell::new(info.symbol.to_uppercase()), Cell::new(&info.name)]);
        }
        sections.push(format!(
            "{} ({})\n{}",
            ui::style_text(asset_type.label(), ui::StyleType::TotalLabel),
            symbols.len(),
            table
        ));
    }
    sections.join("\n\n")
}

/// Fetches the catalogues concurrently. A class whose catalogue fails is
/// reported and left out.
pub async fn symbols(provider: &dyn SymbolProvider, filter: Option<AssetType>) -> Result<()> {
    let classes: Vec<AssetType> = match filter {
        Some(asset_type) => vec![asset_type],
        None => AssetType::ALL.to_vec(),
    };

    let pb = ui::new_spinner("Fetching symbol catalogues...");
    let results = join_all(classes.iter().map(|t| provider.list_symbols(*t))).await;
    pb.finish_and_clear();

    let mut catalogues = Vec::new();
    let mut failures = Vec::new();
    for (asset_type, result) in classes.into_iter().zip(results) {
        match result {
            Ok(symbols) => catalogues.push((asset_type, symbols)),
            Err(e) => {
                warn!(error = %e, "Failed to fetch {} symbols", asset_type);
                failures.push(format!("{}: {e}", asset_type.label()));
            }
        }
    }

    if catalogues.is_empty() {
        anyhow::bail!("Failed to fetch symbols. {}", failures.join("; "));
    }
    println!("{}", render_symbols(&catalogues));
    for failure in failures {
        println!("\n{}", ui::style_text(&failure, ui::StyleType::Error));
    }
    Ok(())
}

/// Re-prices the portfolio, clearing the backend's price cache first when `force` is set.
pub async fn refresh(
    controller: &PortfolioController,
    provider: &dyn PriceProvider,
    force: bool,
    currency_symbol: &str,
) -> Result<()> {
    if force {
        provider.clear_cache().await?;
        println!("{}", ui::style_text("Price cache cleared", ui::StyleType::Subtle));
    }

    let pb = ui::new_spinner("Refreshing prices...");
    let loaded = controller.load_assets().await;
    pb.finish_and_clear();
    loaded?;

    let state = controller.snapshot().await;
    println!("{}", super::summary::render(&state, currency_symbol));
    match &state.price_error {
        Some(error) => Err(anyhow::anyhow!(error.clone())),
        None => Ok(()),
    }
}
