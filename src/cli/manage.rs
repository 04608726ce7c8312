use super::ui;
use crate::core::asset::{AssetDraft, AssetId, AssetUpdateDraft};
use crate::core::controller::PortfolioController;
use anyhow::Result;
use tracing::info;

pub async fn add(controller: &PortfolioController, draft: &AssetDraft) -> Result<()> {
    let created = controller.create_asset(draft).await?;
    info!("Added asset {} ({})", created.symbol, created.id);
    println!(
        "{} {} with id {}",
        ui::style_text("Added", ui::StyleType::TotalValue),
        created.symbol,
        created.id
    );
    Ok(())
}

/// The collection is loaded first so the request carries the asset's symbol and type.
pub async fn update(
    controller: &PortfolioController,
    id: &AssetId,
    draft: &AssetUpdateDraft,
) -> Result<()> {
    controller.reload_assets().await?;
    let updated = controller.update_asset(id, draft).await?;
    println!(
        "{} {} ({})",
        ui::style_text("Updated", ui::StyleType::TotalValue),
        updated.symbol,
        updated.id
    );
    Ok(())
}

pub async fn delete(controller: &PortfolioController, ids: &[AssetId]) -> Result<()> {
    match ids {
        [] => {
            println!("{}", ui::style_text("No assets selected.", ui::StyleType::Subtle));
            return Ok(());
        }
        [id] => controller.delete_asset(id).await?,
        _ => controller.delete_assets(ids).await?,
    }

    let deleted = ids
        .iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "{} {}",
        ui::style_text("Deleted", ui::StyleType::TotalValue),
        deleted
    );
    Ok(())
}
