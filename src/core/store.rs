//! Remote asset collection

use super::asset::{Asset, AssetId, AssetUpdate, NewAsset};
use anyhow::Result;
use async_trait::async_trait;

/// CRUD access to the asset collection.
///
/// Errors are expected to display as a single human-readable message.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn list_assets(&self) -> Result<Vec<Asset>>;
    async fn create_asset(&self, asset: &NewAsset) -> Result<Asset>;
    async fn update_asset(&self, id: &AssetId, update: &AssetUpdate) -> Result<Asset>;
    async fn delete_asset(&self, id: &AssetId) -> Result<()>;
    async fn delete_assets(&self, ids: &[AssetId]) -> Result<()>;
}
