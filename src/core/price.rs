//! Live price abstractions

use super::asset::{Asset, AssetType};
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Symbol to live price. A missing entry means the symbol is unpriced.
pub type PriceMap = HashMap<String, Decimal>;

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Prices every asset in one batch. The result replaces any previous map.
    async fn fetch_prices(&self, assets: &[Asset]) -> Result<PriceMap>;

    async fn fetch_price(&self, symbol: &str, asset_type: AssetType) -> Result<Decimal>;

    /// Drops whatever prices the provider has cached upstream.
    async fn clear_cache(&self) -> Result<()>;
}
