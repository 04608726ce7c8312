use super::asset::AssetType;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}

impl SymbolInfo {
    /// Suggestion label, e.g. `BTC - Bitcoin`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.symbol.to_uppercase(), self.name)
    }
}

#[async_trait]
pub trait SymbolProvider: Send + Sync {
    async fn list_symbols(&self, asset_type: AssetType) -> Result<Vec<SymbolInfo>>;
}
