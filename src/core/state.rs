//! Application state and the transitions that change it.

use super::asset::{Asset, AssetId};
use super::price::PriceMap;
use super::valuation::{HoldingValue, Valuation, calculate_holdings, calculate_valuation};
use chrono::{DateTime, Local};
use tracing::debug;

/// Outcome of a started or completed operation.
#[derive(Debug, Clone)]
pub enum StateEvent {
    AssetsRequested,
    AssetsLoaded(Vec<Asset>),
    AssetsFailed(String),
    PricesRequested,
    PricesLoaded {
        prices: PriceMap,
        updated_at: DateTime<Local>,
    },
    PricesFailed(String),
    AssetUpdated(Asset),
    AssetDeleted(AssetId),
    WriteFailed(String),
}

#[derive(Debug, Clone, Default)]
pub struct PortfolioState {
    pub assets: Vec<Asset>,
    pub prices: PriceMap,
    pub error: Option<String>,
    pub price_error: Option<String>,
    pub last_price_update: Option<DateTime<Local>>,
    pending_loads: usize,
    pending_price_refreshes: usize,
}

impl PortfolioState {
    /// Applies one transition. Collections are always swapped whole.
    pub fn apply(&mut self, event: StateEvent) {
        debug!(?event, "Applying state event");
        match event {
            StateEvent::AssetsRequested => self.pending_loads += 1,
            StateEvent::AssetsLoaded(assets) => {
                self.pending_loads = self.pending_loads.saturating_sub(1);
                self.assets = assets;
                self.error = None;
            }
            StateEvent::AssetsFailed(message) => {
                self.pending_loads = self.pending_loads.saturating_sub(1);
                self.assets = Vec::new();
                self.error = Some(message);
            }
            StateEvent::PricesRequested => {
                self.pending_price_refreshes += 1;
                self.price_error = None;
            }
            StateEvent::PricesLoaded { prices, updated_at } => {
                self.pending_price_refreshes = self.pending_price_refreshes.saturating_sub(1);
                self.prices = prices;
                self.last_price_update = Some(updated_at);
            }
            StateEvent::PricesFailed(message) => {
                self.pending_price_refreshes = self.pending_price_refreshes.saturating_sub(1);
                self.price_error = Some(message);
            }
            StateEvent::AssetUpdated(updated) => {
                self.assets = self
                    .assets
                    .iter()
                    .map(|asset| {
                        if asset.id == updated.id {
                            updated.clone()
                        } else {
                            asset.clone()
                        }
                    })
                    .collect();
                self.error = None;
            }
            StateEvent::AssetDeleted(id) => {
                self.assets = self
                    .assets
                    .iter()
                    .filter(|asset| asset.id != id)
                    .cloned()
                    .collect();
                self.error = None;
            }
            StateEvent::WriteFailed(message) => self.error = Some(message),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending_loads > 0
    }

    pub fn is_loading_prices(&self) -> bool {
        self.pending_price_refreshes > 0
    }

    pub fn find_asset(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.iter().find(|asset| &asset.id == id)
    }

    pub fn valuation(&self) -> Valuation {
        calculate_valuation(&self.assets, &self.prices)
    }

    pub fn holdings(&self) -> Vec<HoldingValue> {
        calculate_holdings(&self.assets, &self.prices)
    }
}
