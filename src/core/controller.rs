//! Drives portfolio operations and folds their outcomes into [`PortfolioState`].
//!
//! The state lock is only taken to apply a transition or to copy a
//! snapshot, never across a request, so refreshes and writes may overlap
//! freely. Whichever request resolves last wins for its part of the state.

use super::asset::{Asset, AssetDraft, AssetId, AssetUpdateDraft};
use super::error::{FolioError, LOAD_ASSETS_FAILED, LOAD_PRICES_FAILED};
use super::price::PriceProvider;
use super::state::{PortfolioState, StateEvent};
use super::store::AssetStore;
use super::valuation::{HoldingValue, Valuation};
use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub struct PortfolioController {
    store: Arc<dyn AssetStore>,
    prices: Arc<dyn PriceProvider>,
    state: Mutex<PortfolioState>,
}

impl PortfolioController {
    pub fn new(store: Arc<dyn AssetStore>, prices: Arc<dyn PriceProvider>) -> Self {
        Self {
            store,
            prices,
            state: Mutex::new(PortfolioState::default()),
        }
    }

    async fn dispatch(&self, event: StateEvent) {
        self.state.lock().await.apply(event);
    }

    pub async fn snapshot(&self) -> PortfolioState {
        self.state.lock().await.clone()
    }

    pub async fn valuation(&self) -> Valuation {
        self.state.lock().await.valuation()
    }

    pub async fn holdings(&self) -> Vec<HoldingValue> {
        self.state.lock().await.holdings()
    }

    /// Fetches the full collection, then prices exactly those assets.
    ///
    /// A failed price refresh is recorded in the state but does not fail the load.
    pub async fn load_assets(&self) -> Result<Vec<Asset>, FolioError> {
        let assets = self.reload_assets().await?;
        if let Err(e) = self.refresh_prices_for(&assets).await {
            debug!(error = %e, "Continuing without fresh prices");
        }
        Ok(assets)
    }

    /// Fetches the full collection without touching prices.
    pub async fn reload_assets(&self) -> Result<Vec<Asset>, FolioError> {
        self.dispatch(StateEvent::AssetsRequested).await;
        let assets = match self.store.list_assets().await {
            Ok(assets) => assets,
            Err(e) => {
                warn!(error = %e, "Failed to fetch assets");
                self.dispatch(StateEvent::AssetsFailed(LOAD_ASSETS_FAILED.to_string()))
                    .await;
                return Err(FolioError::Load(LOAD_ASSETS_FAILED.to_string()));
            }
        };
        debug!("Loaded {} assets", assets.len());
        self.dispatch(StateEvent::AssetsLoaded(assets.clone())).await;
        Ok(assets)
    }

    /// Re-prices the assets currently held in state.
    pub async fn refresh_prices(&self) -> Result<(), FolioError> {
        let assets = self.state.lock().await.assets.clone();
        self.refresh_prices_for(&assets).await
    }

    async fn refresh_prices_for(&self, assets: &[Asset]) -> Result<(), FolioError> {
        if assets.is_empty() {
            debug!("No assets to price, skipping refresh");
            return Ok(());
        }

        self.dispatch(StateEvent::PricesRequested).await;
        match self.prices.fetch_prices(assets).await {
            Ok(prices) => {
                debug!("Received {} live prices", prices.len());
                self.dispatch(StateEvent::PricesLoaded {
                    prices,
                    updated_at: Local::now(),
                })
                .await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch live prices");
                self.dispatch(StateEvent::PricesFailed(LOAD_PRICES_FAILED.to_string()))
                    .await;
                Err(FolioError::Load(LOAD_PRICES_FAILED.to_string()))
            }
        }
    }

    /// Validates and submits a new asset, then reloads the collection.
    pub async fn create_asset(&self, draft: &AssetDraft) -> Result<Asset, FolioError> {
        let new_asset = draft.validate()?;
        match self.store.create_asset(&new_asset).await {
            Ok(created) => {
                debug!("Created asset {} with id {}", created.symbol, created.id);
                if let Err(e) = self.load_assets().await {
                    debug!(error = %e, "Reload after create failed");
                }
                Ok(created)
            }
            Err(e) => Err(self.write_failed(format!("Failed to add asset: {e}")).await),
        }
    }

    /// Replaces the local entry with the server's copy on success.
    ///
    /// Symbol and type are carried over from the local entry, if there is one.
    pub async fn update_asset(
        &self,
        id: &AssetId,
        draft: &AssetUpdateDraft,
    ) -> Result<Asset, FolioError> {
        let mut update = draft.validate()?;
        if let Some(existing) = self.state.lock().await.find_asset(id) {
            update.symbol = Some(existing.symbol.clone());
            update.asset_type = Some(existing.asset_type.clone());
        }

        match self.store.update_asset(id, &update).await {
            Ok(updated) => {
                self.dispatch(StateEvent::AssetUpdated(updated.clone())).await;
                Ok(updated)
            }
            Err(e) => Err(self.write_failed(format!("Failed to update asset: {e}")).await),
        }
    }

    pub async fn delete_asset(&self, id: &AssetId) -> Result<(), FolioError> {
        match self.store.delete_asset(id).await {
            Ok(()) => {
                self.dispatch(StateEvent::AssetDeleted(id.clone())).await;
                Ok(())
            }
            Err(e) => Err(self.write_failed(format!("Failed to delete asset: {e}")).await),
        }
    }

    /// Bulk delete. The collection is re-fetched afterwards instead of filtered
    /// locally, since the server may have removed only some of the ids.
    pub async fn delete_assets(&self, ids: &[AssetId]) -> Result<(), FolioError> {
        if ids.is_empty() {
            debug!("No assets selected for deletion");
            return Ok(());
        }

        match self.store.delete_assets(ids).await {
            Ok(()) => {
                if let Err(e) = self.load_assets().await {
                    debug!(error = %e, "Reload after bulk delete failed");
                }
                Ok(())
            }
            Err(e) => Err(self
                .write_failed(format!(
                    "Failed to delete selected assets: {e}. Please try again."
                ))
                .await),
        }
    }

    async fn write_failed(&self, message: String) -> FolioError {
        warn!("{message}");
        self.dispatch(StateEvent::WriteFailed(message.clone())).await;
        FolioError::Write(message)
    }

    /// Re-prices on a fixed period until the returned handle is aborted.
    ///
    /// Each tick runs as its own task and does not wait for earlier ones.
    pub fn spawn_price_polling(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                let controller = Arc::clone(&controller);
                tokio::spawn(async move {
                    if let Err(e) = controller.refresh_prices().await {
                        debug!(error = %e, "Scheduled price refresh failed");
                    }
                });
            }
        })
    }
}
