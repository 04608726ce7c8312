use crate::core::asset::{Asset, AssetId, AssetType, AssetUpdate, NewAsset};
use crate::core::price::{PriceMap, PriceProvider};
use crate::core::store::AssetStore;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

const UNAVAILABLE: &str = "HTTP error! status: 503";

/// In-memory asset collection that behaves like the remote store.
///
/// Every call counts as one request, including failed ones.
pub struct MemoryAssetStore {
    assets: Mutex<Vec<Asset>>,
    next_id: AtomicU64,
    requests: AtomicUsize,
    available: AtomicBool,
}

impl MemoryAssetStore {
    pub fn new(assets: Vec<Asset>) -> Self {
        let next_id = assets
            .iter()
            .filter_map(|a| a.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            assets: Mutex::new(assets),
            next_id: AtomicU64::new(next_id),
            requests: AtomicUsize::new(0),
            available: AtomicBool::new(true),
        }
    }

    /// While unavailable every call fails as a 503 would.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub async fn assets(&self) -> Vec<Asset> {
        self.assets.lock().await.clone()
    }

    fn begin_request(&self) -> Result<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(anyhow!(UNAVAILABLE))
        }
    }
}

impl Default for MemoryAssetStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn list_assets(&self) -> Result<Vec<Asset>> {
        self.begin_request()?;
        Ok(self.assets.lock().await.clone())
    }

    async fn create_asset(&self, asset: &NewAsset) -> Result<Asset> {
        self.begin_request()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Asset {
            id: AssetId::from(id),
            symbol: asset.symbol.to_uppercase(),
            asset_type: asset.asset_type.as_str().to_string(),
            purchase_price: asset.purchase_price,
            quantity: asset.quantity,
            purchase_date: asset.purchase_date,
        };
        debug!("Added asset: {}", created.symbol);
        self.assets.lock().await.push(created.clone());
        Ok(created)
    }

    async fn update_asset(&self, id: &AssetId, update: &AssetUpdate) -> Result<Asset> {
        self.begin_request()?;
        let mut assets = self.assets.lock().await;
        let asset = assets
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| anyhow!("Asset not found"))?;
        if let Some(symbol) = &update.symbol {
            asset.symbol = symbol.to_uppercase();
        }
        if let Some(asset_type) = &update.asset_type {
            asset.asset_type = asset_type.clone();
        }
        asset.purchase_price = update.purchase_price;
        asset.quantity = update.quantity;
        asset.purchase_date = update.purchase_date;
        Ok(asset.clone())
    }

    async fn delete_asset(&self, id: &AssetId) -> Result<()> {
        self.begin_request()?;
        let mut assets = self.assets.lock().await;
        let before = assets.len();
        assets.retain(|a| &a.id != id);
        if assets.len() == before {
            return Err(anyhow!("Asset not found"));
        }
        Ok(())
    }

    async fn delete_assets(&self, ids: &[AssetId]) -> Result<()> {
        self.begin_request()?;
        let mut assets = self.assets.lock().await;
        let before = assets.len();
        assets.retain(|a| !ids.contains(&a.id));
        debug!("{} assets deleted successfully", before - assets.len());
        Ok(())
    }
}

/// Price provider serving a fixed price map.
pub struct MemoryPriceProvider {
    prices: Mutex<PriceMap>,
    requests: AtomicUsize,
    available: AtomicBool,
}

impl MemoryPriceProvider {
    pub fn new(prices: PriceMap) -> Self {
        Self {
            prices: Mutex::new(prices),
            requests: AtomicUsize::new(0),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn begin_request(&self) -> Result<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(anyhow!(UNAVAILABLE))
        }
    }
}

impl Default for MemoryPriceProvider {
    fn default() -> Self {
        Self::new(PriceMap::new())
    }
}

#[async_trait]
impl PriceProvider for MemoryPriceProvider {
    async fn fetch_prices(&self, assets: &[Asset]) -> Result<PriceMap> {
        self.begin_request()?;
        let prices = self.prices.lock().await;
        Ok(assets
            .iter()
            .filter_map(|a| prices.get(&a.symbol).map(|p| (a.symbol.clone(), *p)))
            .collect())
    }

    async fn fetch_price(&self, symbol: &str, _asset_type: AssetType) -> Result<Decimal> {
        self.begin_request()?;
        self.prices
            .lock()
            .await
            .get(symbol)
            .copied()
            .ok_or_else(|| anyhow!("Unable to fetch price for {symbol}"))
    }

    async fn clear_cache(&self) -> Result<()> {
        self.begin_request()
    }
}
