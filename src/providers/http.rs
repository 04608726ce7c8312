use super::util::ensure_success;
use crate::core::asset::{Asset, AssetId, AssetType, AssetUpdate, NewAsset};
use crate::core::price::{PriceMap, PriceProvider};
use crate::core::store::AssetStore;
use crate::core::symbol::{SymbolInfo, SymbolProvider};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Client for the portfolio backend: asset collection, live prices and
/// symbol catalogues all live under one base URL.
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

#[derive(Serialize)]
struct PricesRequest<'a> {
    assets: &'a [Asset],
}

#[derive(Serialize)]
struct BulkDeleteRequest<'a> {
    ids: &'a [AssetId],
}

#[derive(Deserialize)]
struct PriceResponse {
    price: Option<Decimal>,
}

#[derive(Deserialize, Default)]
struct Ack {
    message: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().user_agent("folio/0.1").build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {e}"))?;
        ensure_success(response).await
    }

    async fn ack(response: Response) {
        // Acknowledgement bodies are informational only.
        let ack: Ack = response.json().await.unwrap_or_default();
        if let Some(message) = ack.message {
            debug!("{message}");
        }
    }
}

#[async_trait]
impl AssetStore for HttpBackend {
    #[instrument(name = "ListAssets", skip(self))]
    async fn list_assets(&self) -> Result<Vec<Asset>> {
        let url = self.url("/assets");
        debug!("Requesting assets from {}", url);
        let response = Self::send(self.client.get(&url)).await?;
        Ok(response.json::<Vec<Asset>>().await?)
    }

    #[instrument(name = "CreateAsset", skip(self, asset), fields(symbol = %asset.symbol))]
    async fn create_asset(&self, asset: &NewAsset) -> Result<Asset> {
        let response = Self::send(self.client.post(self.url("/assets")).json(asset)).await?;
        Ok(response.json::<Asset>().await?)
    }

    #[instrument(name = "UpdateAsset", skip(self, update), fields(id = %id))]
    async fn update_asset(&self, id: &AssetId, update: &AssetUpdate) -> Result<Asset> {
        let url = self.url(&format!("/assets/{id}"));
        let response = Self::send(self.client.put(&url).json(update)).await?;
        Ok(response.json::<Asset>().await?)
    }

    #[instrument(name = "DeleteAsset", skip(self), fields(id = %id))]
    async fn delete_asset(&self, id: &AssetId) -> Result<()> {
        let url = self.url(&format!("/assets/{id}"));
        let response = Self::send(self.client.delete(&url)).await?;
        Self::ack(response).await;
        Ok(())
    }

    #[instrument(name = "DeleteAssets", skip(self, ids), fields(count = ids.len()))]
    async fn delete_assets(&self, ids: &[AssetId]) -> Result<()> {
        let request = self
            .client
            .delete(self.url("/assets"))
            .json(&BulkDeleteRequest { ids });
        let response = Self::send(request).await?;
        Self::ack(response).await;
        Ok(())
    }
}

#[async_trait]
impl PriceProvider for HttpBackend {
    #[instrument(name = "FetchPrices", skip(self, assets), fields(count = assets.len()))]
    async fn fetch_prices(&self, assets: &[Asset]) -> Result<PriceMap> {
        let request = self
            .client
            .post(self.url("/api/prices"))
            .json(&PricesRequest { assets });
        let response = Self::send(request).await?;

        // Unpriced symbols may come back as null; they are simply absent.
        let raw: HashMap<String, Option<Decimal>> = response.json().await?;
        Ok(raw
            .into_iter()
            .filter_map(|(symbol, price)| price.map(|p| (symbol, p)))
            .collect())
    }

    #[instrument(name = "FetchPrice", skip(self))]
    async fn fetch_price(&self, symbol: &str, asset_type: AssetType) -> Result<Decimal> {
        let url = Url::parse_with_params(
            &self.url(&format!("/api/prices/{symbol}")),
            &[("type", asset_type.as_str())],
        )?;
        debug!("Requesting price from {}", url);
        let response = Self::send(self.client.get(url)).await?;
        response
            .json::<PriceResponse>()
            .await?
            .price
            .ok_or_else(|| anyhow!("Unable to fetch price for {symbol}"))
    }

    async fn clear_cache(&self) -> Result<()> {
        let response = Self::send(self.client.post(self.url("/api/prices/refresh"))).await?;
        Self::ack(response).await;
        Ok(())
    }
}

#[async_trait]
impl SymbolProvider for HttpBackend {
    #[instrument(name = "ListSymbols", skip(self))]
    async fn list_symbols(&self, asset_type: AssetType) -> Result<Vec<SymbolInfo>> {
        let url = self.url(&format!("/api/symbols/{}", asset_type.catalogue()));
        let response = Self::send(self.client.get(&url)).await?;
        Ok(response.json::<Vec<SymbolInfo>>().await?)
    }
}
