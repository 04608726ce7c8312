//! Core business logic: asset model, valuation and application state

pub mod asset;
pub mod config;
pub mod controller;
pub mod error;
pub mod log;
pub mod price;
pub mod state;
pub mod store;
pub mod symbol;
pub mod valuation;

// Re-export main types for cleaner imports
pub use asset::{Asset, AssetDraft, AssetId, AssetType, AssetUpdateDraft};
pub use controller::PortfolioController;
pub use error::FolioError;
pub use price::{PriceMap, PriceProvider};
pub use store::AssetStore;
pub use symbol::{SymbolInfo, SymbolProvider};
pub use valuation::{Trend, Valuation, ValueTotals};
