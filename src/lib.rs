pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::asset::{AssetDraft, AssetId, AssetType, AssetUpdateDraft};
use crate::core::config::AppConfig;
use crate::core::controller::PortfolioController;
use crate::providers::http::HttpBackend;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Summary,
    List { asset_type: Option<AssetType> },
    Add(AssetDraft),
    Update { id: AssetId, changes: AssetUpdateDraft },
    Delete { ids: Vec<AssetId> },
    Price { symbol: String, asset_type: AssetType },
    Symbols { asset_type: Option<AssetType> },
    Prices { force: bool },
    Watch { interval_secs: Option<u64> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("folio starting...");

    let config = AppConfig::resolve(config_path)?;
    debug!("Loaded config: {config:#?}");

    let backend = Arc::new(HttpBackend::new(&config.api.base_url)?);
    let controller = Arc::new(PortfolioController::new(backend.clone(), backend.clone()));
    let currency = config.currency_symbol.as_str();

    match command {
        AppCommand::Summary => cli::summary::run(&controller, currency).await,
        AppCommand::List { asset_type } => cli::list::run(&controller, asset_type, currency).await,
        AppCommand::Add(draft) => cli::manage::add(&controller, &draft).await,
        AppCommand::Update { id, changes } => cli::manage::update(&controller, &id, &changes).await,
        AppCommand::Delete { ids } => cli::manage::delete(&controller, &ids).await,
        AppCommand::Price { symbol, asset_type } => {
            cli::prices::price(&*backend, &symbol, asset_type, currency).await
        }
        AppCommand::Symbols { asset_type } => {
            cli::prices::symbols(&*backend, asset_type).await
        }
        AppCommand::Prices { force } => {
            cli::prices::refresh(&controller, &*backend, force, currency).await
        }
        AppCommand::Watch { interval_secs } => {
            let period = interval_secs
                .map(|secs| Duration::from_secs(secs.max(1)))
                .unwrap_or_else(|| config.refresh_interval());
            cli::watch::run(Arc::clone(&controller), period, currency).await
        }
    }
}
