use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use folio::core::asset::{AssetDraft, AssetId, AssetType, AssetUpdateDraft};
use folio::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct HoldingArgs {
    /// Price paid per unit
    #[arg(long)]
    price: String,
    /// Number of units held
    #[arg(long)]
    quantity: String,
    /// Purchase date (YYYY-MM-DD)
    #[arg(long)]
    date: String,
}

impl From<Commands> for folio::AppCommand {
    fn from(cmd: Commands) -> folio::AppCommand {
        match cmd {
            Commands::Summary => folio::AppCommand::Summary,
            Commands::List { asset_type } => folio::AppCommand::List { asset_type },
            Commands::Add {
                symbol,
                asset_type,
                holding,
            } => folio::AppCommand::Add(AssetDraft {
                symbol,
                asset_type: Some(asset_type),
                purchase_price: holding.price,
                quantity: holding.quantity,
                purchase_date: holding.date,
            }),
            Commands::Update { id, holding } => folio::AppCommand::Update {
                id: AssetId::from(id),
                changes: AssetUpdateDraft {
                    purchase_price: holding.price,
                    quantity: holding.quantity,
                    purchase_date: holding.date,
                },
            },
            Commands::Delete { ids } => folio::AppCommand::Delete {
                ids: ids.into_iter().map(AssetId::from).collect(),
            },
            Commands::Price { symbol, asset_type } => {
                folio::AppCommand::Price { symbol, asset_type }
            }
            Commands::Symbols { asset_type } => folio::AppCommand::Symbols { asset_type },
            Commands::Prices { force } => folio::AppCommand::Prices { force },
            Commands::Watch { interval } => folio::AppCommand::Watch {
                interval_secs: interval,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display portfolio valuation by asset class
    Summary,
    /// List holdings with live prices
    List {
        /// Only show one asset class (indian, us, crypto)
        #[arg(short = 't', long = "type")]
        asset_type: Option<AssetType>,
    },
    /// Add a new asset
    Add {
        /// Ticker symbol, e.g. RELIANCE.NS, AAPL, BTC
        symbol: String,
        /// Asset class (indian, us, crypto)
        #[arg(short = 't', long = "type")]
        asset_type: AssetType,
        #[command(flatten)]
        holding: HoldingArgs,
    },
    /// Update price, quantity and date of an asset
    Update {
        id: String,
        #[command(flatten)]
        holding: HoldingArgs,
    },
    /// Delete one or more assets by id
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Look up the live price of a single symbol
    Price {
        symbol: String,
        #[arg(short = 't', long = "type")]
        asset_type: AssetType,
    },
    /// List known symbols per asset class
    Symbols {
        #[arg(short = 't', long = "type")]
        asset_type: Option<AssetType>,
    },
    /// Refresh live prices and show the summary
    Prices {
        /// Clear the backend price cache first
        #[arg(short, long)]
        force: bool,
    },
    /// Keep the summary on screen, refreshing prices periodically
    Watch {
        /// Seconds between refreshes, overriding the configuration
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => folio::cli::setup::setup(),
        Some(cmd) => folio::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
