use super::{summary, ui};
use crate::core::controller::PortfolioController;
use crate::core::state::PortfolioState;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// What the screen last showed about prices.
#[derive(Debug, Clone, PartialEq, Default)]
struct PriceStatus {
    updated_at: Option<DateTime<Local>>,
    error: Option<String>,
}

impl PriceStatus {
    fn of(state: &PortfolioState) -> Self {
        Self {
            updated_at: state.last_price_update,
            error: state.price_error.clone(),
        }
    }
}

/// Shows the summary and redraws it after every price refresh until Ctrl-C.
pub async fn run(
    controller: Arc<PortfolioController>,
    period: Duration,
    currency_symbol: &str,
) -> Result<()> {
    controller.load_assets().await?;
    let mut shown = PriceStatus::of(&controller.snapshot().await);
    draw(&controller, currency_symbol, period).await;

    let poller = controller.spawn_price_polling(period);
    info!("Refreshing prices every {}s", period.as_secs());

    let mut redraw = tokio::time::interval(Duration::from_secs(1));
    let result = loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                break signal.context("Failed to listen for Ctrl-C");
            }
            _ = redraw.tick() => {
                let current = PriceStatus::of(&controller.snapshot().await);
                if current != shown {
                    debug!("Price status changed, redrawing");
                    shown = current;
                    draw(&controller, currency_symbol, period).await;
                }
            }
        }
    };

    poller.abort();
    result
}

async fn draw(controller: &PortfolioController, currency_symbol: &str, period: Duration) {
    let state = controller.snapshot().await;
    if let Err(e) = console::Term::stdout().clear_screen() {
        debug!(error = %e, "Failed to clear screen");
    }
    println!("{}", summary::render(&state, currency_symbol));
    ui::print_separator();
    println!(
        "{}",
        ui::style_text(
            &format!(
                "Refreshing every {}s. Press Ctrl-C to stop.",
                period.as_secs()
            ),
            ui::StyleType::Subtle
        )
    );
}
