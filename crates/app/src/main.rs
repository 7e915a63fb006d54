//! DealFlow - CRM pipeline client
//!
//! Headless entry point: loads configuration, fetches the pipeline and logs
//! a per-stage summary. An optional first argument narrows the board by
//! deal title or contact name.

use anyhow::Context;
use dealflow_core::PipelineFilter;
use dealflow_lib::utils::logging::init_tracing;
use dealflow_lib::{get_pipeline_board, get_portfolio_summary, AppContext};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    match dotenvy::dotenv() {
        Ok(path) => log::info!("Loaded .env from: {:?}", path),
        Err(e) => log::warn!("Could not load .env file: {}", e),
    }

    let config =
        dealflow_infra::config::load_or_default().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let ctx = AppContext::new_with_config(config).context("failed to build application context")?;

    let filter = match std::env::args().nth(1) {
        Some(query) => PipelineFilter::all().with_query(query),
        None => PipelineFilter::all(),
    };

    let board = get_pipeline_board(&ctx, &filter).await.context("failed to load pipeline")?;
    for column in &board.stages {
        info!(
            stage = %column.stage,
            label = column.stage.label(),
            count = column.count,
            total_value = %column.total_value,
            "pipeline stage"
        );
    }

    let portfolio = get_portfolio_summary(&ctx).await.context("failed to summarise portfolio")?;
    info!(
        deals = board.total_deals,
        filtered_value = %board.total_value,
        portfolio_value = %portfolio.total_value,
        "pipeline loaded"
    );

    Ok(())
}
