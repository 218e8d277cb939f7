// lifetrack - personal life tracking daemon
// Loads the persisted state and runs the reminder scheduler until interrupted.

use lifetrack::app;
use lifetrack::services::LogSink;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifetrack=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting lifetrack");

    let data_dir = app::default_data_dir()?;
    let app = app::setup(data_dir, Arc::new(LogSink)).await?;
    app.start_scheduler();

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    Ok(())
}
