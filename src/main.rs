// followup-tracker - remembers who you owe a reply, and when
//
// Entry point. Reads config, opens the database, serves the API until
// Ctrl-C or SIGTERM, then closes the pool.

use anyhow::Context;
use followup_tracker_lib::{api, Config, Database, Tracker};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env().context("invalid configuration")?;
    tracing::info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "starting followup-tracker"
    );

    let db = Database::connect(&config.database_url, config.max_connections)
        .await
        .with_context(|| format!("cannot open database {}", config.database_url))?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("cannot bind {}", config.bind_addr()))?;

    let tracker = Tracker::new(Arc::new(db.clone()));
    let served = api::serve(listener, tracker, api::shutdown_signal()).await;

    // Close the pool even if the server failed
    db.close().await;

    served.context("API server failed")?;
    Ok(())
}

fn init_logging() {
    // RUST_LOG wins, otherwise info for everything
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
