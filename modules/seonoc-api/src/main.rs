use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use seonoc_common::Config;
use seonoc_monitor::{
    AvailabilityWorker, DigestWorker, ExpirationWorker, OptimizationReminderWorker,
    UnmonitoredReminderWorker,
};
use seonoc_store::{indexes, StoreClient};

mod actor;
mod error;
mod routes;
mod state;

use state::NocCore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("seonoc=info".parse()?))
        .init();

    let config = Config::from_env();
    config.log_redacted();

    let store = StoreClient::connect(&config.mongo_uri, &config.db_name).await?;
    indexes::ensure_indexes(&store).await?;

    let core = Arc::new(NocCore::new(config.clone(), store.clone()));

    let seeded = core.templates.seed_defaults().await?;
    if seeded > 0 {
        info!(seeded, "Seeded default notification templates");
    }

    // Long-lived workers, all reading the shared running flag.
    let handles = vec![
        AvailabilityWorker::new(
            store.clone(),
            core.router.clone(),
            core.throttle.clone(),
            core.running.clone(),
        )
        .spawn(),
        ExpirationWorker::new(
            store.clone(),
            core.router.clone(),
            core.throttle.clone(),
            core.running.clone(),
        )
        .spawn(),
        UnmonitoredReminderWorker::new(
            store.clone(),
            core.router.clone(),
            core.throttle.clone(),
            core.running.clone(),
        )
        .spawn(),
        OptimizationReminderWorker::new(store.clone(), core.router.clone(), core.running.clone())
            .spawn(),
        DigestWorker::new(store.clone(), core.router.clone(), core.running.clone()).spawn(),
    ];

    let app = routes::router(core.clone());
    let addr = format!("{}:{}", core.config.web_host, core.config.web_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "seonoc API listening");

    let running = core.running.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
            running.store(false, Ordering::Relaxed);
        })
        .await?;

    // Workers exit at the top of their next iteration.
    for handle in handles {
        let _ = handle.await;
    }
    info!("Shutdown complete");
    Ok(())
}
