use anyhow::Context;
use chrono::Utc;
use journal_pdf::LayoutConfig;
use journal_pdf_api::{app_with_state, AppState, MemoryExportStore, ServerConfig};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PURGE_INTERVAL_SECS: u64 = 600;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "journal_pdf=info,journal_pdf_api=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    let state = AppState::new(LayoutConfig::default(), config.cache_ttl())?;
    tokio::spawn(purge_expired_exports(state.store.clone()));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;

    info!(
        cache_ttl_secs = config.cache_ttl_secs,
        "journal-pdf API listening on http://{}", config.addr
    );

    axum::serve(listener, app_with_state(state)).await?;
    Ok(())
}

/// Periodically drops expired exports so idle keys do not pile up.
async fn purge_expired_exports(store: MemoryExportStore) {
    let mut ticker = tokio::time::interval(Duration::from_secs(PURGE_INTERVAL_SECS));
    loop {
        ticker.tick().await;
        let purged = store.purge_expired(Utc::now()).await;
        if purged > 0 {
            debug!(purged, "purged expired exports");
        }
    }
}
