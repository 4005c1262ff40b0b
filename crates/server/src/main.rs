use std::time::Duration;

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use moviesearch_server::config::Settings;
use moviesearch_server::state::AppState;

const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::from_env().context("failed to load settings")?;

    let http = moviesearch_metadata::http::build_client(settings.upstream_timeout)
        .context("failed to build HTTP client")?;

    let state = AppState::new(&settings, http);
    info!(
        search_ttl_secs = settings.search_cache_ttl.as_secs(),
        detail_ttl_secs = settings.detail_cache_ttl.as_secs(),
        "in-memory caches initialized"
    );

    // Spawn expired-entry purge task
    {
        let state = state.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(CACHE_PURGE_INTERVAL).await;
                let searches = state.search_cache.purge_expired().await;
                let details = state.detail_cache.purge_expired().await;
                debug!(searches, details, "purged expired cache entries");
            }
        });
    }

    let app = moviesearch_server::routes::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .context("failed to bind")?;
    info!(addr = %settings.bind_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down, resetting caches");
    state.reset_caches().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
