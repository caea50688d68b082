use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use billing_service::{
    config::AppConfig,
    metrics_server,
    observability,
    page::PageAsset,
    router,
    store::{RecordStore, SqliteRecordStore},
    AppState,
};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    // The page has to be present before we accept traffic.
    let page = PageAsset::new(&cfg.server.page_path);
    page.verify().context("checking page asset")?;

    let store = Arc::new(
        SqliteRecordStore::open(&cfg.storage)
            .await
            .with_context(|| format!("opening database {}", cfg.storage.database_path.display()))?,
    );
    store.migrate().await.context("preparing electricity table")?;
    tracing::info!(path = %cfg.storage.database_path.display(), "database ready");

    let addr: SocketAddr = cfg
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("invalid server.bind_addr {}", cfg.server.bind_addr))?;

    let app = router(AppState::new(store.clone(), page, cfg.readings.policy));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("server listening on http://{addr}");

    let served = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.close().await;
    tracing::info!("database closed");

    served.context("http server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
