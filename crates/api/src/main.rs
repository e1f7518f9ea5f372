//! Read-view server entry point.
//!
//! Startup order: bootstrap the store from the bulk export, start the
//! projector on the event channel, then serve queries. A failed bootstrap or
//! a lost channel exits non-zero so a supervisor can restart the process.

use std::future::IntoFuture;
use std::process::ExitCode;

use api::config::Config;
use event_channel::in_memory_channel;
use read_view::{
    BootstrapLoader, BootstrapReport, InMemorySnapshotSource, JsonFileSnapshotSource,
    MaterializedStore, Projector,
};
use tokio::signal;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn bootstrap(
    config: &Config,
    store: &MaterializedStore,
) -> read_view::Result<BootstrapReport> {
    match &config.snapshot_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "bootstrapping from snapshot file");
            BootstrapLoader::new(JsonFileSnapshotSource::new(path))
                .load(store)
                .await
        }
        None => {
            tracing::warn!("SNAPSHOT_PATH not set, starting with an empty read view");
            BootstrapLoader::new(InMemorySnapshotSource::new())
                .load(store)
                .await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Populate the read view before anything can query it
    let store = MaterializedStore::new();
    if let Err(err) = bootstrap(&config, &store).await {
        tracing::error!(error = %err, "bootstrap failed, refusing to serve");
        return ExitCode::FAILURE;
    }

    // 4. Start the single writer
    let (publisher, channel) = in_memory_channel(config.event_buffer);
    // Held until the projector is told to stop, so dropping the router on
    // shutdown cannot close the channel under it.
    let channel_guard = publisher.clone();
    let (stop_projector, projector_stopped) = oneshot::channel::<()>();
    let mut projector = tokio::spawn(Projector::new(store.clone()).run(channel, async move {
        let _ = projector_stopped.await;
    }));

    // 5. Serve queries
    let app = api::create_app(api::create_state(store, publisher), metrics_handle);
    let addr = config.addr();
    tracing::info!(%addr, "starting read-view server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    tokio::select! {
        result = server => {
            if let Err(err) = result {
                tracing::error!(error = %err, "server error");
                return ExitCode::FAILURE;
            }
        }
        joined = &mut projector => {
            tracing::error!(result = ?joined, "projector exited while serving");
            return ExitCode::FAILURE;
        }
    }

    // 6. Let the projector finish its in-flight event
    let _ = stop_projector.send(());
    let joined = projector.await;
    drop(channel_guard);
    match joined {
        Ok(Ok(stats)) => {
            tracing::info!(%stats, "server shut down gracefully");
            ExitCode::SUCCESS
        }
        Ok(Err(err)) => {
            tracing::error!(error = %err, "projector failed during shutdown");
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!(error = %err, "projector task panicked");
            ExitCode::FAILURE
        }
    }
}
