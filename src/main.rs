mod core;
mod features;
mod shared;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::app::build_router;
use crate::core::config::{AppConfig, Config};
use crate::core::database::Database;
use crate::features::resources::seed::seed_resources;
use crate::features::resources::ResourceRepository;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let db = Database::connect(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open database {}: {}", config.database.path, e))?;

    let repository = Arc::new(ResourceRepository::new(db.clone()));

    if std::env::args().nth(1).as_deref() == Some("seed") {
        tracing::info!("Seeding sample resources into {}", db.path());
        let summary = seed_resources(&repository).await;
        tracing::info!(
            created = summary.created,
            failed = summary.failed,
            "Seeding finished"
        );
        tracing::info!(
            categories = ?summary.categories,
            active = summary.active,
            inactive = summary.inactive,
            "Seeded resource summary"
        );
        db.close().await;
        return Ok(());
    }

    tracing::info!("Tokio runtime: {} worker threads", worker_threads);

    let app = build_router(&config.app, &config.swagger, repository);
    let listener = bind_listener(&config.app)?;

    let addr = config.app.server_address();
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;

    Ok(())
}

fn bind_listener(app: &AppConfig) -> anyhow::Result<tokio::net::TcpListener> {
    let socket_addr: std::net::SocketAddr = app
        .server_address()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    Ok(tokio::net::TcpListener::from_std(socket.into())?)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received, draining connections");
}
