use mimalloc::MiMalloc;
use std::net::SocketAddr;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = quackgate::config::Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let target = cfg.database_target();
    info!(
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        database = %target,
        loglevel = %cfg.basic.loglevel,
        index_file = %cfg.basic.index_file.display()
    );

    // A database that cannot be opened is fatal.
    let db = quackgate::db::spawn(&target).await?;
    db.ping().await?;

    if !cfg.basic.index_file.is_file() {
        warn!(
            path = %cfg.basic.index_file.display(),
            "Index file not found; GET / will respond 404."
        );
    }

    let state = quackgate::server::GatewayState::new(db.clone(), cfg.basic.index_file.clone());
    let app = quackgate::server::gateway_router(state);

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM where available.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal as unix_signal};

        match unix_signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    () = ctrl_c() => {}
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down."),
                }
                return;
            }
            Err(e) => warn!(error = %e, "SIGTERM handler unavailable; waiting for Ctrl+C only"),
        }
    }

    ctrl_c().await;
}

/// Never resolves if the Ctrl+C handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "Ctrl+C handler unavailable");
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down.");
}
