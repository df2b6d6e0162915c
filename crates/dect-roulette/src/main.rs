//! DECT Roulette - Entry point.

use dect_roulette::{
    api::{create_router, create_router_with_rate_limit, AppState, RateLimitState},
    config::Config,
    AdminToken,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting DECT Roulette");

    // Admin token must exist before the first request
    let admin_token = match AdminToken::load_or_create(&config.admin.token_path).await {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to prepare admin token: {}", e);
            std::process::exit(1);
        }
    };
    info!("Admin token: {}", admin_token.expose());

    // Restore saved state; refuse to start on an unreadable snapshot
    let state = match AppState::load(&config, admin_token).await {
        Ok(s) => s,
        Err(e) => {
            error!(
                "Failed to load registry from {:?}: {}",
                config.registry.path, e
            );
            std::process::exit(1);
        }
    };

    let app = match RateLimitState::from_config(&config.rate_limit) {
        Some(rate_limit) => {
            info!(
                "Rate limiting enabled at {} requests per minute",
                config.rate_limit.global_per_minute
            );
            create_router_with_rate_limit(state, rate_limit)
        }
        None => create_router(state),
    };

    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
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
