//! HTTP API for the roulette service.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{logging_middleware, rate_limit_middleware, RateLimitState};
pub use types::*;

use crate::config::Config;
use crate::error::RouletteError;
use crate::registry::{Registry, Store};
use crate::secret::AdminToken;
use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Registry and pairing queues
    pub registry: Arc<RwLock<Registry>>,
    /// Snapshot storage backend
    pub store: Arc<Store>,
    /// Secret required by the admin endpoint
    pub admin_token: Arc<AdminToken>,
}

impl AppState {
    /// Create new application state.
    pub fn new(registry: Registry, store: Store, admin_token: AdminToken) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            store: Arc::new(store),
            admin_token: Arc::new(admin_token),
        }
    }

    /// Build state from configuration, restoring the saved snapshot.
    ///
    /// A snapshot that exists but cannot be parsed is an error; the file is
    /// left untouched.
    pub async fn load(config: &Config, admin_token: AdminToken) -> Result<Self, RouletteError> {
        let store = if config.registry.persist {
            Store::file(config.registry.path.clone())
        } else {
            info!("Persistence disabled, using in-memory storage");
            Store::memory()
        };

        let registry = store.load().await?;
        Ok(Self::new(registry, store, admin_token))
    }

    /// Write the snapshot. Failures are logged, never surfaced to the caller.
    pub async fn persist(&self, registry: &Registry) {
        if let Err(e) = self.store.save(registry).await {
            error!(error = %e, "Failed to write registry snapshot");
        }
    }
}

/// Create the API router without rate limiting.
pub fn create_router(state: AppState) -> Router {
    build_router(state, None)
}

/// Create the API router with a global rate limit on the public routes.
pub fn create_router_with_rate_limit(state: AppState, rate_limit: RateLimitState) -> Router {
    build_router(state, Some(rate_limit))
}

fn build_router(state: AppState, rate_limit: Option<RateLimitState>) -> Router {
    let mut routes = Router::new()
        .route("/", get(handlers::index))
        .route("/roulette", get(handlers::roulette).post(handlers::roulette))
        .route("/unregister", get(handlers::unregister))
        .route("/admin", get(handlers::admin));

    if let Some(rate_limit) = rate_limit {
        routes = routes.layer(axum_middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ));
    }

    routes
        // Health check (never rate limited)
        .route("/health", get(handlers::health))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
