//! Request logging and the optional global rate limit.

use crate::config::RateLimitConfig;
use crate::error::RouletteError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc, time::Instant};
use tracing::{debug, error, info, warn};

/// Log one line per request.
///
/// Only the path is recorded: `/admin` carries its token in the query string.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        error!(%method, %path, %status, elapsed_ms, "Request failed");
    } else if status.is_client_error() {
        info!(%method, %path, %status, elapsed_ms, "Request rejected");
    } else {
        debug!(%method, %path, %status, elapsed_ms, "Request served");
    }

    response
}

/// One quota shared by every caller of the public routes.
#[derive(Clone)]
pub struct RateLimitState {
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RateLimitState {
    /// Limiter admitting `requests_per_minute`; `None` for a zero quota.
    pub fn per_minute(requests_per_minute: u32) -> Option<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(requests_per_minute)?);
        Some(Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Limiter described by the configuration, if it is switched on.
    pub fn from_config(config: &RateLimitConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }

        let state = Self::per_minute(config.global_per_minute);
        if state.is_none() {
            warn!("Rate limiting enabled with a zero quota, leaving it off");
        }
        state
    }

    fn admit(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

/// Reject with 429 once the shared quota is spent.
pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, RouletteError> {
    if !rate_limit.admit() {
        warn!(path = %request.uri().path(), "Rate limit exceeded");
        return Err(RouletteError::RateLimitExceeded);
    }

    Ok(next.run(request).await)
}
