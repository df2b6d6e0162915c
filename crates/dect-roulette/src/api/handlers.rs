//! HTTP request handlers.

use super::types::{AdminQuery, AdminView, HealthResponse, RegisterView, RouletteForm, RouletteView};
use super::AppState;
use crate::error::RouletteError;
use crate::registry::{parse_number, validate_dect_number, Registry};
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{info, warn};

/// Cookie holding the caller's DECT number.
pub const NUMBER_COOKIE: &str = "dectnumber";

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.registry.read().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        registered_count: registry.count(),
        banned_count: registry.count_banned(),
    })
}

/// Landing page: returning callers go straight to the roulette.
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(Ok(number)) = cookie_number(&jar) {
        let registry = state.registry.read().await;
        if !registry.is_banned(number) {
            return Redirect::to("/roulette").into_response();
        }
    }

    Json(RegisterView::form()).into_response()
}

/// Register the caller (if needed) and draw a partner.
pub async fn roulette(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Option<Form<RouletteForm>>,
) -> Result<(CookieJar, Json<RouletteView>), RouletteError> {
    let submitted = form.as_ref().and_then(|Form(f)| f.d.as_deref());
    let number = requested_number(submitted, &jar)?;

    let mut registry = state.registry.write().await;

    let newly_registered = registry.register(number).map_err(|e| {
        warn!(dect_number = number, error = %e, "Registration rejected");
        e
    })?;
    if newly_registered {
        info!(dect_number = number, "Number registered");
        state.persist(&registry).await;
    }

    let partner = registry.pick_partner(number);
    match partner.number() {
        Some(partner_number) => info!(dect_number = number, partner_number, "Partner drawn"),
        None => info!(dect_number = number, "No partner available"),
    }

    let view = RouletteView {
        view: "roulette",
        own_number: number,
        partner_number: partner.to_string(),
        priority: registry.is_prioritized(number),
        active_users: registry.count(),
    };
    drop(registry);

    let cookie = Cookie::build((NUMBER_COOKIE, number.to_string())).path("/");
    Ok((jar.add(cookie), Json(view)))
}

/// Leave the roulette and forget the caller's number.
pub async fn unregister(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<RegisterView>), RouletteError> {
    let number = requested_number(None, &jar).map_err(|e| match e {
        RouletteError::OutOfRange(n) => RouletteError::InvalidNumber(n.to_string()),
        other => other,
    })?;

    let mut registry = state.registry.write().await;
    if registry.unregister(number)? {
        info!(dect_number = number, "Number unregistered");
        state.persist(&registry).await;
    }
    drop(registry);

    let jar = jar.remove(Cookie::build(NUMBER_COOKIE).path("/"));
    Ok((jar, Json(RegisterView::unregistered())))
}

/// Token-gated moderation: ban, unban and list numbers.
pub async fn admin(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Response, RouletteError> {
    if !state.admin_token.verify(query.token.as_deref()) {
        warn!("Admin request with invalid token");
        return Err(RouletteError::InvalidAdminToken);
    }

    let mut registry = state.registry.write().await;

    match optional_number(query.ban.as_deref()) {
        Ok(Some(number)) => {
            if registry.ban(number) {
                info!(dect_number = number, "Number banned");
                state.persist(&registry).await;
            }
        }
        Ok(None) => {}
        Err(e) => return Ok(admin_error(&registry, e)),
    }

    match optional_number(query.unban.as_deref()) {
        Ok(Some(number)) => {
            if registry.unban(number) {
                info!(dect_number = number, "Number unbanned");
                state.persist(&registry).await;
            }
        }
        Ok(None) => {}
        Err(e) => return Ok(admin_error(&registry, e)),
    }

    let view = AdminView {
        view: "admin",
        error: None,
        banned_numbers: registry.banned_numbers(),
        registered_numbers: query
            .showusers
            .is_some()
            .then(|| registry.registered_numbers()),
    };

    Ok(Json(view).into_response())
}

fn admin_error(registry: &Registry, error: RouletteError) -> Response {
    warn!(error = %error, "Rejected admin parameter");

    let view = AdminView {
        view: "admin",
        error: Some(error.to_string()),
        banned_numbers: registry.banned_numbers(),
        registered_numbers: None,
    };

    (StatusCode::BAD_REQUEST, Json(view)).into_response()
}

/// The caller's number from the cookie, if the cookie is set.
fn cookie_number(jar: &CookieJar) -> Option<Result<u32, RouletteError>> {
    jar.get(NUMBER_COOKIE)
        .map(|cookie| parse_number(cookie.value()).and_then(validate_dect_number))
}

/// Resolve the caller's number: a submitted non-zero value wins, otherwise
/// the cookie is used. Missing values count as `0` and fail the range check.
fn requested_number(submitted: Option<&str>, jar: &CookieJar) -> Result<u32, RouletteError> {
    let mut number = match submitted {
        Some(raw) => parse_number(raw)?,
        None => 0,
    };

    if number == 0 {
        number = match jar.get(NUMBER_COOKIE) {
            Some(cookie) => parse_number(cookie.value())?,
            None => 0,
        };
    }

    validate_dect_number(number)
}

/// Parse an optional admin parameter where absent or `0` means "none".
fn optional_number(raw: Option<&str>) -> Result<Option<u32>, RouletteError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match parse_number(raw)? {
        0 => Ok(None),
        number => validate_dect_number(number).map(Some),
    }
}
