//! API request types and rendered views.

use serde::{Deserialize, Serialize};

/// Form (or query string) submitted to `/roulette`.
#[derive(Debug, Default, Deserialize)]
pub struct RouletteForm {
    /// DECT number; absent or `0` falls back to the cookie
    pub d: Option<String>,
}

/// Query parameters accepted by `/admin`.
#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    /// Admin token
    pub token: Option<String>,

    /// Number to ban (`0` means none)
    pub ban: Option<String>,

    /// Number to unban (`0` means none)
    pub unban: Option<String>,

    /// Present (with any value) to include registered numbers
    pub showusers: Option<String>,
}

/// Registration form, optionally with an inline error.
#[derive(Debug, Serialize)]
pub struct RegisterView {
    pub view: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub unregistered: bool,
}

impl RegisterView {
    /// Plain registration form.
    pub fn form() -> Self {
        Self {
            view: "register",
            error: None,
            code: None,
            unregistered: false,
        }
    }

    /// Registration form showing an error message.
    pub fn with_error(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: Some(error.into()),
            code: Some(code.to_string()),
            ..Self::form()
        }
    }

    /// Registration form shown after leaving the roulette.
    pub fn unregistered() -> Self {
        Self {
            unregistered: true,
            ..Self::form()
        }
    }
}

/// Pairing result for a caller.
#[derive(Debug, Serialize)]
pub struct RouletteView {
    pub view: &'static str,
    pub own_number: u32,
    /// Partner number, or `"----"` when nobody can be paired
    pub partner_number: String,
    /// Whether the caller is still waiting on the priority queue
    pub priority: bool,
    pub active_users: usize,
}

/// Admin listing.
#[derive(Debug, Serialize)]
pub struct AdminView {
    pub view: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub banned_numbers: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_numbers: Option<Vec<u32>>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub registered_count: usize,
    pub banned_count: usize,
}
