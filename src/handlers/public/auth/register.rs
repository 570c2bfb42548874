// handlers/public/auth/register.rs - POST /register handler

use axum::{extract::State, http::StatusCode, response::Response};

use super::{credentials, status_body};
use crate::app::AppState;
use crate::auth::AuthError;
use crate::middleware::{InvalidJson, JsonBody};

/// POST /register - create a user account from `{email, password}`
pub async fn register_post(State(state): State<AppState>, body: Result<JsonBody, InvalidJson>) -> Response {
    let credentials = match credentials(body) {
        Ok(credentials) => credentials,
        Err(response) => return response,
    };

    match state.auth.register(&credentials.email, &credentials.password).await {
        Ok(_) => status_body(StatusCode::OK, "User registration successful."),
        Err(AuthError::DuplicateEmail) => {
            tracing::info!("Status 400: email already registered");
            status_body(StatusCode::BAD_REQUEST, "Email already registered")
        }
        Err(e) => {
            tracing::error!("Registration failed: {}", e);
            status_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred while processing your request.",
            )
        }
    }
}
