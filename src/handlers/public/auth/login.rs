// handlers/public/auth/login.rs - POST /login handler

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use super::{credentials, status_body};
use crate::app::AppState;
use crate::auth::AuthError;
use crate::middleware::{InvalidJson, JsonBody};

/**
 * POST /login - Authenticate user and receive JWT token
 *
 * Expected Input:
 * ```json
 * { "email": "jane@example.com", "password": "secret" }
 * ```
 *
 * Expected Output (Success):
 * ```json
 * {
 *   "status": 200,
 *   "message": "You've logged in successfully.",
 *   "token": "eyJhbGciOiJIUzI1NiI...",
 *   "user": { "id": 1, "email": "jane@example.com" }
 * }
 * ```
 *
 * Unknown email and wrong password produce the same 401 body.
 */
pub async fn login_post(State(state): State<AppState>, body: Result<JsonBody, InvalidJson>) -> Response {
    let credentials = match credentials(body) {
        Ok(credentials) => credentials,
        Err(response) => return response,
    };

    match state.auth.login(&credentials.email, &credentials.password).await {
        Ok((user, token)) => {
            tracing::info!("User {} logged in", user.id);
            (
                StatusCode::OK,
                Json(json!({
                    "status": 200,
                    "message": "You've logged in successfully.",
                    "token": token,
                    "user": {
                        "id": user.id,
                        "email": user.email,
                    }
                })),
            )
                .into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Status 401: invalid login credentials");
            status_body(StatusCode::UNAUTHORIZED, "Your login credentials are invalid.")
        }
        Err(e) => {
            tracing::error!("Login failed: {}", e);
            status_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred while processing your request.",
            )
        }
    }
}
