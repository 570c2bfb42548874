// handlers/public/auth/mod.rs - Public authentication handlers
//
// Token acquisition endpoints served without a bearer token. Both share the same
// credential payload and the same 400 bodies for malformed or invalid input.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Map, Value};

use crate::middleware::{InvalidJson, JsonBody};
use crate::validation::{self, Rule};

pub mod login; // POST /login - verify credentials and issue a token
pub mod register; // POST /register - create a user account

pub use login::login_post;
pub use register::register_post;

const CREDENTIAL_RULES: &[(&str, &[Rule])] = &[
    ("email", &[Rule::NotEmpty, Rule::Email]),
    ("password", &[Rule::NotEmpty]),
];

/// Validated login/register payload
#[derive(Debug)]
pub(crate) struct Credentials {
    pub email: String,
    pub password: String,
}

pub(crate) fn credentials(body: Result<JsonBody, InvalidJson>) -> Result<Credentials, Response> {
    let JsonBody(body) = body.map_err(|rejection| {
        tracing::info!("Status 400: Invalid JSON data on {} ({})", rejection.path, rejection.reason);
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error-message": "Invalid JSON data" })),
        )
            .into_response()
    })?;

    if let Err(errors) = validation::validate(&body, CREDENTIAL_RULES) {
        tracing::info!("Status 400: credential validation failed: {:?}", errors);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "response": errors })),
        )
            .into_response());
    }

    Ok(Credentials {
        email: validation::string(&body, "email").unwrap_or_default().trim().to_string(),
        password: text(&body, "password"),
    })
}

/// Passwords sent as bare numbers are taken by their JSON text
fn text(body: &Map<String, Value>, field: &str) -> String {
    match body.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

pub(crate) fn status_body(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "status": status.as_u16(), "message": message })),
    )
        .into_response()
}
