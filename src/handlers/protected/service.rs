// handlers/protected/service.rs - service banner, health and identity

use axum::{extract::State, http::StatusCode, Extension};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};

/// GET /
pub async fn root() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": "Payment API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/login, /register (public)",
            "whoami": "/v1/auth/whoami",
            "category": "/v1/category[/:id]",
            "customers": "/v1/customers[/:id], /v1/customers/{activate/:status,deactivate/:id,reactivate/:id}",
            "methods": "/v1/methods[/:id], /v1/methods/{activate/:status,deactivate/:id,reactivate/:id}",
            "payments": "/v1/payments[/:id]",
            "reference": "/v2/category/:name, /v3/category/:id",
            "health": "/health",
        }
    }))
}

/// GET /health - 503 when the database does not answer
pub async fn health(State(state): State<AppState>) -> ApiResponse<Value> {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "database": state.store.backend(),
        })),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            ApiResponse::with_status(
                json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable",
                }),
                StatusCode::SERVICE_UNAVAILABLE,
            )
        }
    }
}

/// GET /v1/auth/whoami
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResponse<Value> {
    ApiResponse::success(json!({ "email": user.email }))
}

/// Fallback for unmatched paths
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}
