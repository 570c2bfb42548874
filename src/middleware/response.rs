use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Message returned whenever a request body is not a JSON object
pub const INVALID_JSON_MESSAGE: &str = "Invalid or incomplete JSON data";

/// Uniform `{success, message, status, path}` body returned by mutation endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    pub status: u16,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl Envelope {
    /// 200 envelope
    pub fn success(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            status: StatusCode::OK.as_u16(),
            path: path.into(),
            error: None,
            errors: Vec::new(),
        }
    }

    pub fn failure(status: StatusCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            status: status.as_u16(),
            path: path.into(),
            error: None,
            errors: Vec::new(),
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Wrapper for service responses that adds the `{success, data}` envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None,
        }
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            data,
            status_code: Some(status_code),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        let envelope = json!({
            "success": status.is_success(),
            "data": data_value
        });

        (status, Json(envelope)).into_response()
    }
}

/// JSON object request body
///
/// The raw body is decoded whatever the `Content-Type` header says. Anything that is not a
/// well-formed JSON object (bad syntax, arrays, scalars, a body over the size limit) is
/// rejected with [`InvalidJson`].
#[derive(Debug, Clone)]
pub struct JsonBody(pub Map<String, Value>);

/// Rejection produced by [`JsonBody`]. Renders as a 400 envelope for the request path;
/// handlers with a different error shape take `Result<JsonBody, InvalidJson>` instead.
#[derive(Debug)]
pub struct InvalidJson {
    pub path: String,
    pub reason: String,
}

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = InvalidJson;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let path = req.uri().path().to_string();

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| InvalidJson {
            path: path.clone(),
            reason: rejection.body_text(),
        })?;

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(JsonBody(map)),
            Ok(other) => Err(InvalidJson {
                path,
                reason: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
            Err(e) => Err(InvalidJson {
                path,
                reason: e.to_string(),
            }),
        }
    }
}

impl IntoResponse for InvalidJson {
    fn into_response(self) -> Response {
        tracing::info!("Status 400: Invalid JSON data on {} ({})", self.path, self.reason);
        Envelope::failure(StatusCode::BAD_REQUEST, INVALID_JSON_MESSAGE, self.path).into_response()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
