// handlers/protected/resource.rs - CRUD handlers shared by every resource
//
// Each resource type describes its fields once through `Resource`; the handlers below
// implement list/get/create/replace/patch/delete (and the activation toggles for
// `Activatable` types) on top of its repository.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::app::AppState;
use crate::database::{DatabaseError, Entity, Repository, Store};
use crate::error::ApiError;
use crate::middleware::response::{Envelope, INVALID_JSON_MESSAGE};
use crate::middleware::{InvalidJson, JsonBody};
use crate::validation::{Rule, Validator};

pub const BAD_ID_MESSAGE: &str = "Bad request. ID must be greater than zero.";

/// A field accepted in request bodies: name, type rule, required on create/replace
pub type Field = (&'static str, Rule, bool);

pub trait Resource: Entity + Serialize {
    /// Capitalized name used in messages, e.g. `Customer`
    const LABEL: &'static str;
    /// Lowercase name used in messages, e.g. `customer`
    const NOUN: &'static str;
    const FIELDS: &'static [Field];

    fn repository(store: &Store) -> &Arc<dyn Repository<Self>>;

    /// Build a draft from a body that passed full validation
    fn draft(body: &Map<String, Value>) -> Self::Draft;

    /// Overwrite the fields present in a validated body
    fn apply(&mut self, body: &Map<String, Value>);

    /// `None` for types without an activation flag
    fn is_active(&self) -> Option<bool> {
        None
    }
}

pub trait Activatable: Resource {
    fn set_active(&mut self, active: bool);
}

/// Field checks for a body; `full` requires every required field to be present
pub fn check_fields<T: Resource>(body: &Map<String, Value>, full: bool) -> Result<(), Vec<String>> {
    let mut validator = Validator::new();
    for &(field, rule, required) in T::FIELDS {
        if full && required {
            validator.field(body, field, &[Rule::Required, rule]);
        } else {
            validator.field(body, field, &[rule]);
        }
    }
    validator.finish()
}

/// Positive integer ids only
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

fn bad_id(raw: &str) -> ApiError {
    tracing::info!("Status 400: invalid id {:?}", raw);
    ApiError::bad_request(BAD_ID_MESSAGE)
}

fn missing<T: Resource>(id: i64) -> ApiError {
    tracing::info!("Status 404: {} not found with id {}", T::NOUN, id);
    ApiError::not_found(format!("Resource {} not found", T::NOUN))
}

/// A row that vanished between lookup and write is still a 404
fn write_error<T: Resource>(id: i64, err: DatabaseError) -> ApiError {
    match err {
        DatabaseError::NotFound(_) => missing::<T>(id),
        other => ApiError::from(other),
    }
}

fn body_or_error(body: Result<JsonBody, InvalidJson>) -> Result<Map<String, Value>, ApiError> {
    match body {
        Ok(JsonBody(map)) => Ok(map),
        Err(rejection) => {
            tracing::info!("Status 400: Invalid JSON data on {} ({})", rejection.path, rejection.reason);
            Err(ApiError::invalid_json(INVALID_JSON_MESSAGE))
        }
    }
}

fn validated<T: Resource>(body: Result<JsonBody, InvalidJson>, full: bool) -> Result<Map<String, Value>, ApiError> {
    let body = body_or_error(body)?;
    check_fields::<T>(&body, full).map_err(|errors| {
        tracing::info!("Status 400: {} validation failed: {:?}", T::NOUN, errors);
        ApiError::validation_error(INVALID_JSON_MESSAGE, errors)
    })?;
    Ok(body)
}

async fn find_for_write<T: Resource>(store: &Store, raw: &str) -> Result<T, ApiError> {
    let id = parse_id(raw).ok_or_else(|| bad_id(raw))?;
    T::repository(store)
        .find_by_id(id)
        .await?
        .ok_or_else(|| missing::<T>(id))
}

fn envelope(path: &str, result: Result<String, ApiError>) -> Envelope {
    match result {
        Ok(message) => Envelope::success(message, path),
        Err(err) => err.into_envelope(path),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListFilter {
    pub active: Option<bool>,
}

/// GET /v1/<resource>
pub async fn list<T: Resource>(
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<T>>, ApiError> {
    let records = T::repository(&state.store).find_all().await?;

    let records = match filter.active {
        Some(flag) => records
            .into_iter()
            .filter(|record| record.is_active().map_or(true, |active| active == flag))
            .collect(),
        None => records,
    };

    Ok(Json(records))
}

/// GET /v1/<resource>/:id
pub async fn get_one<T: Resource>(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<T>, ApiError> {
    let id = parse_id(&raw).ok_or_else(|| bad_id(&raw))?;

    let record = T::repository(&state.store).find_by_id(id).await?.ok_or_else(|| {
        tracing::info!("Status 404: {} not found with id {}", T::NOUN, id);
        ApiError::not_found(format!("{} not found", T::LABEL))
    })?;

    if record.is_active() == Some(false) {
        tracing::info!("Status 403: {} {} is deactivated", T::NOUN, id);
        return Err(ApiError::forbidden(format!("This {} route is deactivated", T::NOUN)));
    }

    Ok(Json(record))
}

/// POST /v1/<resource>
pub async fn create<T: Resource>(
    State(state): State<AppState>,
    uri: Uri,
    body: Result<JsonBody, InvalidJson>,
) -> Envelope {
    let result = async {
        let body = validated::<T>(body, true)?;
        let record = T::repository(&state.store).create(T::draft(&body)).await?;
        tracing::info!("Created {} {}", T::NOUN, record.id());
        Ok::<_, ApiError>(format!("{} has been created successfully", T::LABEL))
    }
    .await;

    envelope(uri.path(), result)
}

/// PUT /v1/<resource>/:id
pub async fn replace<T: Resource>(
    State(state): State<AppState>,
    uri: Uri,
    Path(raw): Path<String>,
    body: Result<JsonBody, InvalidJson>,
) -> Envelope {
    envelope(uri.path(), write::<T>(&state.store, &raw, body, true).await)
}

/// PATCH /v1/<resource>/:id
pub async fn patch<T: Resource>(
    State(state): State<AppState>,
    uri: Uri,
    Path(raw): Path<String>,
    body: Result<JsonBody, InvalidJson>,
) -> Envelope {
    envelope(uri.path(), write::<T>(&state.store, &raw, body, false).await)
}

async fn write<T: Resource>(
    store: &Store,
    raw: &str,
    body: Result<JsonBody, InvalidJson>,
    full: bool,
) -> Result<String, ApiError> {
    let mut record = find_for_write::<T>(store, raw).await?;
    let body = validated::<T>(body, full)?;

    record.apply(&body);
    let id = record.id();
    T::repository(store)
        .update(&record)
        .await
        .map_err(|e| write_error::<T>(id, e))?;

    tracing::info!("Updated {} {}", T::NOUN, id);
    Ok(format!("{} has been updated successfully.", T::LABEL))
}

/// DELETE /v1/<resource>/:id
pub async fn delete<T: Resource>(State(state): State<AppState>, uri: Uri, Path(raw): Path<String>) -> Envelope {
    let result = async {
        let record = find_for_write::<T>(&state.store, &raw).await?;
        let id = record.id();

        if record.is_active() == Some(false) {
            tracing::info!("Status 403: Cannot delete a deactivated {} ({})", T::NOUN, id);
            return Err(ApiError::forbidden(format!("Cannot delete a deactivated {}", T::NOUN)));
        }

        T::repository(&state.store)
            .delete(id)
            .await
            .map_err(|e| write_error::<T>(id, e))?;

        tracing::info!("Deleted {} {}", T::NOUN, id);
        Ok::<_, ApiError>(format!("{} has been deleted successfully.", T::LABEL))
    }
    .await;

    envelope(uri.path(), result)
}

/// PUT /v1/<resource>/activate/:status - set the flag on every record
pub async fn activate_all<T: Activatable>(State(state): State<AppState>, Path(raw): Path<String>) -> Response {
    let active = match raw.trim().parse::<i64>() {
        Ok(0) => false,
        Ok(1) => true,
        _ => {
            tracing::info!("Status 400: invalid activation status {:?}", raw);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": "Invalid status value. Use 0 for deactivation or 1 for activation."
                })),
            )
                .into_response();
        }
    };

    let repository = T::repository(&state.store);
    let result = async {
        for mut record in repository.find_all().await? {
            record.set_active(active);
            repository.update(&record).await?;
        }
        Ok::<_, ApiError>(())
    }
    .await;

    if let Err(err) = result {
        return err.into_response();
    }

    let message = if active {
        "Activated successfully."
    } else {
        "Deactivated successfully."
    };
    tracing::info!("{} {}s", message, T::NOUN);
    (StatusCode::OK, Json(json!({ "message": message }))).into_response()
}

/// PUT /v1/<resource>/deactivate/:id
pub async fn deactivate<T: Activatable>(State(state): State<AppState>, uri: Uri, Path(raw): Path<String>) -> Envelope {
    envelope(uri.path(), toggle::<T>(&state.store, &raw, false).await)
}

/// PUT /v1/<resource>/reactivate/:id
pub async fn reactivate<T: Activatable>(State(state): State<AppState>, uri: Uri, Path(raw): Path<String>) -> Envelope {
    envelope(uri.path(), toggle::<T>(&state.store, &raw, true).await)
}

async fn toggle<T: Activatable>(store: &Store, raw: &str, active: bool) -> Result<String, ApiError> {
    let mut record = find_for_write::<T>(store, raw).await?;
    let id = record.id();

    record.set_active(active);
    T::repository(store)
        .update(&record)
        .await
        .map_err(|e| write_error::<T>(id, e))?;

    let verb = if active { "reactivated" } else { "deactivated" };
    tracing::info!("{} {} {}", T::LABEL, id, verb);
    Ok(format!("{} has been {} successfully.", T::LABEL, verb))
}
