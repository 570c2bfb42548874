// handlers/protected/reference.rs - category lookups under /v2 and /v3
//
// Read-only views of categories with their own `{success, ...}` body shape.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use super::resource::parse_id;
use crate::app::AppState;
use crate::database::models::Category;

/// Category without timestamps
#[derive(Debug, Serialize)]
struct CategorySummary {
    id: i64,
    name: String,
    description: String,
}

impl From<Category> for CategorySummary {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
        }
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

/// Case-insensitive substring match on the name
fn matches_name(category: &Category, needle: &str) -> bool {
    category.name.to_lowercase().contains(&needle.to_lowercase())
}

/// GET /v2/category/:name
pub async fn categories_by_name(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let name = name.trim();
    if name.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Parameter 'name' is required.");
    }

    let categories = match state.store.categories.find_all().await {
        Ok(categories) => categories,
        Err(e) => {
            tracing::error!("Category search failed: {}", e);
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "An error occurred while fetching categories");
        }
    };

    let found: Vec<CategorySummary> = categories
        .into_iter()
        .filter(|category| matches_name(category, name))
        .map(CategorySummary::from)
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "category-found": found.len(),
            "categories": found,
        })),
    )
        .into_response()
}

/// GET /v3/category/:id
pub async fn category_by_id(State(state): State<AppState>, Path(raw): Path<String>) -> Response {
    let Some(id) = parse_id(&raw) else {
        return failure(StatusCode::BAD_REQUEST, "Parameter 'id' is required.");
    };

    match state.store.categories.find_by_id(id).await {
        Ok(Some(category)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "category-data": CategorySummary::from(category),
            })),
        )
            .into_response(),
        Ok(None) => {
            tracing::info!("Status 404: category {} not found", id);
            failure(StatusCode::NOT_FOUND, "Category not found for the provided ID.")
        }
        Err(e) => {
            tracing::error!("Category lookup failed: {}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "An error occurred while fetching the category")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::CategoryDraft;
    use crate::database::Entity;
    use chrono::Utc;

    #[test]
    fn name_match_ignores_case() {
        let category = Category::from_draft(
            1,
            CategoryDraft {
                name: "Groceries".to_string(),
                description: "Food".to_string(),
            },
            Utc::now(),
        );
        assert!(matches_name(&category, "CER"));
        assert!(matches_name(&category, "groceries"));
        assert!(!matches_name(&category, "rent"));
    }
}
