mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

async fn seed(app: &TestApp, token: &str) -> Result<()> {
    for (name, description) in [("Groceries", "Food"), ("Rent", "Housing"), ("Grocery delivery", "Fees")] {
        app.post("/v1/category", token, json!({ "name": name, "description": description }))
            .await?;
    }
    Ok(())
}

#[tokio::test]
async fn search_by_name_is_case_insensitive() -> Result<()> {
    let app = TestApp::new();
    let token = app.token().await?;
    seed(&app, &token).await?;

    let (status, body) = app.get("/v2/category/GROCER", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "category-found": 2,
            "categories": [
                { "id": 1, "name": "Groceries", "description": "Food" },
                { "id": 3, "name": "Grocery delivery", "description": "Fees" }
            ]
        })
    );

    let (_, body) = app.get("/v2/category/travel", &token).await?;
    assert_eq!(body, json!({ "success": true, "category-found": 0, "categories": [] }));
    Ok(())
}

#[tokio::test]
async fn lookup_by_id() -> Result<()> {
    let app = TestApp::new();
    let token = app.token().await?;
    seed(&app, &token).await?;

    let (status, body) = app.get("/v3/category/2", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "category-data": { "id": 2, "name": "Rent", "description": "Housing" }
        })
    );

    let (status, body) = app.get("/v3/category/20", &token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Category not found for the provided ID." })
    );

    let (status, body) = app.get("/v3/category/abc", &token).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "message": "Parameter 'id' is required." }));
    Ok(())
}
