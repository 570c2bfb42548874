mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn payment_sum_is_stored_as_float() -> Result<()> {
    let app = TestApp::new();
    let token = app.token().await?;

    let (status, body) = app.post("/v1/payments", &token, json!({ "sum": 12.5 })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Payment has been created successfully");

    // Numeric strings are accepted and sanitized
    let (status, _) = app.post("/v1/payments", &token, json!({ "sum": " 40 " })).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = app.get("/v1/payments", &token).await?;
    assert_eq!(list, json!([{ "id": 1, "sum": 12.5 }, { "id": 2, "sum": 40.0 }]));
    Ok(())
}

#[tokio::test]
async fn non_numeric_sum_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let token = app.token().await?;

    let (status, body) = app.post("/v1/payments", &token, json!({ "sum": "a lot" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["sum must be numeric"]));

    let (status, body) = app.post("/v1/payments", &token, json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["sum is required"]));
    Ok(())
}

#[tokio::test]
async fn update_and_delete_payment() -> Result<()> {
    let app = TestApp::new();
    let token = app.token().await?;
    app.post("/v1/payments", &token, json!({ "sum": 10 })).await?;

    let (status, body) = app.patch("/v1/payments/1", &token, json!({ "sum": 99.99 })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Payment has been updated successfully.");

    let (_, payment) = app.get("/v1/payments/1", &token).await?;
    assert_eq!(payment, json!({ "id": 1, "sum": 99.99 }));

    // An empty patch is valid and changes nothing
    let (status, _) = app.patch("/v1/payments/1", &token, json!({})).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.delete("/v1/payments/1", &token).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.get("/v1/payments/1", &token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Payment not found" }));
    Ok(())
}

#[tokio::test]
async fn ignores_activation_filter() -> Result<()> {
    let app = TestApp::new();
    let token = app.token().await?;
    app.post("/v1/payments", &token, json!({ "sum": 1 })).await?;

    let (status, list) = app.get("/v1/payments?active=false", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    Ok(())
}
