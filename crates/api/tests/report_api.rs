//! Integration tests for correction report lifecycle over the local backend.

mod common;

use axum::http::StatusCode;
use common::{body_json, expect_json, get, post_json, put_json};
use serde_json::json;

fn sample_report() -> serde_json::Value {
    json!({
        "doc_id": "00000000-0000-0000-0000-00000000d0c1",
        "word_id": 4,
        "original": "دفتر",
        "current_modern": "tefter",
        "suggested_modern": "defter"
    })
}

#[tokio::test]
async fn filed_report_starts_pending() {
    let app = common::build_test_app();

    let created = expect_json(
        post_json(app.clone(), "/api/v1/reports", sample_report()).await,
        StatusCode::CREATED,
    )
    .await;

    assert_eq!(created["data"]["status"], "pending");
    assert!(created["data"]["resolved_at"].is_null());
    assert!(created["data"]["reporter_id"].is_null());

    let id = created["data"]["id"].as_str().unwrap();
    let fetched = body_json(get(app, &format!("/api/v1/reports/{id}")).await).await;
    assert_eq!(fetched["data"], created["data"]);
}

#[tokio::test]
async fn accepting_a_report_stamps_resolved_at() {
    let app = common::build_test_app();

    let created =
        body_json(post_json(app.clone(), "/api/v1/reports", sample_report()).await).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let accepted = expect_json(
        put_json(
            app,
            &format!("/api/v1/reports/{id}/status"),
            json!({ "status": "accepted" }),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(accepted["data"]["status"], "accepted");
    assert!(accepted["data"]["resolved_at"].is_string());
}

#[tokio::test]
async fn terminal_reports_reject_further_transitions() {
    let app = common::build_test_app();

    let created =
        body_json(post_json(app.clone(), "/api/v1/reports", sample_report()).await).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/reports/{id}/status");

    put_json(app.clone(), &uri, json!({ "status": "rejected" })).await;

    let response = put_json(app, &uri, json!({ "status": "pending" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn list_filters_by_status() {
    let app = common::build_test_app();

    let first =
        body_json(post_json(app.clone(), "/api/v1/reports", sample_report()).await).await;
    post_json(app.clone(), "/api/v1/reports", sample_report()).await;

    let id = first["data"]["id"].as_str().unwrap();
    put_json(
        app.clone(),
        &format!("/api/v1/reports/{id}/status"),
        json!({ "status": "reviewed" }),
    )
    .await;

    let pending = body_json(get(app.clone(), "/api/v1/reports?status=pending").await).await;
    assert_eq!(pending["data"].as_array().unwrap().len(), 1);

    let reviewed = body_json(get(app, "/api/v1/reports?status=reviewed").await).await;
    assert_eq!(reviewed["data"].as_array().unwrap().len(), 1);
    assert_eq!(reviewed["data"][0]["id"], *id);
}
