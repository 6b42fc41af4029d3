//! `AppError` to HTTP response mapping, plus malformed requests through the
//! full router.

mod common;

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use common::{
    body_json, create_job_card, get_auth, job_card_body, login_token, post_json,
    post_json_auth, send_raw,
};
use http_body_util::BodyExt;
use repairdesk_api::error::AppError;
use repairdesk_core::error::CoreError;
use repairdesk_core::job_status::JobStatus;
use sqlx::PgPool;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn not_found_is_404() {
    let (status, json) = error_to_response(AppError::Core(CoreError::NotFound {
        entity: "JobCard",
        id: 42,
    }))
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "JobCard with id 42 not found");
}

#[tokio::test]
async fn invalid_status_is_400_and_names_the_value() {
    let err = "archived".parse::<JobStatus>().unwrap_err();
    let (status, json) = error_to_response(AppError::Core(err)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_STATUS");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("'archived'"));
    assert!(message.contains("pending, in-progress, completed"));
}

#[tokio::test]
async fn validation_is_400() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Validation("model must not be empty".into())))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "model must not be empty");
}

#[tokio::test]
async fn unauthorized_and_forbidden() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Unauthorized("Not signed in".into()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::Forbidden("Admin access required".into())))
            .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn conflict_is_409() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Conflict("duplicate mobile".into()))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn not_found_by_message_is_404() {
    let (status, json) =
        error_to_response(AppError::NotFound("No customer with mobile 9000000000".into())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "No customer with mobile 9000000000");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let (status, json) =
        error_to_response(AppError::InternalError("pool exhausted at 10.0.0.5".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::Internal("secret detail".into()))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!json["error"].as_str().unwrap().contains("secret"));
}

#[tokio::test]
async fn row_not_found_is_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn other_database_errors_are_500() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::PoolTimedOut)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Malformed requests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_body_field_is_json_400(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;

    let mut body = job_card_body("Ravi", "9876543210", "Galaxy A52");
    body.as_object_mut().unwrap().remove("model");
    let response = post_json_auth(app, "/api/job-cards", &token, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("model"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unparsable_body_is_json_400(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;
    let card = create_job_card(
        app.clone(),
        &token,
        job_card_body("Ravi", "9876543210", "Galaxy A52"),
    )
    .await;

    let uri = format!("/api/job-cards/{}/status", card["id"]);
    let response = send_raw(app, Method::PATCH, &uri, &token, "{not json").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_shape_is_json_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/auth/login", serde_json::json!({ "user": "x" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_query_string_is_json_400(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;

    let response = get_auth(app, "/api/job-cards?page=1&page=2", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
