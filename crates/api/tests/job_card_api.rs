//! HTTP-level tests for the `/api/job-cards` resource.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_job_card, delete_auth, get_auth, job_card_body, login_token,
    patch_json_auth, post_json_auth, put_json_auth,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_assigns_bill_number_equal_to_id(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;

    for i in 0..3 {
        let card = create_job_card(
            app.clone(),
            &token,
            job_card_body(&format!("Customer {i}"), "9876543210", "Galaxy A12"),
        )
        .await;
        assert_eq!(card["bill_no"], card["id"]);
        assert_eq!(card["status"], "pending");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_then_fetch_returns_same_fields(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;

    let body = serde_json::json!({
        "customer_name": "  Meera Iyer ",
        "mobile": "98450 12345",
        "address": "12 MG Road",
        "model": "iPhone 11",
        "complaint": "Battery drains fast",
        "power_on": true,
        "display_ok": true,
        "touch_ok": false,
        "water_damage": true,
        "battery_present": true,
        "sim_tray_present": false,
        "admission_fee": 10000,
        "estimate": 450000,
        "advance": 100000,
        "final_amount": 430000
    });
    let created = create_job_card(app.clone(), &token, body).await;

    let response = get_auth(app, &format!("/api/job-cards/{}", created["id"]), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;

    assert_eq!(fetched["customer_name"], "Meera Iyer");
    assert_eq!(fetched["mobile"], "9845012345");
    assert_eq!(fetched["address"], "12 MG Road");
    assert_eq!(fetched["model"], "iPhone 11");
    assert_eq!(fetched["touch_ok"], false);
    assert_eq!(fetched["water_damage"], true);
    assert_eq!(fetched["estimate"], 450000);
    assert_eq!(fetched["final_amount"], 430000);
    assert_eq!(fetched, created);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_records_the_session_user(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;
    let me = body_json(get_auth(app.clone(), "/api/auth/me", &token).await).await;

    let card = create_job_card(app, &token, job_card_body("Ravi", "9876543210", "Redmi 9")).await;
    assert_eq!(card["created_by"], me["id"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_validates_input(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;

    let mut body = job_card_body("Ravi", "9876543210", "Redmi 9");
    body["mobile"] = serde_json::json!("12-34");
    let response = post_json_auth(app.clone(), "/api/job-cards", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let mut body = job_card_body("Ravi", "9876543210", "Redmi 9");
    body["estimate"] = serde_json::json!(-5);
    let response = post_json_auth(app.clone(), "/api/job-cards", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = job_card_body("   ", "9876543210", "Redmi 9");
    let response = post_json_auth(app, "/api/job-cards", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_unknown_customer_id_is_400(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;

    let mut body = job_card_body("Ravi", "9876543210", "Redmi 9");
    body["customer_id"] = serde_json::json!(999_999);
    let response = post_json_auth(app, "/api/job-cards", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_missing_or_malformed_id(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;

    let response = get_auth(app.clone(), "/api/job-cards/424242", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    let response = get_auth(app, "/api/job-cards/abc", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("abc"));
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Seven cards: pending x3, in-progress x2, completed x2.
async fn seed_seven(app: &axum::Router, token: &str) {
    let statuses = [
        "pending",
        "pending",
        "pending",
        "in-progress",
        "in-progress",
        "completed",
        "completed",
    ];
    for (i, status) in statuses.iter().enumerate() {
        let card = create_job_card(
            app.clone(),
            token,
            job_card_body(&format!("Customer {i}"), &format!("90000000{i:02}"), "Nokia 5.4"),
        )
        .await;
        if *status != "pending" {
            let uri = format!("/api/job-cards/{}/status", card["id"]);
            let response =
                patch_json_auth(app.clone(), &uri, token, serde_json::json!({ "status": status }))
                    .await;
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_filter_example(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;
    seed_seven(&app, &token).await;

    let response = get_auth(
        app,
        "/api/job-cards?status=in-progress&page=1&pageSize=5",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert!(data.iter().all(|c| c["status"] == "in-progress"));
    assert_eq!(json["pagination"]["total"], 2);
    assert_eq!(json["pagination"]["total_pages"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_defaults_and_ordering(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;
    seed_seven(&app, &token).await;

    let json = body_json(get_auth(app, "/api/job-cards", &token).await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 7);
    assert_eq!(json["pagination"]["page"], 1);
    assert_eq!(json["pagination"]["page_size"], 10);

    let ids: Vec<i64> = data.iter().map(|c| c["id"].as_i64().unwrap()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted, "newest first");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_paging_and_clamping(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;
    seed_seven(&app, &token).await;

    let json = body_json(get_auth(app.clone(), "/api/job-cards?page=2&pageSize=3", &token).await)
        .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
    assert_eq!(json["pagination"]["from"], 4);
    assert_eq!(json["pagination"]["to"], 6);
    assert_eq!(json["pagination"]["total_pages"], 3);

    let json =
        body_json(get_auth(app.clone(), "/api/job-cards?page=3&limit=3", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    // Beyond the last page falls back to page 1.
    let json =
        body_json(get_auth(app.clone(), "/api/job-cards?page=9&pageSize=3", &token).await).await;
    assert_eq!(json["pagination"]["page"], 1);
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    let json =
        body_json(get_auth(app, "/api/job-cards?pageSize=5000&page=x", &token).await).await;
    assert_eq!(json["pagination"]["page_size"], 100);
    assert_eq!(json["pagination"]["page"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_search_matches_name_mobile_model_and_bill_no(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;

    let first = create_job_card(
        app.clone(),
        &token,
        job_card_body("Arjun Rao", "9811111111", "OnePlus 7"),
    )
    .await;
    create_job_card(
        app.clone(),
        &token,
        job_card_body("Divya Menon", "9822222222", "Pixel 4a"),
    )
    .await;

    for (term, expected) in [("arjun", "Arjun Rao"), ("982222", "Divya Menon"), ("PIXEL", "Divya Menon")] {
        let json = body_json(
            get_auth(app.clone(), &format!("/api/job-cards?search={term}"), &token).await,
        )
        .await;
        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), 1, "{term}");
        assert_eq!(data[0]["customer_name"], expected);
    }

    let json = body_json(
        get_auth(app, &format!("/api/job-cards?search={}", first["bill_no"]), &token).await,
    )
    .await;
    assert!(json["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["id"] == first["id"]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_rejects_unknown_status_filter(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;

    let response = get_auth(app, "/api/job-cards?status=archived", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_STATUS");
}

// ---------------------------------------------------------------------------
// Status, update, delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn patch_status_to_archived_is_400_naming_it(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;
    let card = create_job_card(app.clone(), &token, job_card_body("Ravi", "9876543210", "Redmi 9")).await;

    let uri = format!("/api/job-cards/{}/status", card["id"]);
    let response = patch_json_auth(app, &uri, &token, serde_json::json!({ "status": "archived" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_STATUS");
    assert!(json["error"].as_str().unwrap().contains("archived"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn patch_status_moves_freely(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;
    let card = create_job_card(app.clone(), &token, job_card_body("Ravi", "9876543210", "Redmi 9")).await;
    let uri = format!("/api/job-cards/{}/status", card["id"]);

    for (sent, stored) in [
        ("completed", "completed"),
        ("pending", "pending"),
        ("pending", "pending"),
        (" IN-PROGRESS ", "in-progress"),
    ] {
        let response =
            patch_json_auth(app.clone(), &uri, &token, serde_json::json!({ "status": sent })).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], stored);
    }

    let response = patch_json_auth(
        app,
        "/api/job-cards/999999/status",
        &token,
        serde_json::json!({ "status": "completed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn put_updates_supplied_fields(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;
    let card = create_job_card(app.clone(), &token, job_card_body("Ravi", "9876543210", "Redmi 9")).await;
    let uri = format!("/api/job-cards/{}", card["id"]);

    let response = put_json_auth(
        app.clone(),
        &uri,
        &token,
        serde_json::json!({ "final_amount": 140000, "status": "Completed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["final_amount"], 140000);
    assert_eq!(json["status"], "completed");
    assert_eq!(json["model"], "Redmi 9");
    assert_eq!(json["bill_no"], card["bill_no"]);

    let response =
        put_json_auth(app.clone(), &uri, &token, serde_json::json!({ "status": "lost" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Explicit null clears; omission keeps.
    let response =
        put_json_auth(app, &uri, &token, serde_json::json!({ "final_amount": null })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["final_amount"].is_null());
    assert_eq!(json["status"], "completed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_then_get_is_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;
    let card = create_job_card(app.clone(), &token, job_card_body("Ravi", "9876543210", "Redmi 9")).await;
    let uri = format!("/api/job-cards/{}", card["id"]);

    assert_eq!(delete_auth(app.clone(), &uri, &token).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(get_auth(app.clone(), &uri, &token).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete_auth(app, &uri, &token).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn summary_counts_per_status(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = login_token(&pool, app.clone(), "frontdesk", false).await;
    seed_seven(&app, &token).await;

    let json = body_json(get_auth(app, "/api/job-cards/summary", &token).await).await;
    assert_eq!(json["pending"], 3);
    assert_eq!(json["in_progress"], 2);
    assert_eq!(json["completed"], 2);
    assert_eq!(json["total"], 7);
}
