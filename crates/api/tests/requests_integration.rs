//! Integration tests for the inventory request lifecycle.
//!
//! Covers submission rules (duplicate-pending block, permanent rejection
//! block), the approval flow with stock reservation and assignment, the
//! sibling cascade, idempotent terminal transitions and deletion.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    available_qty, assigned_quantity, create_admin, create_employee, create_test_app,
    create_test_pool, delete_request_with_auth, get_request_with_auth, json_request_with_auth,
    parse_response_body, request_status, run_migrations, seed_item, seed_request, test_config,
    unique_suffix,
};
use serde_json::json;
use tower::ServiceExt;

fn submit_body(employee: &common::TestEmployee, item_name: &str, request_type: &str) -> serde_json::Value {
    json!({
        "employeeName": employee.name,
        "deskNumber": employee.desk_number,
        "inventoryName": item_name,
        "requestType": request_type,
        "reason": "Need upgrade"
    })
}

#[tokio::test]
async fn test_submit_request_success() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;
    let item_name = format!("Laptop {}", unique_suffix());
    seed_item(&pool, &item_name, 10, 10).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/requests",
        &admin.token,
        &submit_body(&employee, &item_name, "new"),
    );
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    assert_eq!(body["request"]["status"], "pending");
    assert_eq!(body["request"]["requestType"], "new");
    assert_eq!(body["request"]["employee"]["name"], employee.name);
    assert_eq!(body["request"]["inventory"]["name"], item_name);
}

#[tokio::test]
async fn test_submit_request_resolution_is_case_insensitive() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;
    let item_name = format!("Monitor {}", unique_suffix());
    seed_item(&pool, &item_name, 5, 5).await;

    let body = json!({
        "employeeName": employee.name.to_uppercase(),
        "deskNumber": employee.desk_number.to_lowercase(),
        "inventoryName": item_name.to_uppercase(),
        "requestType": "Exchange",
        "reason": "Damaged item"
    });
    let request = json_request_with_auth(Method::POST, "/api/v1/requests", &admin.token, &body);
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    assert_eq!(body["request"]["requestType"], "exchange");
}

#[tokio::test]
async fn test_submit_request_unknown_employee() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let item_name = format!("Keyboard {}", unique_suffix());
    seed_item(&pool, &item_name, 5, 5).await;

    let body = json!({
        "employeeName": "Nobody At All",
        "deskNumber": "D-0000",
        "inventoryName": item_name,
        "requestType": "new",
        "reason": "Need upgrade"
    });
    let request = json_request_with_auth(Method::POST, "/api/v1/requests", &admin.token, &body);
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submit_request_unknown_item() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/requests",
        &admin.token,
        &submit_body(&employee, "No Such Item", "new"),
    );
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submit_request_requires_auth() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    use axum::{body::Body, http::Request};
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/requests")
        .header("Content-Type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_pending_is_blocked() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;
    let item_name = format!("Dock {}", unique_suffix());
    seed_item(&pool, &item_name, 5, 5).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/requests",
        &admin.token,
        &submit_body(&employee, &item_name, "new"),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same pair again, different type and reason: still blocked.
    let body = json!({
        "employeeName": employee.name,
        "deskNumber": employee.desk_number,
        "inventoryName": item_name,
        "requestType": "exchange",
        "reason": "Other"
    });
    let request = json_request_with_auth(Method::POST, "/api/v1/requests", &admin.token, &body);
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "conflict");
    assert!(body["message"].as_str().unwrap().contains("pending"));
}

#[tokio::test]
async fn test_rejected_pair_is_permanently_blocked() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;
    let item_name = format!("Headset {}", unique_suffix());
    let item_id = seed_item(&pool, &item_name, 5, 5).await;

    let request_id = seed_request(&pool, employee.id, item_id, "new", "pending").await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/requests/{}/status", request_id),
        &admin.token,
        &json!({"status": "rejected"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Any new submission for the exact pair fails from now on.
    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/requests",
        &admin.token,
        &submit_body(&employee, &item_name, "new"),
    );
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "conflict");
    assert!(body["message"].as_str().unwrap().contains("rejected"));

    // A different item for the same employee is unaffected.
    let other_item = format!("Mouse {}", unique_suffix());
    seed_item(&pool, &other_item, 5, 5).await;
    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/requests",
        &admin.token,
        &submit_body(&employee, &other_item, "new"),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_approved_pair_allows_future_requests() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;
    let item_name = format!("Webcam {}", unique_suffix());
    let item_id = seed_item(&pool, &item_name, 5, 5).await;

    let request_id = seed_request(&pool, employee.id, item_id, "new", "pending").await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/requests/{}/status", request_id),
        &admin.token,
        &json!({"status": "approved"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/requests",
        &admin.token,
        &submit_body(&employee, &item_name, "new"),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_approve_new_reserves_stock_and_assigns() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;
    let item_name = format!("Pavilion {}", unique_suffix());
    let item_id = seed_item(&pool, &item_name, 10, 10).await;

    let request_id = seed_request(&pool, employee.id, item_id, "new", "pending").await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/requests/{}/status", request_id),
        &admin.token,
        &json!({"status": "approved"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["request"]["status"], "approved");

    assert_eq!(available_qty(&pool, item_id).await, 9);
    assert_eq!(assigned_quantity(&pool, employee.id, item_id).await, Some(1));
}

#[tokio::test]
async fn test_approve_exchange_leaves_counters_alone() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;
    let item_name = format!("Chair {}", unique_suffix());
    let item_id = seed_item(&pool, &item_name, 4, 2).await;

    let request_id = seed_request(&pool, employee.id, item_id, "exchange", "pending").await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/requests/{}/status", request_id),
        &admin.token,
        &json!({"status": "approved"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(available_qty(&pool, item_id).await, 2);
    assert_eq!(assigned_quantity(&pool, employee.id, item_id).await, None);
    assert_eq!(request_status(&pool, request_id).await, "approved");
}

#[tokio::test]
async fn test_no_double_spend_on_last_unit() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let first = create_employee(&pool, &config).await;
    let second = create_employee(&pool, &config).await;
    let item_name = format!("Last Unit {}", unique_suffix());
    let item_id = seed_item(&pool, &item_name, 1, 1).await;

    let first_request = seed_request(&pool, first.id, item_id, "new", "pending").await;
    let second_request = seed_request(&pool, second.id, item_id, "new", "pending").await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/requests/{}/status", first_request),
        &admin.token,
        &json!({"status": "approved"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The second approval finds no stock; the request stays pending.
    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/requests/{}/status", second_request),
        &admin.token,
        &json!({"status": "approved"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "insufficient_stock");

    assert_eq!(available_qty(&pool, item_id).await, 0);
    assert_eq!(request_status(&pool, second_request).await, "pending");
    assert_eq!(assigned_quantity(&pool, second.id, item_id).await, None);
}

#[tokio::test]
async fn test_approval_cascade_rejects_sibling_pendings() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;
    let item_name = format!("Cascade {}", unique_suffix());
    let item_id = seed_item(&pool, &item_name, 5, 5).await;

    // Two pendings for the same pair, as a submission race would leave.
    let first = seed_request(&pool, employee.id, item_id, "new", "pending").await;
    let second = seed_request(&pool, employee.id, item_id, "new", "pending").await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/requests/{}/status", first),
        &admin.token,
        &json!({"status": "approved"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(request_status(&pool, first).await, "approved");
    assert_eq!(request_status(&pool, second).await, "rejected");

    // Only the approved request consumed stock.
    assert_eq!(available_qty(&pool, item_id).await, 4);
    assert_eq!(assigned_quantity(&pool, employee.id, item_id).await, Some(1));
}

#[tokio::test]
async fn test_terminal_transition_is_idempotent() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;
    let item_name = format!("Idempotent {}", unique_suffix());
    let item_id = seed_item(&pool, &item_name, 3, 3).await;

    let request_id = seed_request(&pool, employee.id, item_id, "new", "pending").await;

    for expected_qty in [2, 2] {
        let request = json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/requests/{}/status", request_id),
            &admin.token,
            &json!({"status": "approved"}),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        // Stock is decremented exactly once across both calls.
        assert_eq!(available_qty(&pool, item_id).await, expected_qty);
    }

    assert_eq!(assigned_quantity(&pool, employee.id, item_id).await, Some(1));
}

#[tokio::test]
async fn test_cross_terminal_transition_is_rejected() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;
    let item_name = format!("Terminal {}", unique_suffix());
    let item_id = seed_item(&pool, &item_name, 3, 3).await;

    let request_id = seed_request(&pool, employee.id, item_id, "new", "approved").await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/requests/{}/status", request_id),
        &admin.token,
        &json!({"status": "rejected"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "conflict");
    assert_eq!(request_status(&pool, request_id).await, "approved");
}

#[tokio::test]
async fn test_reject_does_not_refund_stock() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;
    let item_name = format!("NoRefund {}", unique_suffix());
    let item_id = seed_item(&pool, &item_name, 7, 7).await;

    let request_id = seed_request(&pool, employee.id, item_id, "new", "pending").await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/requests/{}/status", request_id),
        &admin.token,
        &json!({"status": "rejected"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    // Nothing was reserved for a pending request, so nothing moves.
    assert_eq!(available_qty(&pool, item_id).await, 7);
    assert_eq!(assigned_quantity(&pool, employee.id, item_id).await, None);
}

#[tokio::test]
async fn test_update_status_validates_target() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;
    let item_name = format!("Target {}", unique_suffix());
    let item_id = seed_item(&pool, &item_name, 3, 3).await;
    let request_id = seed_request(&pool, employee.id, item_id, "new", "pending").await;

    for bad in ["pending", "cancelled", ""] {
        let request = json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/requests/{}/status", request_id),
            &admin.token,
            &json!({"status": bad}),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    assert_eq!(request_status(&pool, request_id).await, "pending");
}

#[tokio::test]
async fn test_update_status_unknown_request() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());
    let admin = create_admin(&pool, &config).await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/requests/{}/status", uuid::Uuid::new_v4()),
        &admin.token,
        &json!({"status": "approved"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_requests_resolves_names_newest_first() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;
    let first_item = format!("Older {}", unique_suffix());
    let second_item = format!("Newer {}", unique_suffix());
    let first_id = seed_item(&pool, &first_item, 3, 3).await;
    let second_id = seed_item(&pool, &second_item, 3, 3).await;

    seed_request(&pool, employee.id, first_id, "new", "pending").await;
    // Distinct created_at timestamps so the ordering assertion is stable.
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    seed_request(&pool, employee.id, second_id, "exchange", "pending").await;

    let request = get_request_with_auth("/api/v1/requests", &admin.token);
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    let list = body.as_array().unwrap();

    let ours: Vec<&serde_json::Value> = list
        .iter()
        .filter(|r| r["employee"]["name"] == employee.name.as_str())
        .collect();
    assert_eq!(ours.len(), 2);
    // Newest first.
    assert_eq!(ours[0]["inventory"]["name"], second_item);
    assert_eq!(ours[1]["inventory"]["name"], first_item);
    assert_eq!(ours[0]["employee"]["deskNumber"], employee.desk_number);
}

#[tokio::test]
async fn test_delete_request_is_pure_removal() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;
    let item_name = format!("Removable {}", unique_suffix());
    let item_id = seed_item(&pool, &item_name, 6, 5).await;

    // Approved request: deletion must not touch stock.
    let request_id = seed_request(&pool, employee.id, item_id, "new", "approved").await;

    let request = delete_request_with_auth(
        &format!("/api/v1/requests/{}", request_id),
        &admin.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(available_qty(&pool, item_id).await, 5);

    // Deleting again: gone.
    let request = delete_request_with_auth(
        &format!("/api/v1/requests/{}", request_id),
        &admin.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_form_data_lists_options() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let employee = create_employee(&pool, &config).await;
    let item_name = format!("FormData {}", unique_suffix());
    seed_item(&pool, &item_name, 2, 2).await;

    let request = get_request_with_auth("/api/v1/requests/form-data", &employee.token);
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;

    assert_eq!(body["requestTypes"], json!(["new", "exchange"]));
    assert_eq!(
        body["reasonOptions"],
        json!(["Damaged item", "Lost item", "Need upgrade", "Other"])
    );
    let employees = body["employees"].as_array().unwrap();
    assert!(employees
        .iter()
        .any(|e| e["name"] == employee.name.as_str()));
    let inventory = body["inventory"].as_array().unwrap();
    assert!(inventory.iter().any(|i| i["name"] == item_name.as_str()));
}

#[tokio::test]
async fn test_full_request_lifecycle_scenario() {
    // Item X: total 10, available 10. Employee E requests X ("Need
    // upgrade") -> pending. Admin approves -> available 9, E holds {X, 1}.
    // A second pending request for (E, X) can still be rejected afterwards
    // without touching the counters again.
    let pool = create_test_pool().await;
    run_migrations(&pool).await;

    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());

    let admin = create_admin(&pool, &config).await;
    let employee = create_employee(&pool, &config).await;
    let item_name = format!("Scenario X {}", unique_suffix());
    let item_id = seed_item(&pool, &item_name, 10, 10).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/requests",
        &employee.token,
        &submit_body(&employee, &item_name, "new"),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    let request_id = body["request"]["id"].as_str().unwrap().to_string();

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/requests/{}/status", request_id),
        &admin.token,
        &json!({"status": "approved"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(available_qty(&pool, item_id).await, 9);
    assert_eq!(assigned_quantity(&pool, employee.id, item_id).await, Some(1));

    // A stray second pending for the same pair still ends in rejected.
    let stray = seed_request(&pool, employee.id, item_id, "new", "pending").await;
    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/requests/{}/status", stray),
        &admin.token,
        &json!({"status": "rejected"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(available_qty(&pool, item_id).await, 9);
    assert_eq!(request_status(&pool, stray).await, "rejected");
}
