mod common;

use common::{backend_request, TestApp, TEST_TOKEN};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn classify_without_splits_is_rejected_before_any_backend_call() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/requests/r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_request("r-1", "submitted", 1000.0)))
        .expect(0)
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/requests/r-1/classify"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backend)
        .await;

    let response = app
        .client
        .post(app.url("/api/requests/r-1/classify"))
        .json(&json!({ "splits": [] }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 422);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["errors"][0], "At least one expense split is required");
}

#[tokio::test]
async fn unbalanced_splits_never_reach_the_classify_endpoint() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/requests/r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_request("r-1", "submitted", 1000.0)))
        .expect(1)
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/requests/r-1/classify"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backend)
        .await;

    let response = app
        .client
        .post(app.url("/api/requests/r-1/classify"))
        .json(&json!({
            "splits": [
                { "expenseItemId": "ei-1", "amount": 600.0 },
                { "expenseItemId": "ei-2", "amount": 300.0 }
            ]
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn balanced_classification_is_forwarded_with_bearer_token() {
    let app = TestApp::spawn().await;
    let bearer = format!("Bearer {}", TEST_TOKEN);

    Mock::given(method("GET"))
        .and(path("/api/v1/requests/r-1"))
        .and(header("authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_request("r-1", "submitted", 1000.0)))
        .expect(1)
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/requests/r-1/classify"))
        .and(header("authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_request("r-1", "REGISTERED", 1000.0)))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app
        .client
        .post(app.url("/api/requests/r-1/classify"))
        .json(&json!({
            "splits": [
                { "expenseItemId": "ei-1", "amount": 600.0 },
                { "expenseItemId": "ei-2", "amount": 400.0 }
            ],
            "comment": "Split across two items"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let request: serde_json::Value = response.json().await.unwrap();
    assert_eq!(request["status"], "classified");
    assert_eq!(request["requestNumber"], "REQ-001");
}

#[tokio::test]
async fn illegal_status_change_does_not_patch_the_backend() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/requests/r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_request("r-1", "draft", 1000.0)))
        .mount(&app.backend)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/requests/r-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backend)
        .await;

    let response = app
        .client
        .post(app.url("/api/requests/r-1/status"))
        .json(&json!({ "status": "paid-full" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn legal_status_change_patches_the_backend() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/requests/r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_request("r-1", "draft", 1000.0)))
        .mount(&app.backend)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/requests/r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_request("r-1", "submitted", 1000.0)))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app
        .client
        .post(app.url("/api/requests/r-1/status"))
        .json(&json!({ "status": "submitted" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let request: serde_json::Value = response.json().await.unwrap();
    assert_eq!(request["status"], "submitted");
}

#[tokio::test]
async fn approval_requires_balanced_allocations() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/requests/r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_request("r-1", "allocated", 1000.0)))
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/requests/r-1/distributor-action"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backend)
        .await;

    let response = app
        .client
        .post(app.url("/api/requests/r-1/approve"))
        .json(&json!({
            "allocations": [
                { "contractId": "c-1", "amount": 250.0, "currency": "KZT", "priority": "high" }
            ]
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 422);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["errors"][0]
        .as_str()
        .unwrap()
        .contains("does not match request amount"));
}

#[tokio::test]
async fn return_requires_a_comment() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/requests/r-1/reject"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backend)
        .await;

    let response = app
        .client
        .post(app.url("/api/requests/r-1/return"))
        .json(&json!({ "comment": "   " }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn successful_submit_notifies_the_registrar() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/requests/r-1/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_request("r-1", "SUBMITTED", 1000.0)))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app
        .client
        .post(app.url("/api/requests/r-1/submit"))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let notifications: Vec<serde_json::Value> = app
        .client
        .get(app.url("/api/notifications?role=registrar"))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["kind"], "success");
    assert_eq!(notifications[0]["requestId"], "r-1");

    let executor_view: Vec<serde_json::Value> = app
        .client
        .get(app.url("/api/notifications?role=executor"))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();
    assert!(executor_view.is_empty());
}

#[tokio::test]
async fn backend_not_found_maps_to_not_found() {
    let app = TestApp::spawn().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/requests/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Request not found" })))
        .mount(&app.backend)
        .await;

    let response = app
        .client
        .get(app.url("/api/requests/missing"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Request not found");
}
