//! End-to-end route tests against a router wired to an in-memory store.
//!
//! Every assertion on the transport status expects 200: the envelope
//! contract reports all outcomes, including failures, in the body.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;
use wardbook_core::RecordStore;

async fn test_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory store");
    let store = RecordStore::new(pool);
    store.init_schema().await.expect("failed to create schema");
    api_rest::app(store)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

fn hosikage() -> Value {
    json!({
        "patient": "Hosikage",
        "admission": "1929-10-09",
        "treatments": "injection, saline",
        "discharge": "1929-10-30"
    })
}

fn andrew() -> Value {
    json!({
        "patient": "Andrew",
        "admission": "1912-06-19",
        "treatments": "band-aid, glucose",
        "discharge": "1912-07-02"
    })
}

/// Serial number of the single row currently in the table.
async fn only_sno(app: &Router) -> i64 {
    let (_, body) = send(app, Method::GET, "/", None).await;
    let rows = body["message"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    rows[0]["sno"].as_i64().unwrap()
}

#[tokio::test]
async fn create_then_list_round_trips() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::POST, "/patients", Some(hosikage())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item added to the cart");

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["message"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["patient_name"], "Hosikage");
    assert_eq!(rows[0]["admission"], "1929-10-09");
    assert_eq!(rows[0]["discharge"], "1929-10-30");
    assert_eq!(rows[0]["treatments"], "injection, saline");
}

#[tokio::test]
async fn list_on_empty_table_is_an_empty_array() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!([]));
}

#[tokio::test]
async fn update_applies_only_the_first_matching_key() {
    let app = test_app().await;
    send(&app, Method::POST, "/patients", Some(andrew())).await;
    let sno = only_sno(&app).await;

    let patch = json!({ "patient": "X", "treatments": "Y" });
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/patients/{sno}"),
        Some(patch.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Details updated");
    assert_eq!(body["Details"], patch);

    // Name changed, treatments untouched.
    let (_, body) = send(&app, Method::GET, "/report/X", None).await;
    assert_eq!(body["message"]["patient_name"], "X");
    assert_eq!(body["message"]["treatments"], "band-aid, glucose");
}

#[tokio::test]
async fn update_of_unknown_id_reports_not_found_with_200() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/patients/999",
        Some(json!({ "patient": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient not found");
}

#[tokio::test]
async fn update_with_no_recognised_key_still_confirms() {
    let app = test_app().await;
    send(&app, Method::POST, "/patients", Some(andrew())).await;
    let sno = only_sno(&app).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/patients/{sno}"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Details updated");

    let (_, body) = send(&app, Method::GET, "/report/Andrew", None).await;
    assert_eq!(body["message"]["patient_name"], "Andrew");
}

#[tokio::test]
async fn report_of_unknown_name_is_a_plain_200() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/report/NoSuchPerson", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient not found");
}

#[tokio::test]
async fn search_returns_every_namesake() {
    let app = test_app().await;
    send(&app, Method::POST, "/patients", Some(andrew())).await;
    send(&app, Method::POST, "/patients", Some(hosikage())).await;
    send(&app, Method::POST, "/patients", Some(andrew())).await;

    let (status, body) = send(&app, Method::GET, "/search/Andrew", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["message"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["patient_name"] == "Andrew"));

    let (status, body) = send(&app, Method::GET, "/search/Zoe", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient not found");
}

#[tokio::test]
async fn delete_of_missing_row_still_echoes_the_id() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::DELETE, "/delete/999", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deleted Successfully");
    assert_eq!(body["item_no"], 999);
}

#[tokio::test]
async fn delete_removes_the_row() {
    let app = test_app().await;
    send(&app, Method::POST, "/patients", Some(andrew())).await;
    let sno = only_sno(&app).await;

    let (_, body) = send(&app, Method::DELETE, &format!("/delete/{sno}"), None).await;
    assert_eq!(body["item_no"], sno);

    let (_, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(body["message"], json!([]));
}

#[tokio::test]
async fn create_with_missing_required_key_answers_200_in_envelope() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/patients",
        Some(json!({ "patient": "Andrew" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("malformed request"), "got: {message}");
}

#[tokio::test]
async fn create_with_unreadable_body_answers_200_in_envelope() {
    let app = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/patients")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("this is not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("malformed request"), "got: {message}");
}

#[tokio::test]
async fn create_with_bad_date_reports_invalid_input() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/patients",
        Some(json!({
            "patient": "Andrew",
            "admission": "yesterday",
            "treatments": null,
            "discharge": "1912-07-02"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("invalid input"), "got: {message}");

    let (_, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(body["message"], json!([]));
}

#[tokio::test]
async fn non_numeric_id_segment_answers_200_in_envelope() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/patients/abc",
        Some(json!({ "patient": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("malformed request"), "got: {message}");
}

#[tokio::test]
async fn field_setters_round_trip() {
    let app = test_app().await;
    send(&app, Method::POST, "/patients", Some(hosikage())).await;
    let sno = only_sno(&app).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/patients/tests/{sno}"),
        Some(json!({ "tests": "CBC, lipid panel" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Ordered tests updated");

    let (_, body) = send(
        &app,
        Method::PUT,
        &format!("/patients/test_results/{sno}"),
        Some(json!({ "results": "within range" })),
    )
    .await;
    assert_eq!(body["message"], "Test results updated");

    let (_, body) = send(
        &app,
        Method::PUT,
        &format!("/patients/prescription/{sno}"),
        Some(json!({ "prescription": "insulin" })),
    )
    .await;
    assert_eq!(body["message"], "Prescription updated");

    let (_, body) = send(
        &app,
        Method::PUT,
        &format!("/patients/payment_sts/{sno}"),
        Some(json!({ "payment": "paid" })),
    )
    .await;
    assert_eq!(body["message"], "Payment status updated");

    let (_, body) = send(&app, Method::GET, "/report/Hosikage", None).await;
    assert_eq!(body["message"]["ordered_tests"], "CBC, lipid panel");
    assert_eq!(body["message"]["test_results"], "within range");
    assert_eq!(body["message"]["prescription"], "insulin");
    assert_eq!(body["message"]["payment_status"], "paid");
}

#[tokio::test]
async fn field_setter_without_value_overwrites_with_null() {
    let app = test_app().await;
    send(&app, Method::POST, "/patients", Some(hosikage())).await;
    let sno = only_sno(&app).await;

    send(
        &app,
        Method::PUT,
        &format!("/patients/tests/{sno}"),
        Some(json!({ "tests": "CBC" })),
    )
    .await;
    let (_, body) = send(
        &app,
        Method::PUT,
        &format!("/patients/tests/{sno}"),
        Some(json!({})),
    )
    .await;
    assert_eq!(body["message"], "Ordered tests updated");

    let (_, body) = send(&app, Method::GET, "/report/Hosikage", None).await;
    assert_eq!(body["message"]["ordered_tests"], Value::Null);
}

#[tokio::test]
async fn field_setter_on_unknown_id_reports_not_found() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/patients/prescription/999",
        Some(json!({ "prescription": "insulin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient not found");
}

#[tokio::test]
async fn health_reports_alive() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}
