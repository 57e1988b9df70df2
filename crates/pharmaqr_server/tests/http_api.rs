use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pharmaqr_core::db::open_db_in_memory;
use pharmaqr_server::{build_router, AppState, Config};
use serde_json::{json, Value};
use tower::ServiceExt;

fn router_with(vars: &[(&str, &str)]) -> Router {
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    let config = Config::from_lookup(
        |key| {
            vars.iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.clone())
        },
        PathBuf::from("/tmp/pharmaqr-test"),
    )
    .unwrap();
    let conn = open_db_in_memory().unwrap();
    build_router(AppState::new(config, conn))
}

fn router() -> Router {
    router_with(&[])
}

fn paracetamol() -> Value {
    json!({
        "name": "Paracetamol",
        "manufacturer": "ABC Pharma",
        "batch_number": "BTH001",
        "mfg_date": "2024-01-01",
        "expiry_date": "2025-01-01",
        "composition": "Paracetamol 500mg",
        "dosage": "1 tablet twice daily",
        "use_cases": "Fever, pain relief"
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn post_json(app: &Router, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/tablets")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .uri(uri)
        .header("host", "192.168.1.50:5000")
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = get(app, uri).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create(app: &Router) -> String {
    let (status, body) = post_json(app, &paracetamol()).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["tablet_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_then_fetch_returns_submitted_fields() {
    let app = router();

    let (status, created) = post_json(&app, &paracetamol()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "Tablet created successfully");
    let id = created["tablet_id"].as_str().unwrap();

    let (status, fetched) = get_json(&app, &format!("/api/tablets/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], id);
    for (key, value) in paracetamol().as_object().unwrap() {
        assert_eq!(&fetched[key], value, "field {key}");
    }
    assert_eq!(fetched["side_effects"], "");
    assert_eq!(fetched["precautions"], "");
    assert_eq!(fetched["storage_instructions"], "");
    assert!(fetched.get("created_at").is_none());
}

#[tokio::test]
async fn missing_field_is_a_structured_bad_request() {
    let app = router();
    let mut body = paracetamol();
    body.as_object_mut().unwrap().remove("batch_number");

    let (status, error) = post_json(&app, &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["success"], false);
    assert_eq!(error["kind"], "missing_field");
    assert!(error["error"].as_str().unwrap().contains("batch_number"));
}

#[tokio::test]
async fn invalid_date_is_a_structured_bad_request() {
    let app = router();
    let mut body = paracetamol();
    body["expiry_date"] = json!("2024-02-30");

    let (status, error) = post_json(&app, &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["kind"], "invalid_date");
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let app = router();
    let request = Request::builder()
        .method("POST")
        .uri("/api/tablets")
        .body(Body::empty())
        .unwrap();

    let (status, bytes) = send(&app, request).await;
    let error: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "No JSON data received");
    assert_eq!(error["kind"], "malformed_payload");
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() {
    let app = router();

    let (status, error) =
        get_json(&app, "/api/tablets/3f0b7c1e-9a2d-4e6f-8b5a-1c2d3e4f5a6b").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["kind"], "not_found");

    let (status, error) = get_json(&app, "/api/tablets/not-a-uuid").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["kind"], "not_found");
}

#[tokio::test]
async fn qrcode_points_at_info_page_on_request_host() {
    let app = router();
    let id = create(&app).await;

    let (status, body) = get_json(&app, &format!("/api/qrcode/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["qr_data"], format!("http://192.168.1.50:5000/info/{id}"));
    assert!(body["qr_code"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
    assert_eq!(body["tablet_info"]["name"], "Paracetamol");
    assert_eq!(body["tablet_info"]["id"], id.as_str());
}

#[tokio::test]
async fn qrcode_keeps_scheme_reported_by_proxy() {
    let app = router();
    let id = create(&app).await;
    let request = Request::builder()
        .uri(format!("/api/qrcode/{id}"))
        .header("host", "labels.example")
        .header("x-forwarded-proto", "https")
        .body(Body::empty())
        .unwrap();

    let (status, bytes) = send(&app, request).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["qr_data"], format!("https://labels.example/info/{id}"));
}

#[tokio::test]
async fn qrcode_prefers_configured_public_base_url() {
    let app = router_with(&[("PHARMAQR_PUBLIC_BASE_URL", "https://labels.example/")]);
    let id = create(&app).await;

    let (status, body) = get_json(&app, &format!("/api/qrcode/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["qr_data"], format!("https://labels.example/info/{id}"));
}

#[tokio::test]
async fn qrcode_for_unknown_id_is_not_found() {
    let app = router();
    let (status, body) =
        get_json(&app, "/api/qrcode/3f0b7c1e-9a2d-4e6f-8b5a-1c2d3e4f5a6b").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn info_page_renders_record_and_expired_banner() {
    let app = router();
    let id = create(&app).await;

    let (status, bytes) = get(&app, &format!("/info/{id}")).await;
    let html = String::from_utf8(bytes).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Paracetamol"));
    assert!(html.contains("BTH001"));
    assert!(html.contains("01 January 2025"));
    // expiry 2025-01-01 is in the past for any current run
    assert!(html.contains("DO NOT USE"));
}

#[tokio::test]
async fn info_page_for_unknown_id_is_an_html_404() {
    let app = router();
    let (status, bytes) = get(&app, "/info/not-a-uuid").await;
    let html = String::from_utf8(bytes).unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("<h1>Error</h1>"));
}

#[tokio::test]
async fn info_json_exposes_display_model() {
    let app = router();
    let mut body = paracetamol();
    body["expiry_date"] = json!("2999-12-31");
    let (_, created) = post_json(&app, &body).await;
    let id = created["tablet_id"].as_str().unwrap();

    let (status, model) = get_json(&app, &format!("/api/info/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(model["status"], "ok");
    assert_eq!(model["expiry_date_display"], "31 December 2999");
    assert!(model["days_to_expiry"].as_i64().unwrap() > 30);
}

#[tokio::test]
async fn index_serves_entry_form_posting_to_api() {
    let app = router();
    let (status, bytes) = get(&app, "/").await;
    let html = String::from_utf8(bytes).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<form id=\"tabletForm\" action=\"/api/tablets\""));
    assert!(html.contains("fetch('/api/tablets'"));
    assert!(html.contains("'/api/qrcode/'"));
    for field in pharmaqr_core::REQUIRED_FIELDS {
        assert!(html.contains(&format!("name=\"{field}\"")), "form lacks {field}");
    }
}

#[tokio::test]
async fn health_reports_version() {
    let app = router();
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], pharmaqr_core::core_version());
}

#[test]
fn state_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Arc<AppState>>();
}
