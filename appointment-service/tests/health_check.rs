mod common;

use appointment_service::services::MockAppointmentStore;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{valid_body, TestApp, TestServer, FRONTEND_URL};

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::new();

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["service"], "appointment-service");
}

#[tokio::test]
async fn health_check_reports_unreachable_store() {
    let app = TestApp::with_store(MockAppointmentStore::unreachable());

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["status"], "unhealthy");
}

#[tokio::test]
async fn readiness_follows_store_health() {
    let app = TestApp::new();
    assert_eq!(app.get("/ready").await.status, StatusCode::OK);

    app.store.set_healthy(false);
    assert_eq!(app.get("/ready").await.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/agendamento")
        .header(header::ORIGIN, FRONTEND_URL)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        FRONTEND_URL
    );
}

#[tokio::test]
async fn cors_does_not_echo_other_origins() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/agendamento")
        .header(header::ORIGIN, "https://evil.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert!(!response
        .headers
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn server_accepts_submissions_over_http() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/agendamento", server.address))
        .json(&valid_body())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(!body["agendamentoId"].as_str().unwrap().is_empty());
    assert_eq!(server.store.write_count(), 1);
}
