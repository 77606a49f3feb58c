mod common;

use appointment_service::services::init_metrics;
use axum::http::StatusCode;
use common::{valid_body, TestApp};

// The Prometheus recorder is process-global, so this binary installs it once
// and keeps every `/metrics` assertion in a single test.
#[tokio::test]
async fn metrics_endpoint_exposes_request_and_submission_metrics() {
    init_metrics().expect("Failed to initialize metrics");
    let app = TestApp::new();

    let created = app.post_appointment(&valid_body()).await;
    assert_eq!(created.status, StatusCode::CREATED);

    let mut invalid = valid_body();
    invalid["nomeCompleto"] = serde_json::json!("Jo");
    let rejected = app.post_appointment(&invalid).await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get_text("/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("http_requests_total"), "{body}");
    assert!(body.contains("http_request_duration_seconds"), "{body}");
    assert!(body.contains("/api/agendamento"), "{body}");
    assert!(
        body.contains("appointment_submissions_total{outcome=\"created\"} 1"),
        "{body}"
    );
    assert!(
        body.contains("appointment_submissions_total{outcome=\"invalid\"} 1"),
        "{body}"
    );
}
