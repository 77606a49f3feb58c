//! Shared setup for appointment-service integration tests.

#![allow(dead_code)]

use appointment_service::config::{AppointmentConfig, CorsConfig, StoreConfig, DEFAULT_EXAM_DATE};
use appointment_service::services::MockAppointmentStore;
use appointment_service::startup::{build_router, AppState, Application};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use service_core::config::Config as CoreConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const FRONTEND_URL: &str = "https://clinica.example.com";

pub fn test_config() -> AppointmentConfig {
    AppointmentConfig {
        common: CoreConfig { port: 0 },
        store: StoreConfig {
            credentials_path: PathBuf::from("unused-in-tests.json"),
            database: format!("agendamento_test_{}", uuid::Uuid::new_v4()),
        },
        cors: CorsConfig {
            frontend_url: Some(FRONTEND_URL.to_string()),
        },
        exam_date: DEFAULT_EXAM_DATE.to_string(),
    }
}

pub fn valid_body() -> serde_json::Value {
    serde_json::json!({
        "nomeCompleto": "Jose Silva",
        "telefone": "1234567890",
        "dataNascimento": "1990-01-01",
        "horario": "10:00"
    })
}

/// Router wired to an in-memory store, driven with `oneshot`.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MockAppointmentStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: serde_json::Value,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(MockAppointmentStore::new())
    }

    pub fn with_store(store: MockAppointmentStore) -> Self {
        let store = Arc::new(store);
        let state = AppState {
            config: test_config(),
            store: store.clone(),
        };
        let router = build_router(state).expect("Failed to build router");
        Self { router, store }
    }

    pub async fn post_appointment(&self, body: &serde_json::Value) -> TestResponse {
        self.post_raw(body.to_string(), "application/json").await
    }

    pub async fn post_raw(&self, body: String, content_type: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri("/api/agendamento")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// GET a non-JSON endpoint and return its body as text.
    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// A real server on a random port, for tests that go over the network.
pub struct TestServer {
    pub address: String,
    pub store: Arc<MockAppointmentStore>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let store = Arc::new(MockAppointmentStore::new());
        let app = Application::build_with_store(test_config(), store.clone())
            .await
            .expect("Failed to build test application");

        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestServer { address, store }
    }
}
