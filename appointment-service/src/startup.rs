//! Application startup and lifecycle management.
//!
//! `Application::build` does everything that can fail before the first
//! request: credential loading, the store connection and the listener bind.

use crate::config::AppointmentConfig;
use crate::handlers::{create_appointment, health_check, metrics_endpoint, readiness_check};
use crate::services::{AppointmentStore, MongoAppointmentStore, StoreCredentials};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppointmentConfig,
    pub store: Arc<dyn AppointmentStore>,
}

/// Build the HTTP router with the full middleware stack.
pub fn build_router(state: AppState) -> Result<Router, AppError> {
    let cors = cors_layer(state.config.cors.frontend_url.as_deref())?;

    let router = Router::new()
        .route("/api/agendamento", post(create_appointment))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
        .with_state(state);

    Ok(router)
}

fn cors_layer(frontend_url: Option<&str>) -> Result<CorsLayer, AppError> {
    let origin = match frontend_url {
        Some(url) => {
            let value = url.parse::<HeaderValue>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Invalid FRONTEND_URL '{}': {}", url, e))
            })?;
            AllowOrigin::list([value])
        }
        None => AllowOrigin::any(),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Load credentials, connect to MongoDB and bind the listener.
    pub async fn build(config: AppointmentConfig) -> Result<Self, AppError> {
        let credentials = StoreCredentials::from_file(&config.store.credentials_path)?;

        let store = MongoAppointmentStore::connect(&credentials, &config.store.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;

        Self::build_with_store(config, Arc::new(store)).await
    }

    /// Build around an already-initialized store.
    pub async fn build_with_store(
        config: AppointmentConfig,
        store: Arc<dyn AppointmentStore>,
    ) -> Result<Self, AppError> {
        match config.cors.frontend_url.as_deref() {
            Some(origin) => tracing::info!(origin = %origin, "Allowing cross-origin requests"),
            None => tracing::warn!("FRONTEND_URL is not set; allowing requests from any origin"),
        }

        let state = AppState {
            config: config.clone(),
            store,
        };
        let router = build_router(state)?;

        // Port 0 picks a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Appointment service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}
