use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Client-facing message for any 400 response.
pub const INVALID_DATA_MESSAGE: &str = "Dados inválidos.";

/// Client-facing message for any 5xx response. Internal details never leave the process.
pub const INTERNAL_ERROR_MESSAGE: &str = "Ocorreu um erro interno. Tente novamente.";

/// Details key used when the request body could not be parsed at all.
pub const BODY_FIELD: &str = "body";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Service Unavailable")]
    ServiceUnavailable,

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

/// Flatten validator errors into `field -> [messages]`.
///
/// Errors without a message fall back to their code so that every invalid
/// field carries at least one entry.
pub fn field_errors(errors: &validator::ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, details) = match &self {
            AppError::ValidationError(errs) => {
                tracing::warn!(fields = ?field_errors(errs), "Request failed validation");
                (StatusCode::BAD_REQUEST, Some(field_errors(errs)))
            }
            AppError::InvalidBody(msg) => {
                tracing::warn!(reason = %msg, "Request body rejected");
                let mut details = BTreeMap::new();
                details.insert(BODY_FIELD.to_string(), vec![msg.clone()]);
                (StatusCode::BAD_REQUEST, Some(details))
            }
            AppError::ServiceUnavailable => (StatusCode::SERVICE_UNAVAILABLE, None),
            AppError::InternalError(err)
            | AppError::DatabaseError(err)
            | AppError::ConfigError(err) => {
                tracing::error!(error = ?err, "{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };

        let error = if status == StatusCode::BAD_REQUEST {
            INVALID_DATA_MESSAGE
        } else {
            INTERNAL_ERROR_MESSAGE
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                details,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_maps_to_400_with_field_details() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "nomeCompleto",
            ValidationError::new("length").with_message("too short".into()),
        );

        let res = AppError::ValidationError(errors).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body = body_json(res).await;
        assert_eq!(body["error"], INVALID_DATA_MESSAGE);
        assert_eq!(body["details"]["nomeCompleto"][0], "too short");
    }

    #[test]
    fn message_falls_back_to_code() {
        let mut errors = ValidationErrors::new();
        errors.add("telefone", ValidationError::new("length"));

        let map = field_errors(&errors);
        assert_eq!(map["telefone"], vec!["length".to_string()]);
    }

    #[tokio::test]
    async fn invalid_body_is_keyed_under_body() {
        let res = AppError::InvalidBody("expected value".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body = body_json(res).await;
        assert_eq!(body["details"][BODY_FIELD][0], "expected value");
    }

    #[tokio::test]
    async fn database_error_does_not_leak_details() {
        let res =
            AppError::DatabaseError(anyhow::anyhow!("connection refused at 10.0.0.5")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(res).await;
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
        assert!(body.get("details").is_none());
        assert!(!body.to_string().contains("10.0.0.5"));
    }

    #[test]
    fn service_unavailable_maps_to_503() {
        let res = AppError::ServiceUnavailable.into_response();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
