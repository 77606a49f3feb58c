use chrono::NaiveDate;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

/// Exam date stamped on every appointment unless `EXAM_DATE` overrides it.
pub const DEFAULT_EXAM_DATE: &str = "2025-07-19";

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub store: StoreConfig,
    pub cors: CorsConfig,
    pub exam_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON credential bundle for the document store.
    pub credentials_path: PathBuf,
    /// Database used when the credential bundle does not name one.
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Origin allowed to call the API. Unset allows any origin.
    pub frontend_url: Option<String>,
}

impl AppointmentConfig {
    pub fn load() -> Result<Self, AppError> {
        let mut common_config = core_config::Config::load()?;
        if let Some(port) = parse_port(env::var("PORT").ok())? {
            common_config.port = port;
        }
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let config = AppointmentConfig {
            common: common_config,
            store: StoreConfig {
                credentials_path: PathBuf::from(get_env("STORE_CREDENTIALS_PATH", None, is_prod)?),
                database: get_env("MONGODB_DATABASE", Some("agendamento_db"), is_prod)?,
            },
            cors: CorsConfig {
                frontend_url: env::var("FRONTEND_URL").ok().filter(|v| !v.is_empty()),
            },
            exam_date: get_env("EXAM_DATE", Some(DEFAULT_EXAM_DATE), is_prod)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        NaiveDate::parse_from_str(&self.exam_date, "%Y-%m-%d").map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "EXAM_DATE '{}' is not a YYYY-MM-DD date: {}",
                self.exam_date,
                e
            ))
        })?;
        Ok(())
    }
}

/// `PORT`, when set, overrides `APP__PORT`.
fn parse_port(raw: Option<String>) -> Result<Option<u16>, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("PORT '{}' is not a valid port: {}", value, e))
        }),
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
