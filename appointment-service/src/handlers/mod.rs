pub mod appointments;
pub mod health;
pub mod metrics;

pub use appointments::create_appointment;
pub use health::{health_check, readiness_check};
pub use metrics::metrics_endpoint;
