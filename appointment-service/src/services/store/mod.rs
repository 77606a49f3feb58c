//! Document store for appointment records.
//!
//! The handler only ever creates records; reads exist for health probes and
//! tests.

pub mod mock;
pub mod mongo;

use async_trait::async_trait;
use service_core::error::AppError;

use crate::models::AppointmentRecord;

pub use mock::{MockAppointmentStore, StoredAppointment};
pub use mongo::MongoAppointmentStore;

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Persist one new record and return the identifier the store assigned.
    /// The creation timestamp is set by the store, not the caller.
    async fn create(&self, record: &AppointmentRecord) -> Result<String, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
