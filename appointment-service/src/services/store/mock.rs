use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::AppointmentStore;
use crate::models::AppointmentRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredAppointment {
    pub id: String,
    pub record: AppointmentRecord,
    pub created_at: DateTime<Utc>,
}

/// In-memory store for tests. Assigns ids the same shape MongoDB does.
pub struct MockAppointmentStore {
    healthy: AtomicBool,
    fail_writes: AtomicBool,
    records: Mutex<Vec<StoredAppointment>>,
}

impl MockAppointmentStore {
    pub fn new() -> Self {
        Self {
            healthy: AtomicBool::new(true),
            fail_writes: AtomicBool::new(false),
            records: Mutex::new(Vec::new()),
        }
    }

    /// A store whose writes and pings fail, as if the server were unreachable.
    pub fn unreachable() -> Self {
        let store = Self::new();
        store.set_fail_writes(true);
        store.set_healthy(false);
        store
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<StoredAppointment> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn write_count(&self) -> usize {
        self.records().len()
    }
}

impl Default for MockAppointmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppointmentStore for MockAppointmentStore {
    async fn create(&self, record: &AppointmentRecord) -> Result<String, AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "[MOCK] document store unreachable"
            )));
        }

        let id = ObjectId::new().to_hex();
        let mut records = self
            .records
            .lock()
            .map_err(|_| AppError::InternalError(anyhow::anyhow!("mock store lock poisoned")))?;
        records.push(StoredAppointment {
            id: id.clone(),
            record: record.clone(),
            created_at: Utc::now(),
        });

        tracing::info!(appointment_id = %id, "[MOCK] Appointment stored");
        Ok(id)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::ServiceUnavailable)
        }
    }
}
