pub mod credentials;
pub mod metrics;
pub mod store;

pub use credentials::StoreCredentials;
pub use metrics::{get_metrics, init_metrics, record_submission, SubmissionOutcome};
pub use store::{AppointmentStore, MockAppointmentStore, MongoAppointmentStore, StoredAppointment};
