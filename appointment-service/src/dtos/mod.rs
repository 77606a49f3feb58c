pub mod appointment;

pub use appointment::{CreateAppointmentRequest, CreateAppointmentResponse};
