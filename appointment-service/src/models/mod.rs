pub mod appointment;

pub use appointment::{
    APPOINTMENTS_COLLECTION, AppointmentRecord, AppointmentRequest, AppointmentStatus,
    CREATED_AT_FIELD,
};
