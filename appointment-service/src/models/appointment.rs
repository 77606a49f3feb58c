use serde::{Deserialize, Serialize};

/// Collection holding every submitted appointment.
pub const APPOINTMENTS_COLLECTION: &str = "agendamentos";

/// Field the store fills with its own clock when the record is written.
pub const CREATED_AT_FIELD: &str = "criadoEm";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    #[serde(rename = "Pendente")]
    Pending,
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "Pendente"),
        }
    }
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRequest {
    pub full_name: String,
    pub phone: String,
    pub birth_date: String,
    pub time_slot: String,
}

/// The document written to the store. `criadoEm` is not part of it: the
/// store assigns that at write time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentRecord {
    #[serde(rename = "nomeCompleto")]
    pub full_name: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(rename = "dataNascimento")]
    pub birth_date: String,
    #[serde(rename = "horario")]
    pub time_slot: String,
    #[serde(rename = "dataExame")]
    pub exam_date: String,
    pub status: AppointmentStatus,
}

impl AppointmentRecord {
    pub fn pending(request: AppointmentRequest, exam_date: &str) -> Self {
        Self {
            full_name: request.full_name,
            phone: request.phone,
            birth_date: request.birth_date,
            time_slot: request.time_slot,
            exam_date: exam_date.to_string(),
            status: AppointmentStatus::Pending,
        }
    }
}
