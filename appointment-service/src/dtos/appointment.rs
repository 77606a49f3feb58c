use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::AppointmentRequest;

pub const REQUIRED_MESSAGE: &str = "Campo obrigatório.";
pub const FULL_NAME_MESSAGE: &str = "O nome deve ter pelo menos 3 caracteres.";
pub const PHONE_MESSAGE: &str = "O telefone deve ter pelo menos 10 dígitos.";
pub const BIRTH_DATE_MESSAGE: &str = "Por favor, insira uma data de nascimento válida.";
pub const TIME_SLOT_MESSAGE: &str = "A seleção de um horário é obrigatória.";

pub const CREATED_MESSAGE: &str = "Agendamento solicitado com sucesso!";

/// Body of `POST /api/agendamento`.
///
/// Every field is optional at the serde layer so that a missing field is
/// reported as a field error instead of a parse failure.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateAppointmentRequest {
    #[serde(rename = "nomeCompleto")]
    #[validate(
        required(message = "Campo obrigatório."),
        length(min = 3, message = "O nome deve ter pelo menos 3 caracteres.")
    )]
    pub full_name: Option<String>,

    #[serde(rename = "telefone")]
    #[validate(
        required(message = "Campo obrigatório."),
        length(min = 10, message = "O telefone deve ter pelo menos 10 dígitos.")
    )]
    pub phone: Option<String>,

    #[serde(rename = "dataNascimento")]
    #[validate(
        required(message = "Campo obrigatório."),
        custom(function = "validate_birth_date")
    )]
    pub birth_date: Option<String>,

    #[serde(rename = "horario")]
    #[validate(
        required(message = "Campo obrigatório."),
        length(min = 1, message = "A seleção de um horário é obrigatória.")
    )]
    pub time_slot: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAppointmentResponse {
    pub message: String,
    #[serde(rename = "agendamentoId")]
    pub appointment_id: String,
}

impl CreateAppointmentResponse {
    pub fn created(appointment_id: String) -> Self {
        Self {
            message: CREATED_MESSAGE.to_string(),
            appointment_id,
        }
    }
}

impl CreateAppointmentRequest {
    /// Run the field rules and hand back a request with every field present.
    pub fn into_validated(self) -> Result<AppointmentRequest, AppError> {
        self.validate().map_err(|e| AppError::from(keyed_by_json_name(e)))?;

        match (self.full_name, self.phone, self.birth_date, self.time_slot) {
            (Some(full_name), Some(phone), Some(birth_date), Some(time_slot)) => {
                Ok(AppointmentRequest {
                    full_name,
                    phone,
                    birth_date,
                    time_slot,
                })
            }
            _ => Err(AppError::InternalError(anyhow::anyhow!(
                "validated appointment request is missing a field"
            ))),
        }
    }
}

/// Strict `YYYY-MM-DD` that must also be a real calendar day.
fn validate_birth_date(value: &str) -> Result<(), ValidationError> {
    let well_formed = value.len() == 10
        && value
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });

    if well_formed && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        return Ok(());
    }

    Err(ValidationError::new("date").with_message(Cow::Borrowed(BIRTH_DATE_MESSAGE)))
}

/// Rust field name and the JSON name the frontend sends for it.
const JSON_NAMES: [(&str, &str); 4] = [
    ("full_name", "nomeCompleto"),
    ("phone", "telefone"),
    ("birth_date", "dataNascimento"),
    ("time_slot", "horario"),
];

/// Error keys follow the JSON field names the frontend sends.
fn keyed_by_json_name(errors: ValidationErrors) -> ValidationErrors {
    let fields = errors.field_errors();
    let mut keyed = ValidationErrors::new();
    for (rust_name, json_name) in JSON_NAMES {
        if let Some(errs) = fields.get(rust_name).or_else(|| fields.get(json_name)) {
            for err in errs.iter() {
                keyed.add(json_name, err.clone());
            }
        }
    }
    keyed
}
