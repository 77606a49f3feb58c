use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::{CreateAppointmentRequest, CreateAppointmentResponse};
use crate::models::AppointmentRecord;
use crate::services::{record_submission, SubmissionOutcome};
use crate::startup::AppState;

/// `POST /api/agendamento`: validate, write one record, answer with its id.
#[tracing::instrument(skip(state, payload))]
pub async fn create_appointment(
    State(state): State<AppState>,
    payload: Result<Json<CreateAppointmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateAppointmentResponse>), AppError> {
    let result = submit(&state, payload).await;

    record_submission(match &result {
        Ok(_) => SubmissionOutcome::Created,
        Err(AppError::ValidationError(_) | AppError::InvalidBody(_)) => SubmissionOutcome::Invalid,
        Err(_) => SubmissionOutcome::Failed,
    });

    result.map(|response| (StatusCode::CREATED, Json(response)))
}

async fn submit(
    state: &AppState,
    payload: Result<Json<CreateAppointmentRequest>, JsonRejection>,
) -> Result<CreateAppointmentResponse, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidBody(e.body_text()))?;
    let request = request.into_validated()?;

    let record = AppointmentRecord::pending(request, &state.config.exam_date);
    let appointment_id = state.store.create(&record).await?;

    tracing::info!(
        appointment_id = %appointment_id,
        time_slot = %record.time_slot,
        "Appointment created"
    );

    Ok(CreateAppointmentResponse::created(appointment_id))
}
