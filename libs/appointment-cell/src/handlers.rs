// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{
    AppointmentError, BookAppointmentRequest, RescheduleRequest, UpdateStatusRequest,
};
use crate::services::{AppointmentBookingService, AppointmentLifecycleService};

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    // Patients book for themselves; therapists and admins may book on a
    // patient's behalf.
    let is_patient = request.patient_id.to_string() == user.id;
    let is_admin = user.role.as_deref() == Some("admin");
    let is_therapist = user.role.as_deref() == Some("therapist");

    if !is_patient && !is_admin && !is_therapist {
        return Err(AppError::Auth(
            "Not authorized to book appointment for this patient".to_string(),
        ));
    }

    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service
        .book_appointment(request)
        .await
        .map_err(appointment_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "appointmentId": appointment.id
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service
        .get_appointment(appointment_id)
        .await
        .map_err(appointment_error)?;

    authorize_participant(&user, appointment.patient_id, appointment.therapist_id)?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let is_patient = patient_id.to_string() == user.id;
    let is_admin = user.role.as_deref() == Some("admin");
    if !is_patient && !is_admin {
        return Err(AppError::Auth(
            "Not authorized to view this patient's appointments".to_string(),
        ));
    }

    let booking_service = AppointmentBookingService::new(&state);

    let appointments = booking_service
        .list_for_patient(patient_id)
        .await
        .map_err(appointment_error)?;

    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_therapist_appointments(
    State(state): State<Arc<AppState>>,
    Path(therapist_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let is_therapist = therapist_id.to_string() == user.id;
    let is_admin = user.role.as_deref() == Some("admin");
    if !is_therapist && !is_admin {
        return Err(AppError::Auth(
            "Not authorized to view this therapist's appointments".to_string(),
        ));
    }

    let booking_service = AppointmentBookingService::new(&state);

    let appointments = booking_service
        .list_for_therapist(therapist_id)
        .await
        .map_err(appointment_error)?;

    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);
    let existing = booking_service
        .get_appointment(appointment_id)
        .await
        .map_err(appointment_error)?;
    authorize_participant(&user, existing.patient_id, existing.therapist_id)?;

    let lifecycle_service = AppointmentLifecycleService::new(&state);

    let appointment = lifecycle_service
        .update_status(appointment_id, &request.status, request.cancellation_reason)
        .await
        .map_err(appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);
    let existing = booking_service
        .get_appointment(appointment_id)
        .await
        .map_err(appointment_error)?;
    authorize_participant(&user, existing.patient_id, existing.therapist_id)?;

    let lifecycle_service = AppointmentLifecycleService::new(&state);

    let appointment = lifecycle_service
        .reschedule(appointment_id, request.scheduled_time, request.status)
        .await
        .map_err(appointment_error)?;

    Ok(Json(json!(appointment)))
}

// Only the patient, the therapist, or an admin may touch an appointment.
fn authorize_participant(user: &User, patient_id: Uuid, therapist_id: Uuid) -> Result<(), AppError> {
    let is_patient = patient_id.to_string() == user.id;
    let is_therapist = therapist_id.to_string() == user.id;
    let is_admin = user.role.as_deref() == Some("admin");

    if !is_patient && !is_therapist && !is_admin {
        return Err(AppError::Auth(
            "Not authorized to access this appointment".to_string(),
        ));
    }

    Ok(())
}

fn appointment_error(error: AppointmentError) -> AppError {
    match error {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::NoAvailability { day, time } => AppError::BadRequest(format!(
            "No availability window covers {} at {}",
            day,
            time.format("%H:%M:%S")
        )),
        AppointmentError::ConflictDetected { conflicting } => AppError::Conflict {
            message: "Appointment conflicts with existing booking".to_string(),
            details: json!({
                "conflictingAppointment": {
                    "appointmentId": conflicting.id,
                    "scheduledTime": conflicting.scheduled_time,
                    "durationMinutes": conflicting.duration_minutes,
                    "status": conflicting.status,
                }
            }),
        },
        AppointmentError::Validation(msg) => AppError::Validation(msg),
        AppointmentError::Store(e) => AppError::Database(e.to_string()),
    }
}
