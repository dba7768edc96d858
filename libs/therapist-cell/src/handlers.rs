// libs/therapist-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{AvailabilityError, CreateAvailabilityRequest, UpdateAvailabilityRequest};
use crate::services::{AvailabilityService, SlotService};

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
}

// ==============================================================================
// PUBLIC HANDLERS (NO AUTHENTICATION REQUIRED)
// ==============================================================================

#[axum::debug_handler]
pub async fn list_availability(
    State(state): State<Arc<AppState>>,
    Path(therapist_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let windows = availability_service
        .list_windows(therapist_id)
        .await
        .map_err(availability_error)?;

    Ok(Json(json!(windows)))
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppState>>,
    Path(therapist_id): Path<Uuid>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let raw_date = query
        .date
        .ok_or_else(|| AppError::BadRequest("Missing required query parameter: date".to_string()))?;

    let date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid date format, expected YYYY-MM-DD".to_string()))?;

    let slot_service = SlotService::new(&state);

    let slots = slot_service
        .available_slots(therapist_id, date)
        .await
        .map_err(availability_error)?;

    Ok(Json(json!(slots)))
}

// ==============================================================================
// PROTECTED HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_availability(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateAvailabilityRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    authorize_for_therapist(&user, request.therapist_id)?;

    let availability_service = AvailabilityService::new(&state);

    let window = availability_service
        .add_window(request)
        .await
        .map_err(availability_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "availabilityId": window.id
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_availability(
    State(state): State<Arc<AppState>>,
    Path(availability_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let existing = availability_service
        .get_window(availability_id)
        .await
        .map_err(availability_error)?;
    authorize_for_therapist(&user, existing.therapist_id)?;

    let window = availability_service
        .update_window(availability_id, request)
        .await
        .map_err(availability_error)?;

    Ok(Json(json!({
        "success": true,
        "availability": window
    })))
}

#[axum::debug_handler]
pub async fn delete_availability(
    State(state): State<Arc<AppState>>,
    Path(availability_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let existing = availability_service
        .get_window(availability_id)
        .await
        .map_err(availability_error)?;
    authorize_for_therapist(&user, existing.therapist_id)?;

    availability_service
        .delete_window(availability_id)
        .await
        .map_err(availability_error)?;

    Ok(Json(json!({
        "success": true
    })))
}

// Only the owning therapist or an admin may manage a therapist's windows.
fn authorize_for_therapist(user: &User, therapist_id: Uuid) -> Result<(), AppError> {
    let is_owner = user.id == therapist_id.to_string();
    let is_admin = user.role.as_deref() == Some("admin");

    if !is_owner && !is_admin {
        return Err(AppError::Auth(
            "Not authorized to manage availability for this therapist".to_string(),
        ));
    }

    Ok(())
}

fn availability_error(error: AvailabilityError) -> AppError {
    match error {
        AvailabilityError::Validation(msg) => AppError::Validation(msg),
        AvailabilityError::WindowOverlap { conflicting } => AppError::Conflict {
            message: "Availability window conflicts with an existing window".to_string(),
            details: json!({
                "conflictingSlot": {
                    "availabilityId": conflicting.id,
                    "dayOfWeek": conflicting.day_of_week,
                    "startTime": conflicting.start_time.format("%H:%M:%S").to_string(),
                    "endTime": conflicting.end_time.format("%H:%M:%S").to_string(),
                }
            }),
        },
        AvailabilityError::NotFound => {
            AppError::NotFound("Availability window not found".to_string())
        }
        AvailabilityError::Store(e) => AppError::Database(e.to_string()),
    }
}
