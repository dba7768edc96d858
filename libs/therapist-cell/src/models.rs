// libs/therapist-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::availability::AvailabilityWindow;
use shared_store::StoreError;

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvailabilityRequest {
    pub therapist_id: Uuid,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub is_recurring: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvailabilityRequest {
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub is_recurring: Option<bool>,
}

/// Bookable and already-booked slot start times for one therapist and date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySlots {
    pub therapist_id: Uuid,
    pub date: NaiveDate,
    pub available_slots: Vec<String>,
    pub booked_slots: Vec<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error("{0}")]
    Validation(String),

    #[error("Availability window conflicts with existing schedule")]
    WindowOverlap { conflicting: AvailabilityWindow },

    #[error("Availability window not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
