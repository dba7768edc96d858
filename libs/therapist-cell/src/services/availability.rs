// libs/therapist-cell/src/services/availability.rs
use std::sync::Arc;

use chrono::{NaiveTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::availability::AvailabilityWindow;
use shared_models::time::{parse_clock_time, ranges_overlap, DayOfWeek};
use shared_store::{AppState, SchedulingStore};

use crate::models::{AvailabilityError, CreateAvailabilityRequest, UpdateAvailabilityRequest};

pub struct AvailabilityService {
    store: Arc<SchedulingStore>,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    /// Create a recurring availability window for a therapist.
    ///
    /// Validation happens before the transaction opens; the overlap check
    /// and the insert run inside one transaction so concurrent additions
    /// cannot both pass the check.
    pub async fn add_window(
        &self,
        request: CreateAvailabilityRequest,
    ) -> Result<AvailabilityWindow, AvailabilityError> {
        debug!("Creating availability window for therapist: {}", request.therapist_id);

        let (day, start_time, end_time) =
            parse_window_fields(&request.day_of_week, &request.start_time, &request.end_time)?;

        let mut tx = self.store.begin().await?;

        if let Some(conflicting) = tx
            .windows_for_day(request.therapist_id, day)
            .into_iter()
            .find(|w| ranges_overlap(start_time, end_time, w.start_time, w.end_time))
        {
            warn!(
                "Window {}-{} on {} conflicts with existing window {}",
                start_time, end_time, day, conflicting.id
            );
            return Err(AvailabilityError::WindowOverlap { conflicting });
        }

        let now = Utc::now();
        let window = AvailabilityWindow {
            id: Uuid::new_v4(),
            therapist_id: request.therapist_id,
            day_of_week: day,
            start_time,
            end_time,
            is_recurring: request.is_recurring.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        tx.insert_window(window.clone());
        tx.commit();

        debug!("Availability window created with ID: {}", window.id);
        Ok(window)
    }

    /// Update an existing window. The overlap check excludes the window
    /// being updated.
    pub async fn update_window(
        &self,
        window_id: Uuid,
        request: UpdateAvailabilityRequest,
    ) -> Result<AvailabilityWindow, AvailabilityError> {
        debug!("Updating availability window: {}", window_id);

        let (day, start_time, end_time) =
            parse_window_fields(&request.day_of_week, &request.start_time, &request.end_time)?;

        let mut tx = self.store.begin().await?;

        let mut window = tx.window(window_id).ok_or(AvailabilityError::NotFound)?;

        if let Some(conflicting) = tx
            .windows_for_day(window.therapist_id, day)
            .into_iter()
            .filter(|w| w.id != window_id)
            .find(|w| ranges_overlap(start_time, end_time, w.start_time, w.end_time))
        {
            warn!(
                "Updated window {}-{} on {} conflicts with existing window {}",
                start_time, end_time, day, conflicting.id
            );
            return Err(AvailabilityError::WindowOverlap { conflicting });
        }

        window.day_of_week = day;
        window.start_time = start_time;
        window.end_time = end_time;
        if let Some(is_recurring) = request.is_recurring {
            window.is_recurring = is_recurring;
        }
        window.updated_at = Utc::now();

        tx.update_window(window.clone());
        tx.commit();

        Ok(window)
    }

    /// Delete a window; unknown ids surface as not-found rather than being
    /// swallowed.
    pub async fn delete_window(&self, window_id: Uuid) -> Result<(), AvailabilityError> {
        debug!("Deleting availability window: {}", window_id);

        let mut tx = self.store.begin().await?;
        if !tx.remove_window(window_id) {
            return Err(AvailabilityError::NotFound);
        }
        tx.commit();

        Ok(())
    }

    pub async fn get_window(&self, window_id: Uuid) -> Result<AvailabilityWindow, AvailabilityError> {
        let tx = self.store.begin().await?;
        tx.window(window_id).ok_or(AvailabilityError::NotFound)
    }

    /// All windows of a therapist, ordered by day of week (monday first)
    /// then start time.
    pub async fn list_windows(
        &self,
        therapist_id: Uuid,
    ) -> Result<Vec<AvailabilityWindow>, AvailabilityError> {
        debug!("Fetching availability windows for therapist: {}", therapist_id);

        let tx = self.store.begin().await?;
        Ok(tx.windows_for_therapist(therapist_id))
    }
}

fn parse_window_fields(
    day_of_week: &str,
    start_time: &str,
    end_time: &str,
) -> Result<(DayOfWeek, NaiveTime, NaiveTime), AvailabilityError> {
    let day = day_of_week
        .parse::<DayOfWeek>()
        .map_err(|e| AvailabilityError::Validation(e.to_string()))?;
    let start = parse_clock_time(start_time)
        .map_err(|e| AvailabilityError::Validation(e.to_string()))?;
    let end = parse_clock_time(end_time)
        .map_err(|e| AvailabilityError::Validation(e.to_string()))?;

    if start >= end {
        return Err(AvailabilityError::Validation(
            "Start time must be before end time".to_string(),
        ));
    }

    Ok((day, start, end))
}
