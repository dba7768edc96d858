// libs/therapist-cell/src/services/slots.rs
use std::sync::Arc;

use chrono::{NaiveDate, Timelike};
use tracing::debug;
use uuid::Uuid;

use shared_models::time::DayOfWeek;
use shared_store::{AppState, SchedulingStore};

use crate::models::{AvailabilityError, DaySlots};

const SLOT_MINUTES: u32 = 60;

pub struct SlotService {
    store: Arc<SchedulingStore>,
}

impl SlotService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    /// Compute bookable slot start times for a therapist on a calendar date.
    ///
    /// Slots are fixed 60-minute steps walked from the start of the day's
    /// first recurring window; a trailing period shorter than a full slot
    /// yields no start time. A candidate is available when no active
    /// appointment starts at the same `HH:MM`. A therapist with no window
    /// that day gets empty lists, not an error.
    pub async fn available_slots(
        &self,
        therapist_id: Uuid,
        date: NaiveDate,
    ) -> Result<DaySlots, AvailabilityError> {
        let day = DayOfWeek::from_date(date);
        debug!("Calculating slots for therapist {} on {} ({})", therapist_id, date, day);

        let tx = self.store.begin().await?;
        let windows: Vec<_> = tx
            .windows_for_day(therapist_id, day)
            .into_iter()
            .filter(|w| w.is_recurring)
            .collect();
        let booked_slots: Vec<String> = tx
            .active_appointments_on_date(therapist_id, date)
            .iter()
            .map(|a| a.scheduled_time.format("%H:%M").to_string())
            .collect();
        drop(tx);

        let Some(window) = windows.first() else {
            debug!("No availability window for therapist {} on {}", therapist_id, day);
            return Ok(DaySlots {
                therapist_id,
                date,
                available_slots: Vec::new(),
                booked_slots: Vec::new(),
            });
        };

        // Walk in minutes-since-midnight space; clock arithmetic would wrap
        // at midnight.
        let start = window.start_time.num_seconds_from_midnight() / 60;
        let end = window.end_time.num_seconds_from_midnight() / 60;

        let mut available_slots = Vec::new();
        let mut current = start;
        while current < end {
            let label = format!("{:02}:{:02}", current / 60, current % 60);
            if !booked_slots.contains(&label) {
                available_slots.push(label);
            }
            current += SLOT_MINUTES;
        }

        debug!(
            "Found {} available and {} booked slots",
            available_slots.len(),
            booked_slots.len()
        );

        Ok(DaySlots {
            therapist_id,
            date,
            available_slots,
            booked_slots,
        })
    }
}
