// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentStatus, DEFAULT_APPOINTMENT_MINUTES};
use shared_models::time::DayOfWeek;
use shared_store::{AppState, SchedulingStore};

use crate::models::{AppointmentError, BookAppointmentRequest};
use crate::services::conflict;

pub struct AppointmentBookingService {
    store: Arc<SchedulingStore>,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    /// Book an appointment inside one transaction.
    ///
    /// The availability check, the conflict check and the insert all run
    /// against the same transaction, so two concurrent requests for the
    /// same therapist and time cannot both pass the checks: whichever
    /// commits second observes the first row and fails. Nothing is written
    /// when any step fails.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking appointment for patient {} with therapist {}",
            request.patient_id, request.therapist_id
        );

        let duration_minutes = request.duration_minutes.unwrap_or(DEFAULT_APPOINTMENT_MINUTES);
        if duration_minutes <= 0 {
            return Err(AppointmentError::Validation(
                "Appointment duration must be positive".to_string(),
            ));
        }

        let day = DayOfWeek::from_date(request.scheduled_time.date_naive());
        let time_of_day = request.scheduled_time.time();

        let mut tx = self.store.begin().await?;

        // A window must cover the start time of day, boundaries included.
        let covered = tx
            .windows_for_day(request.therapist_id, day)
            .iter()
            .any(|w| w.covers(time_of_day));
        if !covered {
            warn!(
                "No availability window for therapist {} on {} at {}",
                request.therapist_id, day, time_of_day
            );
            return Err(AppointmentError::NoAvailability { day, time: time_of_day });
        }

        let end_time = request.scheduled_time + ChronoDuration::minutes(duration_minutes as i64);
        let existing = tx.appointments_for_therapist(request.therapist_id);
        if let Some(conflicting) =
            conflict::find_conflict(&existing, request.scheduled_time, end_time, None)
        {
            warn!(
                "Appointment conflict for therapist {} at {}: existing appointment {}",
                request.therapist_id, request.scheduled_time, conflicting.id
            );
            return Err(AppointmentError::ConflictDetected { conflicting });
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: request.patient_id,
            therapist_id: request.therapist_id,
            scheduled_time: request.scheduled_time,
            duration_minutes,
            status: AppointmentStatus::Scheduled,
            notes: request.notes,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };

        tx.insert_appointment(appointment.clone())?;
        tx.commit();

        info!("Appointment {} booked successfully", appointment.id);
        Ok(appointment)
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        debug!("Fetching appointment: {}", appointment_id);

        let tx = self.store.begin().await?;
        tx.appointment(appointment_id).ok_or(AppointmentError::NotFound)
    }

    /// A therapist's appointments, newest scheduled time first.
    pub async fn list_for_therapist(
        &self,
        therapist_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let tx = self.store.begin().await?;
        Ok(tx.appointments_for_therapist(therapist_id))
    }

    /// A patient's appointments, newest scheduled time first.
    pub async fn list_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let tx = self.store.begin().await?;
        Ok(tx.appointments_for_patient(patient_id))
    }
}
