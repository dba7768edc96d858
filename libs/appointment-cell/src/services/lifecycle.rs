// libs/appointment-cell/src/services/lifecycle.rs
use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_models::time::DayOfWeek;
use shared_store::{AppState, SchedulingStore};

use crate::models::AppointmentError;
use crate::services::conflict;

pub struct AppointmentLifecycleService {
    store: Arc<SchedulingStore>,
    validate_on_reschedule: bool,
}

impl AppointmentLifecycleService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
            validate_on_reschedule: state.config.validate_on_reschedule,
        }
    }

    /// Set an appointment's status. The status string must name one of the
    /// known lifecycle states; a cancellation reason is recorded when the
    /// caller provides one.
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        status: &str,
        cancellation_reason: Option<String>,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Updating status of appointment {} to {}", appointment_id, status);

        let new_status: AppointmentStatus = status
            .parse()
            .map_err(|e: shared_models::appointment::UnknownStatus| {
                AppointmentError::Validation(e.to_string())
            })?;

        let mut tx = self.store.begin().await?;
        let mut appointment = tx.appointment(appointment_id).ok_or(AppointmentError::NotFound)?;

        appointment.status = new_status;
        if let Some(reason) = cancellation_reason {
            appointment.cancellation_reason = Some(reason);
        }
        appointment.updated_at = Utc::now();

        tx.update_appointment(appointment.clone());
        tx.commit();

        info!("Appointment {} moved to status {}", appointment_id, new_status);
        Ok(appointment)
    }

    /// Move an appointment to a new time, marking it `rescheduled` unless
    /// the caller sets another status.
    ///
    /// Reschedules historically write the new time directly without the
    /// booking-time availability and conflict checks; callers depend on
    /// that, so it stays the default. VALIDATE_ON_RESCHEDULE opts into the
    /// symmetric checks.
    pub async fn reschedule(
        &self,
        appointment_id: Uuid,
        new_time: DateTime<Utc>,
        status: Option<String>,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Rescheduling appointment {} to {}", appointment_id, new_time);

        let new_status: AppointmentStatus = match status {
            Some(raw) => raw.parse().map_err(|e: shared_models::appointment::UnknownStatus| {
                AppointmentError::Validation(e.to_string())
            })?,
            None => AppointmentStatus::Rescheduled,
        };

        let mut tx = self.store.begin().await?;
        let mut appointment = tx.appointment(appointment_id).ok_or(AppointmentError::NotFound)?;

        if self.validate_on_reschedule {
            let day = DayOfWeek::from_date(new_time.date_naive());
            let time_of_day = new_time.time();

            let covered = tx
                .windows_for_day(appointment.therapist_id, day)
                .iter()
                .any(|w| w.covers(time_of_day));
            if !covered {
                warn!(
                    "Reschedule rejected: no availability window for therapist {} on {} at {}",
                    appointment.therapist_id, day, time_of_day
                );
                return Err(AppointmentError::NoAvailability { day, time: time_of_day });
            }

            let end_time = new_time + ChronoDuration::minutes(appointment.duration_minutes as i64);
            let existing = tx.appointments_for_therapist(appointment.therapist_id);
            if let Some(conflicting) =
                conflict::find_conflict(&existing, new_time, end_time, Some(appointment_id))
            {
                warn!(
                    "Reschedule rejected: conflict with appointment {}",
                    conflicting.id
                );
                return Err(AppointmentError::ConflictDetected { conflicting });
            }
        }

        appointment.scheduled_time = new_time;
        appointment.status = new_status;
        appointment.updated_at = Utc::now();

        tx.update_appointment(appointment.clone());
        tx.commit();

        info!("Appointment {} rescheduled to {}", appointment_id, new_time);
        Ok(appointment)
    }
}
