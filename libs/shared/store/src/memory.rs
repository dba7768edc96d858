use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::{Mutex, OwnedMutexGuard, OwnedSemaphorePermit, Semaphore};
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::appointment::Appointment;
use shared_models::availability::AvailabilityWindow;
use shared_models::time::DayOfWeek;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store transaction pool exhausted")]
    PoolExhausted,

    #[error("an active appointment already holds this therapist and start time")]
    UniqueViolation,
}

#[derive(Default, Clone, Debug)]
struct Tables {
    // BTreeMaps keep iteration deterministic, so every listing is a stable
    // total order.
    windows: BTreeMap<Uuid, AvailabilityWindow>,
    appointments: BTreeMap<Uuid, Appointment>,
}

/// Transactional store over availability windows and appointments.
///
/// `begin` hands out at most `max_transactions` concurrent transactions;
/// excess callers queue up to the acquire timeout and then fail instead of
/// piling up unboundedly. A transaction holds the table lock for its whole
/// lifetime, so a conflict check followed by an insert is serialized against
/// every other transaction.
pub struct SchedulingStore {
    tables: Arc<Mutex<Tables>>,
    permits: Arc<Semaphore>,
    acquire_timeout: Duration,
}

impl SchedulingStore {
    pub fn new(max_transactions: usize, acquire_timeout: Duration) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            permits: Arc::new(Semaphore::new(max_transactions.max(1))),
            acquire_timeout,
        }
    }

    pub async fn begin(&self) -> Result<StoreTransaction, StoreError> {
        let permit = timeout(self.acquire_timeout, self.permits.clone().acquire_owned())
            .await
            .map_err(|_| {
                warn!("transaction permit not acquired within {:?}", self.acquire_timeout);
                StoreError::PoolExhausted
            })?
            .map_err(|_| StoreError::PoolExhausted)?;

        let guard = self.tables.clone().lock_owned().await;
        let staged = guard.clone();

        Ok(StoreTransaction {
            guard,
            staged,
            _permit: permit,
        })
    }
}

/// A single transaction: all reads and writes go against a staged copy of
/// the tables. `commit` publishes the staged state atomically; dropping the
/// transaction without committing discards every staged write.
#[derive(Debug)]
pub struct StoreTransaction {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
    _permit: OwnedSemaphorePermit,
}

impl StoreTransaction {
    pub fn commit(mut self) {
        *self.guard = std::mem::take(&mut self.staged);
        debug!("transaction committed");
    }

    // Availability windows

    pub fn window(&self, id: Uuid) -> Option<AvailabilityWindow> {
        self.staged.windows.get(&id).cloned()
    }

    pub fn insert_window(&mut self, window: AvailabilityWindow) {
        self.staged.windows.insert(window.id, window);
    }

    /// Replaces an existing window; false when the id is unknown.
    pub fn update_window(&mut self, window: AvailabilityWindow) -> bool {
        match self.staged.windows.get_mut(&window.id) {
            Some(slot) => {
                *slot = window;
                true
            }
            None => false,
        }
    }

    pub fn remove_window(&mut self, id: Uuid) -> bool {
        self.staged.windows.remove(&id).is_some()
    }

    /// All windows of a therapist, ordered by day of week (monday first)
    /// then start time.
    pub fn windows_for_therapist(&self, therapist_id: Uuid) -> Vec<AvailabilityWindow> {
        let mut windows: Vec<_> = self
            .staged
            .windows
            .values()
            .filter(|w| w.therapist_id == therapist_id)
            .cloned()
            .collect();
        windows.sort_by_key(|w| (w.day_of_week, w.start_time));
        windows
    }

    /// Windows of a therapist on one day, ordered by start time.
    pub fn windows_for_day(&self, therapist_id: Uuid, day: DayOfWeek) -> Vec<AvailabilityWindow> {
        let mut windows: Vec<_> = self
            .staged
            .windows
            .values()
            .filter(|w| w.therapist_id == therapist_id && w.day_of_week == day)
            .cloned()
            .collect();
        windows.sort_by_key(|w| w.start_time);
        windows
    }

    // Appointments

    pub fn appointment(&self, id: Uuid) -> Option<Appointment> {
        self.staged.appointments.get(&id).cloned()
    }

    /// Inserts a new appointment. Fails if another active appointment for
    /// the same therapist starts at the same instant, a backstop under the
    /// conflict check performed by the scheduler.
    pub fn insert_appointment(&mut self, appointment: Appointment) -> Result<(), StoreError> {
        let duplicate = self.staged.appointments.values().any(|existing| {
            existing.therapist_id == appointment.therapist_id
                && existing.scheduled_time == appointment.scheduled_time
                && existing.status.is_active()
                && existing.id != appointment.id
        });
        if duplicate && appointment.status.is_active() {
            return Err(StoreError::UniqueViolation);
        }
        self.staged.appointments.insert(appointment.id, appointment);
        Ok(())
    }

    /// Replaces an existing appointment; false when the id is unknown.
    pub fn update_appointment(&mut self, appointment: Appointment) -> bool {
        match self.staged.appointments.get_mut(&appointment.id) {
            Some(slot) => {
                *slot = appointment;
                true
            }
            None => false,
        }
    }

    /// All appointments of a therapist, newest scheduled time first.
    pub fn appointments_for_therapist(&self, therapist_id: Uuid) -> Vec<Appointment> {
        let mut appointments: Vec<_> = self
            .staged
            .appointments
            .values()
            .filter(|a| a.therapist_id == therapist_id)
            .cloned()
            .collect();
        appointments.sort_by(|a, b| b.scheduled_time.cmp(&a.scheduled_time));
        appointments
    }

    /// All appointments of a patient, newest scheduled time first.
    pub fn appointments_for_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        let mut appointments: Vec<_> = self
            .staged
            .appointments
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        appointments.sort_by(|a, b| b.scheduled_time.cmp(&a.scheduled_time));
        appointments
    }

    /// Active-status appointments of a therapist starting on the given
    /// calendar date, ordered by start time ascending.
    pub fn active_appointments_on_date(
        &self,
        therapist_id: Uuid,
        date: NaiveDate,
    ) -> Vec<Appointment> {
        let mut appointments: Vec<_> = self
            .staged
            .appointments
            .values()
            .filter(|a| {
                a.therapist_id == therapist_id
                    && a.status.is_active()
                    && a.scheduled_time.date_naive() == date
            })
            .cloned()
            .collect();
        appointments.sort_by_key(|a| a.scheduled_time);
        appointments
    }
}
