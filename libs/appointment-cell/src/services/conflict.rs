// libs/appointment-cell/src/services/conflict.rs
use chrono::{DateTime, Utc};
use uuid::Uuid;

use shared_models::appointment::Appointment;

/// Half-open interval overlap: two appointments collide when
/// `start1 < end2 && start2 < end1`. Back-to-back appointments do not.
pub fn intervals_overlap(
    start1: DateTime<Utc>,
    end1: DateTime<Utc>,
    start2: DateTime<Utc>,
    end2: DateTime<Utc>,
) -> bool {
    start1 < end2 && start2 < end1
}

/// Earliest active appointment whose occupied interval collides with
/// `[start, end)`. Inactive statuses (cancelled, completed, no-show) never
/// conflict; `exclude` skips the appointment being moved.
pub fn find_conflict(
    appointments: &[Appointment],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<Uuid>,
) -> Option<Appointment> {
    let mut conflicting: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| Some(a.id) != exclude)
        .filter(|a| a.status.is_active())
        .filter(|a| intervals_overlap(start, end, a.scheduled_time, a.scheduled_end_time()))
        .collect();
    conflicting.sort_by_key(|a| a.scheduled_time);
    conflicting.first().map(|a| (*a).clone())
}
