use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_utils::test_utils::test_state;
use therapist_cell::models::CreateAvailabilityRequest;
use therapist_cell::services::{AvailabilityService, SlotService};

// 2025-06-02 is a Monday.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

async fn seed_window(
    state: &shared_store::AppState,
    therapist_id: Uuid,
    day: &str,
    start: &str,
    end: &str,
) {
    AvailabilityService::new(state)
        .add_window(CreateAvailabilityRequest {
            therapist_id,
            day_of_week: day.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            is_recurring: None,
        })
        .await
        .unwrap();
}

async fn seed_appointment(
    state: &shared_store::AppState,
    therapist_id: Uuid,
    hour: u32,
    status: AppointmentStatus,
) {
    let now = Utc::now();
    let mut tx = state.store.begin().await.unwrap();
    tx.insert_appointment(Appointment {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        therapist_id,
        scheduled_time: Utc.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap(),
        duration_minutes: 60,
        status,
        notes: None,
        cancellation_reason: None,
        created_at: now,
        updated_at: now,
    })
    .unwrap();
    tx.commit();
}

#[tokio::test]
async fn hour_slots_are_walked_from_the_window_start() {
    let state = test_state();
    let therapist_id = Uuid::new_v4();
    seed_window(&state, therapist_id, "monday", "09:00", "12:00").await;

    let slots = SlotService::new(&state)
        .available_slots(therapist_id, monday())
        .await
        .unwrap();

    assert_eq!(slots.available_slots, vec!["09:00", "10:00", "11:00"]);
    assert!(slots.booked_slots.is_empty());
}

#[tokio::test]
async fn trailing_partial_period_produces_no_slot() {
    let state = test_state();
    let therapist_id = Uuid::new_v4();
    seed_window(&state, therapist_id, "monday", "09:00", "10:30").await;

    let slots = SlotService::new(&state)
        .available_slots(therapist_id, monday())
        .await
        .unwrap();

    assert_eq!(slots.available_slots, vec!["09:00", "10:00"]);
}

#[tokio::test]
async fn no_window_means_empty_lists_not_an_error() {
    let state = test_state();
    let therapist_id = Uuid::new_v4();

    let slots = SlotService::new(&state)
        .available_slots(therapist_id, monday())
        .await
        .unwrap();

    assert!(slots.available_slots.is_empty());
    assert!(slots.booked_slots.is_empty());
}

#[tokio::test]
async fn booked_times_are_excluded_from_available_slots() {
    let state = test_state();
    let therapist_id = Uuid::new_v4();
    seed_window(&state, therapist_id, "monday", "09:00", "12:00").await;
    seed_appointment(&state, therapist_id, 10, AppointmentStatus::Scheduled).await;

    let slots = SlotService::new(&state)
        .available_slots(therapist_id, monday())
        .await
        .unwrap();

    assert_eq!(slots.available_slots, vec!["09:00", "11:00"]);
    assert_eq!(slots.booked_slots, vec!["10:00"]);
}

#[tokio::test]
async fn available_and_booked_slots_never_share_a_time() {
    let state = test_state();
    let therapist_id = Uuid::new_v4();
    seed_window(&state, therapist_id, "monday", "08:00", "18:00").await;
    for hour in [8, 11, 14, 17] {
        seed_appointment(&state, therapist_id, hour, AppointmentStatus::Scheduled).await;
    }

    let slots = SlotService::new(&state)
        .available_slots(therapist_id, monday())
        .await
        .unwrap();

    for booked in &slots.booked_slots {
        assert!(
            !slots.available_slots.contains(booked),
            "{} listed as both available and booked",
            booked
        );
    }
}

#[tokio::test]
async fn inactive_appointments_do_not_block_slots() {
    let state = test_state();
    let therapist_id = Uuid::new_v4();
    seed_window(&state, therapist_id, "monday", "09:00", "12:00").await;
    seed_appointment(&state, therapist_id, 10, AppointmentStatus::Cancelled).await;
    seed_appointment(&state, therapist_id, 11, AppointmentStatus::Completed).await;

    let slots = SlotService::new(&state)
        .available_slots(therapist_id, monday())
        .await
        .unwrap();

    assert_eq!(slots.available_slots, vec!["09:00", "10:00", "11:00"]);
    assert!(slots.booked_slots.is_empty());
}

#[tokio::test]
async fn appointments_on_other_dates_are_ignored() {
    let state = test_state();
    let therapist_id = Uuid::new_v4();
    seed_window(&state, therapist_id, "monday", "09:00", "12:00").await;

    // Same weekday, one week later.
    let now = Utc::now();
    let mut tx = state.store.begin().await.unwrap();
    tx.insert_appointment(Appointment {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        therapist_id,
        scheduled_time: Utc.with_ymd_and_hms(2025, 6, 9, 10, 0, 0).unwrap(),
        duration_minutes: 60,
        status: AppointmentStatus::Scheduled,
        notes: None,
        cancellation_reason: None,
        created_at: now,
        updated_at: now,
    })
    .unwrap();
    tx.commit();

    let slots = SlotService::new(&state)
        .available_slots(therapist_id, monday())
        .await
        .unwrap();

    assert_eq!(slots.available_slots, vec!["09:00", "10:00", "11:00"]);
}
