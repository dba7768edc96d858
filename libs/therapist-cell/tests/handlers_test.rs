use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use shared_store::AppState;
use shared_utils::test_utils::{test_state, TestUser};
use therapist_cell::router::therapist_routes;

fn create_test_app(state: Arc<AppState>) -> Router {
    therapist_routes(state)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn window_body(therapist_id: Uuid, day: &str, start: &str, end: &str) -> Value {
    json!({
        "therapistId": therapist_id,
        "dayOfWeek": day,
        "startTime": start,
        "endTime": end,
        "isRecurring": true
    })
}

#[tokio::test]
async fn test_create_availability_success() {
    let state = test_state();
    let app = create_test_app(state.clone());
    let therapist = TestUser::therapist("therapist@example.com");

    let request = json_request(
        "POST",
        "/therapist/availability",
        Some(&therapist.token()),
        window_body(therapist.id, "monday", "09:00", "12:00"),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json_response = response_json(response).await;
    assert!(json_response["availabilityId"].is_string());
}

#[tokio::test]
async fn test_create_availability_requires_auth() {
    let state = test_state();
    let app = create_test_app(state.clone());

    let request = json_request(
        "POST",
        "/therapist/availability",
        None,
        window_body(Uuid::new_v4(), "monday", "09:00", "12:00"),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_availability_rejects_other_therapist() {
    let state = test_state();
    let app = create_test_app(state.clone());
    let therapist = TestUser::therapist("therapist@example.com");

    let request = json_request(
        "POST",
        "/therapist/availability",
        Some(&therapist.token()),
        window_body(Uuid::new_v4(), "monday", "09:00", "12:00"),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_overlapping_availability_returns_conflicting_slot() {
    let state = test_state();
    let app = create_test_app(state.clone());
    let therapist = TestUser::therapist("therapist@example.com");

    let first = json_request(
        "POST",
        "/therapist/availability",
        Some(&therapist.token()),
        window_body(therapist.id, "monday", "09:00", "12:00"),
    );
    let first_response = app.clone().oneshot(first).await.unwrap();
    assert_eq!(first_response.status(), StatusCode::CREATED);
    let first_json = response_json(first_response).await;

    let second = json_request(
        "POST",
        "/therapist/availability",
        Some(&therapist.token()),
        window_body(therapist.id, "monday", "10:00", "13:00"),
    );
    let second_response = app.oneshot(second).await.unwrap();
    assert_eq!(second_response.status(), StatusCode::BAD_REQUEST);

    let second_json = response_json(second_response).await;
    assert_eq!(
        second_json["conflictingSlot"]["availabilityId"],
        first_json["availabilityId"]
    );
    assert_eq!(second_json["conflictingSlot"]["dayOfWeek"], "monday");
    assert_eq!(second_json["conflictingSlot"]["startTime"], "09:00:00");
    assert_eq!(second_json["conflictingSlot"]["endTime"], "12:00:00");
}

#[tokio::test]
async fn test_invalid_time_format_is_rejected() {
    let state = test_state();
    let app = create_test_app(state.clone());
    let therapist = TestUser::therapist("therapist@example.com");

    let request = json_request(
        "POST",
        "/therapist/availability",
        Some(&therapist.token()),
        window_body(therapist.id, "monday", "9am", "12:00"),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_availability_is_public() {
    let state = test_state();
    let app = create_test_app(state.clone());
    let therapist = TestUser::therapist("therapist@example.com");

    for (day, start, end) in [("friday", "13:00", "16:00"), ("monday", "09:00", "12:00")] {
        let request = json_request(
            "POST",
            "/therapist/availability",
            Some(&therapist.token()),
            window_body(therapist.id, day, start, end),
        );
        app.clone().oneshot(request).await.unwrap();
    }

    let request = Request::builder()
        .method("GET")
        .uri(&format!("/therapists/{}/availability", therapist.id))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_response = response_json(response).await;
    let windows = json_response.as_array().unwrap();
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0]["day_of_week"], "monday");
    assert_eq!(windows[1]["day_of_week"], "friday");
}

#[tokio::test]
async fn test_update_and_delete_availability() {
    let state = test_state();
    let app = create_test_app(state.clone());
    let therapist = TestUser::therapist("therapist@example.com");

    let create = json_request(
        "POST",
        "/therapist/availability",
        Some(&therapist.token()),
        window_body(therapist.id, "monday", "09:00", "12:00"),
    );
    let created = response_json(app.clone().oneshot(create).await.unwrap()).await;
    let availability_id = created["availabilityId"].as_str().unwrap().to_string();

    let update = json_request(
        "PUT",
        &format!("/therapist/availability/{}", availability_id),
        Some(&therapist.token()),
        json!({
            "dayOfWeek": "tuesday",
            "startTime": "10:00",
            "endTime": "14:00"
        }),
    );
    let update_response = app.clone().oneshot(update).await.unwrap();
    assert_eq!(update_response.status(), StatusCode::OK);
    let updated = response_json(update_response).await;
    assert_eq!(updated["availability"]["day_of_week"], "tuesday");

    let delete = json_request(
        "DELETE",
        &format!("/therapist/availability/{}", availability_id),
        Some(&therapist.token()),
        json!({}),
    );
    let delete_response = app.clone().oneshot(delete).await.unwrap();
    assert_eq!(delete_response.status(), StatusCode::OK);

    // Deleting again reports not-found.
    let delete_again = json_request(
        "DELETE",
        &format!("/therapist/availability/{}", availability_id),
        Some(&therapist.token()),
        json!({}),
    );
    let response = app.oneshot(delete_again).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_by_other_therapist_is_rejected() {
    let state = test_state();
    let app = create_test_app(state.clone());
    let owner = TestUser::therapist("owner@example.com");
    let intruder = TestUser::therapist("intruder@example.com");

    let create = json_request(
        "POST",
        "/therapist/availability",
        Some(&owner.token()),
        window_body(owner.id, "monday", "09:00", "12:00"),
    );
    let created = response_json(app.clone().oneshot(create).await.unwrap()).await;
    let availability_id = created["availabilityId"].as_str().unwrap().to_string();

    let update = json_request(
        "PUT",
        &format!("/therapist/availability/{}", availability_id),
        Some(&intruder.token()),
        json!({
            "dayOfWeek": "tuesday",
            "startTime": "10:00",
            "endTime": "14:00"
        }),
    );
    let response = app.oneshot(update).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_slots_endpoint_and_date_validation() {
    let state = test_state();
    let app = create_test_app(state.clone());
    let therapist = TestUser::therapist("therapist@example.com");

    let create = json_request(
        "POST",
        "/therapist/availability",
        Some(&therapist.token()),
        window_body(therapist.id, "monday", "09:00", "12:00"),
    );
    app.clone().oneshot(create).await.unwrap();

    // 2025-06-02 is a Monday.
    let request = Request::builder()
        .method("GET")
        .uri(&format!(
            "/therapists/{}/availability/slots?date=2025-06-02",
            therapist.id
        ))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_response = response_json(response).await;
    assert_eq!(json_response["therapist_id"], json!(therapist.id));
    assert_eq!(json_response["date"], "2025-06-02");
    assert_eq!(json_response["available_slots"], json!(["09:00", "10:00", "11:00"]));
    assert_eq!(json_response["booked_slots"], json!([]));

    // Missing and malformed dates are caller errors.
    for uri in [
        format!("/therapists/{}/availability/slots", therapist.id),
        format!("/therapists/{}/availability/slots?date=junk", therapist.id),
    ] {
        let request = Request::builder()
            .method("GET")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {}", uri);
    }
}
