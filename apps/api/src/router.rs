use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use shared_store::AppState;
use therapist_cell::router::therapist_routes;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Therapy booking API is running!" }))
        .merge(therapist_routes(state.clone()))
        .nest("/appointments", appointment_routes(state))
}
