// libs/therapist-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_store::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn therapist_routes(state: Arc<AppState>) -> Router {
    // Patient-facing discovery is public; window management requires
    // authentication.
    let public_routes = Router::new()
        .route(
            "/therapists/{therapist_id}/availability",
            get(handlers::list_availability),
        )
        .route(
            "/therapists/{therapist_id}/availability/slots",
            get(handlers::get_available_slots),
        );

    let protected_routes = Router::new()
        .route("/therapist/availability", post(handlers::create_availability))
        .route(
            "/therapist/availability/{availability_id}",
            put(handlers::update_availability),
        )
        .route(
            "/therapist/availability/{availability_id}",
            delete(handlers::delete_availability),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
