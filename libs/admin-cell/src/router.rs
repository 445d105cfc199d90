use std::sync::Arc;
use axum::{middleware, routing::get, Router};
use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn admin_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/statistics/patients", get(patient_statistics))
        .route("/statistics/doctors", get(doctor_statistics))
        .route("/statistics/visits", get(visit_statistics))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
