use std::sync::Arc;
use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn visit_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_visits).post(create_visit))
        .route("/patient/pending", get(patient_pending))
        .route("/updateStatus/{patient_id}", put(update_visit_status_by_key))
        .route("/doctor/{doctor_id}/allPending", get(doctor_all_pending))
        .route("/doctor/{doctor_id}/today", get(doctor_today))
        .route("/doctor/{doctor_id}/upcoming", get(doctor_upcoming))
        .route("/doctor/{doctor_id}/past", get(doctor_past))
        .route("/doctor/{doctor_id}/statistics", get(doctor_statistics))
        .route("/{visit_id}", get(get_visit))
        .route("/{visit_id}/status", put(update_visit_status))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
