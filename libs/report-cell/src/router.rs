use std::sync::Arc;
use axum::{middleware, routing::get, Router};
use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn report_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_reports).post(create_report))
        .route("/{report_id}", get(get_report))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
