use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_database::AppState;

use crate::handlers;

/// Login endpoints are public; `/session` checks its own bearer token.
pub fn auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/patient", post(handlers::login_patient))
        .route("/doctor", post(handlers::login_doctor))
        .route("/admin", post(handlers::login_admin))
        .route("/session", get(handlers::current_session))
        .with_state(state)
}
