use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use shared_database::AppState;
use shared_models::auth::Session;
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Validates the bearer token and stores the resulting [`Session`] in the
/// request extensions for handlers to pick up with `Extension<Session>`.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    let token = auth_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))?;

    let session = validate_token(token, &state.config.session_secret)?;
    debug!("Authenticated {} {}", session.role, session.subject);

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

pub fn require_admin(session: &Session) -> Result<(), AppError> {
    if session.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin access required".to_string()))
    }
}

/// Admin or the patient themself.
pub fn require_patient_access(session: &Session, patient_id: &str) -> Result<(), AppError> {
    if session.is_admin() || session.is_patient(patient_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Not authorized to access this patient's records".to_string(),
        ))
    }
}

/// Admin or the doctor themself.
pub fn require_doctor_access(session: &Session, doctor_id: &str) -> Result<(), AppError> {
    if session.is_admin() || session.is_doctor(doctor_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Not authorized to access this doctor's schedule".to_string(),
        ))
    }
}
