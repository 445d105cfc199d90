use std::sync::Arc;

use axum::{
    extract::{Json, State},
};
use axum_extra::{extract::WithRejection, TypedHeader};
use headers::{authorization::Bearer, Authorization};
use tracing::debug;

use shared_database::AppState;
use shared_models::auth::{LoginResponse, Session};
use shared_models::error::AppError;
use shared_models::response::ApiResponse;
use shared_utils::jwt::validate_token;

use crate::models::{AdminLoginRequest, DoctorLoginRequest, PatientLoginRequest};
use crate::services::login::LoginService;

fn login_success(response: LoginResponse) -> Json<ApiResponse<LoginResponse>> {
    let message = format!("{} Login success", response.id);
    ApiResponse::with_message(message, response)
}

#[axum::debug_handler]
pub async fn login_patient(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<PatientLoginRequest>, AppError>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let response = LoginService::new(&state).login_patient(request).await?;
    Ok(login_success(response))
}

#[axum::debug_handler]
pub async fn login_doctor(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<DoctorLoginRequest>, AppError>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let response = LoginService::new(&state).login_doctor(request).await?;
    Ok(login_success(response))
}

#[axum::debug_handler]
pub async fn login_admin(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<AdminLoginRequest>, AppError>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let response = LoginService::new(&state).login_admin(request)?;
    Ok(login_success(response))
}

#[axum::debug_handler]
pub async fn current_session(
    State(state): State<Arc<AppState>>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<ApiResponse<Session>>, AppError> {
    let TypedHeader(Authorization(bearer)) =
        auth.ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    debug!("Decoding current session");
    let session = validate_token(bearer.token(), &state.config.session_secret)?;

    Ok(ApiResponse::ok(session))
}
