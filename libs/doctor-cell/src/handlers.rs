use std::sync::Arc;

use axum::{
    extract::{Path, State, Extension},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use shared_database::AppState;
use shared_models::auth::Session;
use shared_models::doctor::Doctor;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{CreateDoctorRequest, UpdateDoctorRequest};
use crate::services::doctor::DoctorService;

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    WithRejection(Json(request), _): WithRejection<Json<CreateDoctorRequest>, AppError>,
) -> Result<(StatusCode, Json<ApiResponse<Doctor>>), AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.create_doctor(&session, request).await?;

    Ok(ApiResponse::created("Doctor registered successfully", doctor))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Doctor>>>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.list_doctors(false).await?;

    Ok(ApiResponse::ok(doctors))
}

#[axum::debug_handler]
pub async fn list_available_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Doctor>>>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.list_doctors(true).await?;

    Ok(ApiResponse::ok(doctors))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<ApiResponse<Doctor>>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.get_doctor(&doctor_id).await?;

    Ok(ApiResponse::ok(doctor))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(doctor_id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateDoctorRequest>, AppError>,
) -> Result<Json<ApiResponse<Doctor>>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.update_doctor(&session, &doctor_id, request).await?;

    Ok(ApiResponse::with_message("Doctor updated successfully", doctor))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(doctor_id): Path<String>,
) -> Result<Json<ApiResponse<Doctor>>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.delete_doctor(&session, &doctor_id).await?;

    Ok(ApiResponse::with_message("Doctor deleted successfully", doctor))
}
