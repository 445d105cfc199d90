use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use shared_database::AppState;
use shared_models::auth::Session;
use shared_models::error::AppError;
use shared_models::patient::Patient;
use shared_models::response::ApiResponse;

use crate::models::{CreatePatientRequest, UpdatePatientRequest};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    WithRejection(Json(request), _): WithRejection<Json<CreatePatientRequest>, AppError>,
) -> Result<(StatusCode, Json<ApiResponse<Patient>>), AppError> {
    let service = PatientService::new(&state);

    let patient = service.create_patient(&session, request).await?;

    Ok(ApiResponse::created("Patient registered successfully", patient))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<ApiResponse<Vec<Patient>>>, AppError> {
    let service = PatientService::new(&state);

    let patients = service.list_patients(&session).await?;

    Ok(ApiResponse::ok(patients))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(patient_id): Path<String>,
) -> Result<Json<ApiResponse<Patient>>, AppError> {
    let service = PatientService::new(&state);

    let patient = service.get_patient(&session, &patient_id).await?;

    Ok(ApiResponse::ok(patient))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(patient_id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<UpdatePatientRequest>, AppError>,
) -> Result<Json<ApiResponse<Patient>>, AppError> {
    let service = PatientService::new(&state);

    let patient = service.update_patient(&session, &patient_id, request).await?;

    Ok(ApiResponse::with_message("Patient updated successfully", patient))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(patient_id): Path<String>,
) -> Result<Json<ApiResponse<Patient>>, AppError> {
    let service = PatientService::new(&state);

    let patient = service.delete_patient(&session, &patient_id).await?;

    Ok(ApiResponse::with_message("Patient deleted successfully", patient))
}
