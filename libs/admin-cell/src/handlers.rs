use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};

use shared_database::AppState;
use shared_models::auth::Session;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{DoctorStatistics, PatientStatistics, VisitStatistics};
use crate::services::StatisticsService;

#[axum::debug_handler]
pub async fn patient_statistics(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<ApiResponse<PatientStatistics>>, AppError> {
    let service = StatisticsService::new(&state);

    let stats = service.patient_statistics(&session).await?;

    Ok(ApiResponse::ok(stats))
}

#[axum::debug_handler]
pub async fn doctor_statistics(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<ApiResponse<DoctorStatistics>>, AppError> {
    let service = StatisticsService::new(&state);

    let stats = service.doctor_statistics(&session).await?;

    Ok(ApiResponse::ok(stats))
}

#[axum::debug_handler]
pub async fn visit_statistics(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<ApiResponse<VisitStatistics>>, AppError> {
    let service = StatisticsService::new(&state);

    let stats = service.visit_statistics(&session).await?;

    Ok(ApiResponse::ok(stats))
}
