use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use shared_database::AppState;
use shared_models::auth::Session;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;
use shared_models::visit::{TransitionOutcome, Visit};

use crate::models::{
    CompositeStatusRequest, CreateVisitRequest, DoctorVisitStatistics, PatientVisitsQuery,
    UpdateVisitStatusRequest,
};
use crate::services::{VisitBookingService, VisitLifecycleService, VisitScheduleService};

fn status_message(outcome: &TransitionOutcome) -> String {
    format!("Visit marked as {}", outcome.visit.visit_status)
}

#[axum::debug_handler]
pub async fn create_visit(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    WithRejection(Json(request), _): WithRejection<Json<CreateVisitRequest>, AppError>,
) -> Result<(StatusCode, Json<ApiResponse<Visit>>), AppError> {
    let service = VisitBookingService::new(&state);

    let visit = service.create_visit(&session, request).await?;

    Ok(ApiResponse::created("Visit booked successfully", visit))
}

#[axum::debug_handler]
pub async fn list_visits(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<ApiResponse<Vec<Visit>>>, AppError> {
    let service = VisitBookingService::new(&state);

    let visits = service.list_visits(&session).await?;

    Ok(ApiResponse::ok(visits))
}

#[axum::debug_handler]
pub async fn get_visit(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(visit_id): Path<String>,
) -> Result<Json<ApiResponse<Visit>>, AppError> {
    let service = VisitBookingService::new(&state);

    let visit = service.get_visit(&session, &visit_id).await?;

    Ok(ApiResponse::ok(visit))
}

#[axum::debug_handler]
pub async fn update_visit_status(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(visit_id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateVisitStatusRequest>, AppError>,
) -> Result<Json<ApiResponse<TransitionOutcome>>, AppError> {
    let service = VisitLifecycleService::new(&state);

    let outcome = service.update_status(&session, &visit_id, request).await?;

    Ok(ApiResponse::with_message(status_message(&outcome), outcome))
}

#[axum::debug_handler]
pub async fn update_visit_status_by_key(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(patient_id): Path<String>,
    WithRejection(Json(request), _): WithRejection<Json<CompositeStatusRequest>, AppError>,
) -> Result<Json<ApiResponse<TransitionOutcome>>, AppError> {
    let service = VisitLifecycleService::new(&state);

    let outcome = service.update_status_by_key(&session, &patient_id, request).await?;

    Ok(ApiResponse::with_message(status_message(&outcome), outcome))
}

#[axum::debug_handler]
pub async fn doctor_all_pending(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(doctor_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Visit>>>, AppError> {
    let service = VisitScheduleService::new(&state);

    let visits = service.all_pending(&session, &doctor_id).await?;

    Ok(ApiResponse::ok(visits))
}

#[axum::debug_handler]
pub async fn doctor_today(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(doctor_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Visit>>>, AppError> {
    let service = VisitScheduleService::new(&state);

    let visits = service.today(&session, &doctor_id).await?;

    Ok(ApiResponse::ok(visits))
}

#[axum::debug_handler]
pub async fn doctor_upcoming(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(doctor_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Visit>>>, AppError> {
    let service = VisitScheduleService::new(&state);

    let visits = service.upcoming(&session, &doctor_id).await?;

    Ok(ApiResponse::ok(visits))
}

#[axum::debug_handler]
pub async fn doctor_past(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(doctor_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Visit>>>, AppError> {
    let service = VisitScheduleService::new(&state);

    let visits = service.past(&session, &doctor_id).await?;

    Ok(ApiResponse::ok(visits))
}

#[axum::debug_handler]
pub async fn doctor_statistics(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(doctor_id): Path<String>,
) -> Result<Json<ApiResponse<DoctorVisitStatistics>>, AppError> {
    let service = VisitScheduleService::new(&state);

    let stats = service.statistics(&session, &doctor_id).await?;

    Ok(ApiResponse::ok(stats))
}

#[axum::debug_handler]
pub async fn patient_pending(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(query): Query<PatientVisitsQuery>,
) -> Result<Json<ApiResponse<Vec<Visit>>>, AppError> {
    let service = VisitScheduleService::new(&state);

    let visits = service.patient_pending(&session, query).await?;

    Ok(ApiResponse::ok(visits))
}
