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
use shared_models::report::Report;
use shared_models::response::ApiResponse;
use shared_models::visit::TransitionOutcome;

use crate::models::{CreateReportRequest, ReportListQuery};
use crate::services::ReportService;

#[axum::debug_handler]
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ApiResponse<Vec<Report>>>, AppError> {
    let service = ReportService::new(&state);

    let reports = service.list_reports(&session, query).await?;

    Ok(ApiResponse::ok(reports))
}

#[axum::debug_handler]
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(report_id): Path<String>,
) -> Result<Json<ApiResponse<Report>>, AppError> {
    let service = ReportService::new(&state);

    let report = service.get_report(&session, &report_id).await?;

    Ok(ApiResponse::ok(report))
}

#[axum::debug_handler]
pub async fn create_report(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    WithRejection(Json(request), _): WithRejection<Json<CreateReportRequest>, AppError>,
) -> Result<(StatusCode, Json<ApiResponse<TransitionOutcome>>), AppError> {
    let service = ReportService::new(&state);

    let outcome = service.create_report(&session, request).await?;

    Ok(ApiResponse::created("Report created successfully", outcome))
}
