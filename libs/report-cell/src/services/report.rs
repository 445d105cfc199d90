use std::sync::Arc;

use tracing::{debug, info};

use shared_database::{AppState, HospitalStore, ReportRepository, VisitRepository};
use shared_models::auth::{Role, Session};
use shared_models::error::AppError;
use shared_models::identifier::IdentifierKind;
use shared_models::report::Report;
use shared_models::visit::{TransitionOutcome, Visit, VisitTransition};
use shared_utils::validation::{identifier, optional_text, required_text};
use visit_cell::services::lifecycle::parse_visit_id;
use visit_cell::services::VisitLifecycleService;

use crate::models::{CreateReportRequest, ReportListQuery};

/// Which patient's reports a caller may list. Patients only ever see their
/// own; staff may filter or list everything.
pub fn resolve_patient_filter(session: &Session, requested: Option<String>) -> Result<Option<String>, AppError> {
    let requested = optional_text(requested)
        .map(|id| identifier(IdentifierKind::Patient, &id))
        .transpose()?;

    match (session.role, requested) {
        (Role::Patient, Some(id)) if id != session.subject => Err(AppError::Forbidden(
            "Patients may only view their own reports".to_string(),
        )),
        (Role::Patient, _) => Ok(Some(session.subject.clone())),
        (_, requested) => Ok(requested),
    }
}

/// Optional participant ids in a report request must name the visit's own.
pub fn check_participants(visit: &Visit, patient_id: Option<String>, doctor_id: Option<String>) -> Result<(), AppError> {
    if let Some(patient_id) = optional_text(patient_id) {
        if patient_id != visit.patient_id {
            return Err(AppError::ValidationError(
                "patientId does not match the visit".to_string(),
            ));
        }
    }
    if let Some(doctor_id) = optional_text(doctor_id) {
        if doctor_id != visit.doctor_id {
            return Err(AppError::ValidationError(
                "doctorId does not match the visit".to_string(),
            ));
        }
    }
    Ok(())
}

pub struct ReportService {
    store: Arc<dyn HospitalStore>,
    lifecycle: VisitLifecycleService,
}

impl ReportService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
            lifecycle: VisitLifecycleService::new(state),
        }
    }

    pub async fn list_reports(&self, session: &Session, query: ReportListQuery) -> Result<Vec<Report>, AppError> {
        let patient_id = resolve_patient_filter(session, query.patient_id)?;
        debug!("Listing reports for {:?}", patient_id);

        Ok(self.store.list_reports(patient_id.as_deref()).await?)
    }

    pub async fn get_report(&self, session: &Session, report_id: &str) -> Result<Report, AppError> {
        let report_id = identifier(IdentifierKind::Report, report_id)?;

        let report = self
            .store
            .get_report(&report_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

        if session.is_admin() || session.is_patient(&report.patient_id) || session.is_doctor(&report.doctor_id) {
            Ok(report)
        } else {
            Err(AppError::Forbidden("Not authorized to view this report".to_string()))
        }
    }

    /// Completes the visit and returns the report written with it.
    pub async fn create_report(&self, session: &Session, request: CreateReportRequest) -> Result<TransitionOutcome, AppError> {
        let visit_id = required_text("visitId", request.visit_id)?;
        let visit_id = parse_visit_id(&visit_id)?;
        let note = VisitLifecycleService::completion_note(
            request.doctor_remarks,
            request.prescription,
            request.follow_up_date,
        )?;

        let visit = self
            .store
            .get_visit(visit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Visit not found".to_string()))?;
        check_participants(&visit, request.patient_id, request.doctor_id)?;

        let outcome = self
            .lifecycle
            .transition(session, visit_id, VisitTransition::Complete(note))
            .await?;

        if let Some(report) = &outcome.report {
            info!("Report {} written for visit {}", report.report_id, visit_id);
        }
        Ok(outcome)
    }
}
