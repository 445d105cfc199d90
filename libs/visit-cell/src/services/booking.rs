use std::sync::Arc;

use tracing::{debug, info};

use shared_database::{AppState, HospitalStore, VisitRepository};
use shared_models::auth::Session;
use shared_models::error::AppError;
use shared_models::identifier::IdentifierKind;
use shared_models::visit::{NewVisit, Visit};
use shared_utils::extractor::{require_admin, require_patient_access};
use shared_utils::validation::{identifier, optional_text, required_text, visit_datetime};

use crate::models::CreateVisitRequest;
use crate::services::lifecycle::parse_visit_id;

pub fn validate_new_visit(request: CreateVisitRequest) -> Result<NewVisit, AppError> {
    let patient_id = required_text("patientId", request.patient_id)?;
    let doctor_id = required_text("doctorId", request.doctor_id)?;
    let date_of_visit = required_text("dateOfVisit", request.date_of_visit)?;

    Ok(NewVisit {
        patient_id: identifier(IdentifierKind::Patient, &patient_id)?,
        doctor_id: identifier(IdentifierKind::Doctor, &doctor_id)?,
        date_of_visit: visit_datetime("dateOfVisit", &date_of_visit)?,
        visit_reason: optional_text(request.visit_reason),
    })
}

pub struct VisitBookingService {
    store: Arc<dyn HospitalStore>,
}

impl VisitBookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    pub async fn create_visit(&self, session: &Session, request: CreateVisitRequest) -> Result<Visit, AppError> {
        let new_visit = validate_new_visit(request)?;
        require_patient_access(session, &new_visit.patient_id)?;

        debug!(
            "Booking visit for {} with {} at {}",
            new_visit.patient_id, new_visit.doctor_id, new_visit.date_of_visit
        );

        let visit = self.store.create_visit(new_visit).await?;

        info!(
            "Visit {} booked for {} with {}",
            visit.visit_id, visit.patient_id, visit.doctor_id
        );
        Ok(visit)
    }

    /// Visible to the visit's patient, its doctor and admins.
    pub async fn get_visit(&self, session: &Session, visit_id: &str) -> Result<Visit, AppError> {
        let visit_id = parse_visit_id(visit_id)?;

        let visit = self
            .store
            .get_visit(visit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Visit not found".to_string()))?;

        if session.is_admin() || session.is_patient(&visit.patient_id) || session.is_doctor(&visit.doctor_id) {
            Ok(visit)
        } else {
            Err(AppError::Forbidden("Not authorized to view this visit".to_string()))
        }
    }

    pub async fn list_visits(&self, session: &Session) -> Result<Vec<Visit>, AppError> {
        require_admin(session)?;

        Ok(self.store.list_visits().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request(patient: &str, doctor: &str, date: &str) -> CreateVisitRequest {
        CreateVisitRequest {
            patient_id: Some(patient.to_string()),
            doctor_id: Some(doctor.to_string()),
            date_of_visit: Some(date.to_string()),
            visit_reason: Some("  ".to_string()),
        }
    }

    #[test]
    fn accepts_naive_and_offset_datetimes() {
        let visit = validate_new_visit(request("p00001", "d001", "2026-03-02T09:30")).unwrap();
        assert_eq!(visit.date_of_visit.to_rfc3339(), "2026-03-02T09:30:00+00:00");
        assert_eq!(visit.visit_reason, None);

        let visit = validate_new_visit(request("p00001", "d001", "2026-03-02T09:30:00+02:00")).unwrap();
        assert_eq!(visit.date_of_visit.to_rfc3339(), "2026-03-02T07:30:00+00:00");
    }

    #[test]
    fn rejects_missing_and_malformed_fields() {
        assert_matches!(
            validate_new_visit(CreateVisitRequest::default()),
            Err(AppError::ValidationError(msg)) if msg.contains("patientId")
        );
        assert_matches!(
            validate_new_visit(request("p1", "d001", "2026-03-02T09:30")),
            Err(AppError::ValidationError(_))
        );
        assert_matches!(
            validate_new_visit(request("p00001", "d001", "tomorrow")),
            Err(AppError::ValidationError(_))
        );
    }
}
