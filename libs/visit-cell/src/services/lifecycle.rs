use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{AppState, HospitalStore, VisitRepository};
use shared_models::auth::{Role, Session};
use shared_models::error::AppError;
use shared_models::identifier::IdentifierKind;
use shared_models::visit::{CompletionNote, TransitionOutcome, Visit, VisitStatus, VisitTransition};
use shared_utils::validation::{identifier, iso_date, optional_text, visit_datetime};

use crate::models::{CompositeStatusRequest, UpdateVisitStatusRequest, VisitError};

/// Rules for moving a visit out of `pending`, and the orchestration that
/// applies them. The store repeats the status check under a row lock, so a
/// concurrent transition that wins the race still ends in a rejection here.
pub struct VisitLifecycleService {
    store: Arc<dyn HospitalStore>,
}

impl VisitLifecycleService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(current: VisitStatus, target: VisitStatus) -> Result<(), VisitError> {
        debug!("Validating status transition from {} to {}", current, target);

        if !current.can_transition_to(target) {
            warn!("Invalid status transition attempted: {} -> {}", current, target);
            return Err(VisitError::InvalidStatusTransition {
                from: current,
                to: target,
            });
        }

        Ok(())
    }

    /// Parses the requested target and the completion details it needs.
    pub fn build_transition(request: UpdateVisitStatusRequest) -> Result<VisitTransition, AppError> {
        let raw = request
            .visit_status
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::ValidationError("visitStatus is required".to_string()))?;

        let target: VisitStatus = raw.parse().map_err(|_| VisitError::UnknownStatus(raw.clone()))?;

        match target {
            VisitStatus::Pending => Err(VisitError::PendingTarget.into()),
            VisitStatus::Missed => Ok(VisitTransition::Miss),
            VisitStatus::Cancelled => Ok(VisitTransition::Cancel),
            VisitStatus::Visited => Ok(VisitTransition::Complete(Self::completion_note(
                request.doctor_remarks,
                request.prescription,
                request.follow_up_date,
            )?)),
        }
    }

    pub fn completion_note(
        doctor_remarks: Option<String>,
        prescription: Option<String>,
        follow_up_date: Option<String>,
    ) -> Result<CompletionNote, AppError> {
        let doctor_remarks = optional_text(doctor_remarks).ok_or(VisitError::MissingRemarks)?;
        let follow_up_date = optional_text(follow_up_date)
            .map(|date| iso_date("followUpDate", &date))
            .transpose()?;

        Ok(CompletionNote {
            doctor_remarks,
            prescription: optional_text(prescription),
            follow_up_date,
        })
    }

    /// The visit's doctor and admins may apply any transition; the visit's
    /// patient may only cancel.
    pub fn authorize_transition(session: &Session, visit: &Visit, target: VisitStatus) -> Result<(), VisitError> {
        match session.role {
            Role::Admin => Ok(()),
            Role::Doctor if session.subject == visit.doctor_id => Ok(()),
            Role::Patient if session.subject == visit.patient_id => {
                if target == VisitStatus::Cancelled {
                    Ok(())
                } else {
                    Err(VisitError::PatientMayOnlyCancel)
                }
            }
            _ => Err(VisitError::Unauthorized),
        }
    }

    pub async fn transition(
        &self,
        session: &Session,
        visit_id: Uuid,
        transition: VisitTransition,
    ) -> Result<TransitionOutcome, AppError> {
        let visit = self
            .store
            .get_visit(visit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Visit not found".to_string()))?;

        let target = transition.target();
        Self::authorize_transition(session, &visit, target)?;
        Self::validate_status_transition(visit.visit_status, target)?;

        let outcome = self.store.transition_visit(visit_id, transition).await?;

        match &outcome.report {
            Some(report) => info!(
                "Visit {} completed by {} with report {}",
                visit_id, session.subject, report.report_id
            ),
            None => info!("Visit {} marked {} by {}", visit_id, target, session.subject),
        }

        Ok(outcome)
    }

    pub async fn update_status(
        &self,
        session: &Session,
        visit_id: &str,
        request: UpdateVisitStatusRequest,
    ) -> Result<TransitionOutcome, AppError> {
        let visit_id = parse_visit_id(visit_id)?;
        let transition = Self::build_transition(request)?;

        self.transition(session, visit_id, transition).await
    }

    /// Resolves (patient, doctor, date) to the visit's id, then behaves like
    /// [`Self::update_status`].
    pub async fn update_status_by_key(
        &self,
        session: &Session,
        patient_id: &str,
        request: CompositeStatusRequest,
    ) -> Result<TransitionOutcome, AppError> {
        let patient_id = identifier(IdentifierKind::Patient, patient_id)?;
        let doctor_id = optional_text(request.doctor_id)
            .ok_or_else(|| AppError::ValidationError("doctorId is required".to_string()))?;
        let doctor_id = identifier(IdentifierKind::Doctor, &doctor_id)?;
        let date_of_visit = optional_text(request.date_of_visit)
            .ok_or_else(|| AppError::ValidationError("dateOfVisit is required".to_string()))?;
        let date_of_visit = visit_datetime("dateOfVisit", &date_of_visit)?;

        let transition = Self::build_transition(request.update)?;

        let visit = self
            .store
            .find_visit_by_key(&patient_id, &doctor_id, date_of_visit)
            .await?
            .ok_or_else(|| AppError::NotFound("Visit not found".to_string()))?;

        self.transition(session, visit.visit_id, transition).await
    }
}

pub fn parse_visit_id(value: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| AppError::ValidationError(format!("Invalid visit id '{}'", value.trim())))
}
