use serde::{Deserialize, Serialize};

use shared_models::error::AppError;
use shared_models::stats::CountBucket;
use shared_models::visit::VisitStatus;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisitRequest {
    pub patient_id: Option<String>,
    pub doctor_id: Option<String>,
    pub date_of_visit: Option<String>,
    pub visit_reason: Option<String>,
}

/// Body of a status change. `doctorRemarks` is required when the target is
/// `visited`; the prescription and follow-up date are optional extras.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVisitStatusRequest {
    #[serde(alias = "status")]
    pub visit_status: Option<String>,
    pub doctor_remarks: Option<String>,
    pub prescription: Option<String>,
    pub follow_up_date: Option<String>,
}

/// Status change addressed by (patient, doctor, date) instead of visit id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeStatusRequest {
    pub doctor_id: Option<String>,
    pub date_of_visit: Option<String>,
    #[serde(flatten)]
    pub update: UpdateVisitStatusRequest,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientVisitsQuery {
    pub patient_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorVisitStatistics {
    pub doctor_id: String,
    pub total_visits: i64,
    pub visits_by_status: Vec<CountBucket>,
    pub today_visits: i64,
    pub upcoming_visits: i64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VisitError {
    #[error("Invalid visit status '{0}': expected visited, missed or cancelled")]
    UnknownStatus(String),

    #[error("A visit cannot be moved back to pending")]
    PendingTarget,

    #[error("doctorRemarks is required when marking a visit as visited")]
    MissingRemarks,

    #[error("Visit is already {from} and cannot be marked {to}")]
    InvalidStatusTransition { from: VisitStatus, to: VisitStatus },

    #[error("Patients may only cancel their own visits")]
    PatientMayOnlyCancel,

    #[error("Unauthorized access to visit")]
    Unauthorized,
}

impl From<VisitError> for AppError {
    fn from(err: VisitError) -> Self {
        match err {
            VisitError::UnknownStatus(_) | VisitError::PendingTarget | VisitError::MissingRemarks => {
                AppError::ValidationError(err.to_string())
            }
            VisitError::InvalidStatusTransition { .. } => AppError::PreconditionFailed(err.to_string()),
            VisitError::PatientMayOnlyCancel | VisitError::Unauthorized => {
                AppError::Forbidden(err.to_string())
            }
        }
    }
}
