use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListQuery {
    pub patient_id: Option<String>,
}

/// Explicit report creation. Completes the referenced visit exactly as a
/// `visited` status update would; `patientId` and `doctorId` are optional
/// cross-checks against the visit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub visit_id: Option<String>,
    pub patient_id: Option<String>,
    pub doctor_id: Option<String>,
    pub doctor_remarks: Option<String>,
    pub prescription: Option<String>,
    pub follow_up_date: Option<String>,
}
