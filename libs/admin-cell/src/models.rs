use serde::{Deserialize, Serialize};

use shared_models::patient::Patient;
use shared_models::stats::{CountBucket, VisitSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientStatistics {
    pub total_patients: i64,
    pub patients_by_gender: Vec<CountBucket>,
    pub patients_by_blood_group: Vec<CountBucket>,
    pub patients_by_age_group: Vec<CountBucket>,
    pub recently_added_patients: Vec<Patient>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorStatistics {
    pub total_doctors: i64,
    pub available_doctors: i64,
    pub doctors_by_specialization: Vec<CountBucket>,
    pub doctors_by_gender: Vec<CountBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorVisitCount {
    pub doctor_id: String,
    pub doctor_name: String,
    pub visit_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitStatistics {
    pub total_visits: i64,
    pub visits_by_status: Vec<CountBucket>,
    pub visits_by_doctor: Vec<DoctorVisitCount>,
    pub visits_by_day: Vec<CountBucket>,
    pub visits_by_month: Vec<CountBucket>,
    pub recent_visits: Vec<VisitSummary>,
}
