//! Storage seams. Every mutating method is atomic: either all of its effects
//! are visible afterwards or none are.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use shared_models::demographics::{BloodGroup, Gender};
use shared_models::doctor::{Doctor, DoctorPatch, NewDoctor};
use shared_models::patient::{NewPatient, Patient, PatientPatch};
use shared_models::report::Report;
use shared_models::stats::VisitSummary;
use shared_models::visit::{DoctorVisitView, NewVisit, TransitionOutcome, Visit, VisitStatus, VisitTransition};

use crate::error::StoreResult;

#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Allocates the next `p` identifier and inserts the patient.
    async fn insert_patient(&self, patient: NewPatient) -> StoreResult<Patient>;

    async fn list_patients(&self) -> StoreResult<Vec<Patient>>;

    async fn get_patient(&self, patient_id: &str) -> StoreResult<Option<Patient>>;

    /// Returns `None` when the patient does not exist.
    async fn update_patient(&self, patient_id: &str, patch: PatientPatch) -> StoreResult<Option<Patient>>;

    /// Fails with `StillReferenced` while any visit references the patient.
    async fn delete_patient(&self, patient_id: &str) -> StoreResult<Patient>;
}

#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Allocates the next `d` identifier and inserts the doctor.
    async fn insert_doctor(&self, doctor: NewDoctor) -> StoreResult<Doctor>;

    async fn list_doctors(&self, available_only: bool) -> StoreResult<Vec<Doctor>>;

    async fn get_doctor(&self, doctor_id: &str) -> StoreResult<Option<Doctor>>;

    async fn update_doctor(&self, doctor_id: &str, patch: DoctorPatch) -> StoreResult<Option<Doctor>>;

    /// Fails with `StillReferenced` while any visit references the doctor.
    async fn delete_doctor(&self, doctor_id: &str) -> StoreResult<Doctor>;
}

#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Inserts a `pending` visit after checking both participants exist and
    /// the doctor is available.
    async fn create_visit(&self, visit: NewVisit) -> StoreResult<Visit>;

    async fn list_visits(&self) -> StoreResult<Vec<Visit>>;

    async fn get_visit(&self, visit_id: Uuid) -> StoreResult<Option<Visit>>;

    async fn find_visit_by_key(
        &self,
        patient_id: &str,
        doctor_id: &str,
        date_of_visit: DateTime<Utc>,
    ) -> StoreResult<Option<Visit>>;

    /// Moves a `pending` visit to a terminal state. Completing a visit also
    /// allocates and inserts its report in the same unit of work.
    async fn transition_visit(&self, visit_id: Uuid, transition: VisitTransition) -> StoreResult<TransitionOutcome>;

    async fn doctor_visits(&self, doctor_id: &str, view: DoctorVisitView) -> StoreResult<Vec<Visit>>;

    async fn patient_visits(&self, patient_id: &str, status: Option<VisitStatus>) -> StoreResult<Vec<Visit>>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn list_reports(&self, patient_id: Option<&str>) -> StoreResult<Vec<Report>>;

    async fn get_report(&self, report_id: &str) -> StoreResult<Option<Report>>;
}

#[async_trait]
pub trait StatisticsRepository: Send + Sync {
    async fn count_patients(&self) -> StoreResult<i64>;

    async fn patient_counts_by_gender(&self) -> StoreResult<Vec<(Gender, i64)>>;

    async fn patient_counts_by_blood_group(&self) -> StoreResult<Vec<(BloodGroup, i64)>>;

    /// Patient counts keyed by whole years of age on `today`.
    async fn patient_counts_by_age(&self, today: NaiveDate) -> StoreResult<Vec<(i32, i64)>>;

    async fn recently_updated_patients(&self, limit: i64) -> StoreResult<Vec<Patient>>;

    async fn count_doctors(&self, available_only: bool) -> StoreResult<i64>;

    async fn doctor_counts_by_specialization(&self) -> StoreResult<Vec<(String, i64)>>;

    async fn doctor_counts_by_gender(&self) -> StoreResult<Vec<(Gender, i64)>>;

    async fn visit_counts_by_status(&self, doctor_id: Option<&str>) -> StoreResult<Vec<(VisitStatus, i64)>>;

    /// `(doctor_id, doctor_name, visits)` for the busiest doctors, including
    /// doctors without visits.
    async fn visit_counts_by_doctor(&self, limit: i64) -> StoreResult<Vec<(String, String, i64)>>;

    /// Keyed by ISO day of week (1 = Monday), UTC.
    async fn visit_counts_by_weekday(&self) -> StoreResult<Vec<(i32, i64)>>;

    /// Keyed by month number (1 = January), UTC.
    async fn visit_counts_by_month(&self) -> StoreResult<Vec<(i32, i64)>>;

    async fn recent_visits(&self, limit: i64) -> StoreResult<Vec<VisitSummary>>;
}

pub trait HospitalStore:
    PatientRepository + DoctorRepository + VisitRepository + ReportRepository + StatisticsRepository
{
}

impl<T> HospitalStore for T where
    T: PatientRepository + DoctorRepository + VisitRepository + ReportRepository + StatisticsRepository
{
}
