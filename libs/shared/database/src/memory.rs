//! Process-local store backed by ordered maps.
//!
//! Used when no `DATABASE_URL` is configured and by the test suites. A single
//! lock guards every table, so each repository call is one atomic unit of
//! work, matching the transactional behaviour of [`crate::postgres::PgStore`].

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::demographics::{BloodGroup, Gender};
use shared_models::doctor::{Doctor, DoctorPatch, NewDoctor};
use shared_models::identifier::{next_identifier, IdentifierKind};
use shared_models::patient::{NewPatient, Patient, PatientPatch};
use shared_models::report::Report;
use shared_models::stats::VisitSummary;
use shared_models::visit::{
    DoctorVisitView, NewVisit, TransitionOutcome, Visit, VisitStatus, VisitTransition,
};

use crate::error::{StoreError, StoreResult};
use crate::repository::{
    DoctorRepository, PatientRepository, ReportRepository, StatisticsRepository, VisitRepository,
};

#[derive(Default)]
struct Tables {
    patients: BTreeMap<String, Patient>,
    doctors: BTreeMap<String, Doctor>,
    visits: BTreeMap<Uuid, Visit>,
    reports: BTreeMap<String, Report>,
}

impl Tables {
    fn allocate(&self, kind: IdentifierKind) -> StoreResult<String> {
        let last = match kind {
            IdentifierKind::Patient => self.patients.keys().next_back(),
            IdentifierKind::Doctor => self.doctors.keys().next_back(),
            IdentifierKind::Report => self.reports.keys().next_back(),
        };
        Ok(next_identifier(kind, last.map(String::as_str))?)
    }

    fn referenced_by_visit(&self, matches: impl Fn(&Visit) -> bool) -> bool {
        self.visits.values().any(matches)
    }

    fn sorted_visits(&self, filter: impl Fn(&Visit) -> bool) -> Vec<Visit> {
        let mut visits: Vec<Visit> = self.visits.values().filter(|v| filter(v)).cloned().collect();
        visits.sort_by(|a, b| a.date_of_visit.cmp(&b.date_of_visit));
        visits
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        info!("Using in-memory store; data will not survive a restart");
        Self::default()
    }

    /// Seeds a stored identifier verbatim, bypassing allocation. Lets tests
    /// exercise allocation near the end of an identifier space.
    pub async fn insert_doctor_with_id(&self, doctor: Doctor) {
        let mut tables = self.tables.write().await;
        tables.doctors.insert(doctor.doctor_id.clone(), doctor);
    }

    pub async fn insert_report_with_id(&self, report: Report) {
        let mut tables = self.tables.write().await;
        tables.reports.insert(report.report_id.clone(), report);
    }
}

fn count_by<K: Ord, T>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<(K, i64)> {
    let mut counts: BTreeMap<K, i64> = BTreeMap::new();
    for item in items {
        *counts.entry(key(&item)).or_default() += 1;
    }
    counts.into_iter().collect()
}

#[async_trait]
impl PatientRepository for MemoryStore {
    async fn insert_patient(&self, patient: NewPatient) -> StoreResult<Patient> {
        let mut tables = self.tables.write().await;
        let patient_id = tables.allocate(IdentifierKind::Patient)?;

        let created = Patient {
            patient_id: patient_id.clone(),
            patient_name: patient.name,
            patient_dob: patient.date_of_birth,
            patient_address: patient.address,
            patient_contact: patient.contact,
            patient_gender: patient.gender,
            patient_blood_group: patient.blood_group,
            patient_height: patient.height,
            patient_weight: patient.weight,
            patient_updated_at: Utc::now(),
        };
        tables.patients.insert(patient_id, created.clone());

        debug!("Inserted patient {}", created.patient_id);
        Ok(created)
    }

    async fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        Ok(self.tables.read().await.patients.values().cloned().collect())
    }

    async fn get_patient(&self, patient_id: &str) -> StoreResult<Option<Patient>> {
        Ok(self.tables.read().await.patients.get(patient_id).cloned())
    }

    async fn update_patient(&self, patient_id: &str, patch: PatientPatch) -> StoreResult<Option<Patient>> {
        let mut tables = self.tables.write().await;
        Ok(tables.patients.get_mut(patient_id).map(|patient| {
            patch.apply_to(patient);
            patient.patient_updated_at = Utc::now();
            patient.clone()
        }))
    }

    async fn delete_patient(&self, patient_id: &str) -> StoreResult<Patient> {
        let mut tables = self.tables.write().await;

        if !tables.patients.contains_key(patient_id) {
            return Err(StoreError::not_found("patient", patient_id));
        }
        if tables.referenced_by_visit(|v| v.patient_id == patient_id) {
            return Err(StoreError::StillReferenced {
                entity: "patient",
                id: patient_id.to_string(),
            });
        }

        tables
            .patients
            .remove(patient_id)
            .ok_or_else(|| StoreError::not_found("patient", patient_id))
    }
}

#[async_trait]
impl DoctorRepository for MemoryStore {
    async fn insert_doctor(&self, doctor: NewDoctor) -> StoreResult<Doctor> {
        let mut tables = self.tables.write().await;
        let doctor_id = tables.allocate(IdentifierKind::Doctor)?;

        let created = Doctor {
            doctor_id: doctor_id.clone(),
            doctor_name: doctor.name,
            doctor_specialization: doctor.specialization,
            doctor_date_of_birth: doctor.date_of_birth,
            doctor_contact: doctor.contact,
            doctor_address: doctor.address,
            doctor_gender: doctor.gender,
            doctor_is_available: doctor.is_available,
        };
        tables.doctors.insert(doctor_id, created.clone());

        debug!("Inserted doctor {}", created.doctor_id);
        Ok(created)
    }

    async fn list_doctors(&self, available_only: bool) -> StoreResult<Vec<Doctor>> {
        Ok(self
            .tables
            .read()
            .await
            .doctors
            .values()
            .filter(|d| !available_only || d.doctor_is_available)
            .cloned()
            .collect())
    }

    async fn get_doctor(&self, doctor_id: &str) -> StoreResult<Option<Doctor>> {
        Ok(self.tables.read().await.doctors.get(doctor_id).cloned())
    }

    async fn update_doctor(&self, doctor_id: &str, patch: DoctorPatch) -> StoreResult<Option<Doctor>> {
        let mut tables = self.tables.write().await;
        Ok(tables.doctors.get_mut(doctor_id).map(|doctor| {
            patch.apply_to(doctor);
            doctor.clone()
        }))
    }

    async fn delete_doctor(&self, doctor_id: &str) -> StoreResult<Doctor> {
        let mut tables = self.tables.write().await;

        if !tables.doctors.contains_key(doctor_id) {
            return Err(StoreError::not_found("doctor", doctor_id));
        }
        if tables.referenced_by_visit(|v| v.doctor_id == doctor_id) {
            return Err(StoreError::StillReferenced {
                entity: "doctor",
                id: doctor_id.to_string(),
            });
        }

        tables
            .doctors
            .remove(doctor_id)
            .ok_or_else(|| StoreError::not_found("doctor", doctor_id))
    }
}

#[async_trait]
impl VisitRepository for MemoryStore {
    async fn create_visit(&self, visit: NewVisit) -> StoreResult<Visit> {
        let mut tables = self.tables.write().await;

        if !tables.patients.contains_key(&visit.patient_id) {
            return Err(StoreError::not_found("patient", visit.patient_id));
        }
        match tables.doctors.get(&visit.doctor_id) {
            None => return Err(StoreError::not_found("doctor", visit.doctor_id)),
            Some(doctor) if !doctor.doctor_is_available => {
                return Err(StoreError::DoctorUnavailable(visit.doctor_id))
            }
            Some(_) => {}
        }

        let duplicate = tables.referenced_by_visit(|v| {
            v.patient_id == visit.patient_id
                && v.doctor_id == visit.doctor_id
                && v.date_of_visit == visit.date_of_visit
        });
        if duplicate {
            return Err(StoreError::DuplicateVisit {
                patient_id: visit.patient_id,
                doctor_id: visit.doctor_id,
            });
        }

        let created = Visit {
            visit_id: Uuid::new_v4(),
            patient_id: visit.patient_id,
            doctor_id: visit.doctor_id,
            date_of_visit: visit.date_of_visit,
            visit_status: VisitStatus::Pending,
            visit_reason: visit.visit_reason,
            report_id: None,
            created_at: Utc::now(),
        };
        tables.visits.insert(created.visit_id, created.clone());

        debug!("Created visit {}", created.visit_id);
        Ok(created)
    }

    async fn list_visits(&self) -> StoreResult<Vec<Visit>> {
        let tables = self.tables.read().await;
        let mut visits = tables.sorted_visits(|_| true);
        visits.reverse();
        Ok(visits)
    }

    async fn get_visit(&self, visit_id: Uuid) -> StoreResult<Option<Visit>> {
        Ok(self.tables.read().await.visits.get(&visit_id).cloned())
    }

    async fn find_visit_by_key(
        &self,
        patient_id: &str,
        doctor_id: &str,
        date_of_visit: DateTime<Utc>,
    ) -> StoreResult<Option<Visit>> {
        Ok(self
            .tables
            .read()
            .await
            .visits
            .values()
            .find(|v| {
                v.patient_id == patient_id
                    && v.doctor_id == doctor_id
                    && v.date_of_visit == date_of_visit
            })
            .cloned())
    }

    async fn transition_visit(&self, visit_id: Uuid, transition: VisitTransition) -> StoreResult<TransitionOutcome> {
        let mut tables = self.tables.write().await;

        let current = tables
            .visits
            .get(&visit_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("visit", visit_id.to_string()))?;

        let target = transition.target();
        if !current.visit_status.can_transition_to(target) {
            return Err(StoreError::InvalidTransition {
                visit_id: visit_id.to_string(),
                from: current.visit_status,
                to: target,
            });
        }

        // Allocate before touching any table so a failure leaves no trace.
        let report = match transition {
            VisitTransition::Complete(note) => Some(Report {
                report_id: tables.allocate(IdentifierKind::Report)?,
                visit_id,
                patient_id: current.patient_id.clone(),
                doctor_id: current.doctor_id.clone(),
                date_of_visit: current.date_of_visit,
                doctor_remarks: note.doctor_remarks,
                prescription: note.prescription,
                follow_up_date: note.follow_up_date,
                created_at: Utc::now(),
            }),
            VisitTransition::Miss | VisitTransition::Cancel => None,
        };

        let mut visit = current;
        visit.visit_status = target;
        visit.report_id = report.as_ref().map(|r| r.report_id.clone());

        if let Some(report) = &report {
            tables.reports.insert(report.report_id.clone(), report.clone());
        }
        tables.visits.insert(visit_id, visit.clone());

        info!("Visit {} moved to {}", visit_id, target);
        Ok(TransitionOutcome { visit, report })
    }

    async fn doctor_visits(&self, doctor_id: &str, view: DoctorVisitView) -> StoreResult<Vec<Visit>> {
        let tables = self.tables.read().await;
        let mut visits = tables.sorted_visits(|v| v.doctor_id == doctor_id && view.matches(v));

        if view.most_recent_first() {
            visits.reverse();
        }
        if let Some(limit) = view.limit() {
            visits.truncate(limit);
        }
        Ok(visits)
    }

    async fn patient_visits(&self, patient_id: &str, status: Option<VisitStatus>) -> StoreResult<Vec<Visit>> {
        let tables = self.tables.read().await;
        Ok(tables.sorted_visits(|v| {
            v.patient_id == patient_id && status.map_or(true, |s| v.visit_status == s)
        }))
    }
}

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn list_reports(&self, patient_id: Option<&str>) -> StoreResult<Vec<Report>> {
        let tables = self.tables.read().await;
        let mut reports: Vec<Report> = tables
            .reports
            .values()
            .filter(|r| patient_id.map_or(true, |id| r.patient_id == id))
            .cloned()
            .collect();
        reports.sort_by(|a, b| {
            b.date_of_visit
                .cmp(&a.date_of_visit)
                .then_with(|| b.report_id.cmp(&a.report_id))
        });
        Ok(reports)
    }

    async fn get_report(&self, report_id: &str) -> StoreResult<Option<Report>> {
        Ok(self.tables.read().await.reports.get(report_id).cloned())
    }
}

#[async_trait]
impl StatisticsRepository for MemoryStore {
    async fn count_patients(&self) -> StoreResult<i64> {
        Ok(self.tables.read().await.patients.len() as i64)
    }

    async fn patient_counts_by_gender(&self) -> StoreResult<Vec<(Gender, i64)>> {
        let tables = self.tables.read().await;
        Ok(count_by(tables.patients.values(), |p| p.patient_gender))
    }

    async fn patient_counts_by_blood_group(&self) -> StoreResult<Vec<(BloodGroup, i64)>> {
        let tables = self.tables.read().await;
        Ok(count_by(tables.patients.values(), |p| p.patient_blood_group))
    }

    async fn patient_counts_by_age(&self, today: NaiveDate) -> StoreResult<Vec<(i32, i64)>> {
        let tables = self.tables.read().await;
        Ok(count_by(tables.patients.values(), |p| p.age_on(today) as i32))
    }

    async fn recently_updated_patients(&self, limit: i64) -> StoreResult<Vec<Patient>> {
        let tables = self.tables.read().await;
        let mut patients: Vec<Patient> = tables.patients.values().cloned().collect();
        patients.sort_by(|a, b| {
            b.patient_updated_at
                .cmp(&a.patient_updated_at)
                .then_with(|| b.patient_id.cmp(&a.patient_id))
        });
        patients.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(patients)
    }

    async fn count_doctors(&self, available_only: bool) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .doctors
            .values()
            .filter(|d| !available_only || d.doctor_is_available)
            .count() as i64)
    }

    async fn doctor_counts_by_specialization(&self) -> StoreResult<Vec<(String, i64)>> {
        let tables = self.tables.read().await;
        let mut counts = count_by(tables.doctors.values(), |d| d.doctor_specialization.clone());
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(counts)
    }

    async fn doctor_counts_by_gender(&self) -> StoreResult<Vec<(Gender, i64)>> {
        let tables = self.tables.read().await;
        Ok(count_by(tables.doctors.values(), |d| d.doctor_gender))
    }

    async fn visit_counts_by_status(&self, doctor_id: Option<&str>) -> StoreResult<Vec<(VisitStatus, i64)>> {
        let tables = self.tables.read().await;
        let visits = tables
            .visits
            .values()
            .filter(|v| doctor_id.map_or(true, |id| v.doctor_id == id));
        Ok(count_by(visits, |v| v.visit_status))
    }

    async fn visit_counts_by_doctor(&self, limit: i64) -> StoreResult<Vec<(String, String, i64)>> {
        let tables = self.tables.read().await;

        let mut per_doctor: HashMap<&str, i64> = HashMap::new();
        for visit in tables.visits.values() {
            *per_doctor.entry(visit.doctor_id.as_str()).or_default() += 1;
        }

        let mut counts: Vec<(String, String, i64)> = tables
            .doctors
            .values()
            .map(|d| {
                let visits = per_doctor.get(d.doctor_id.as_str()).copied().unwrap_or(0);
                (d.doctor_id.clone(), d.doctor_name.clone(), visits)
            })
            .collect();
        counts.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(counts)
    }

    async fn visit_counts_by_weekday(&self) -> StoreResult<Vec<(i32, i64)>> {
        let tables = self.tables.read().await;
        Ok(count_by(tables.visits.values(), |v| {
            v.date_of_visit.weekday().number_from_monday() as i32
        }))
    }

    async fn visit_counts_by_month(&self) -> StoreResult<Vec<(i32, i64)>> {
        let tables = self.tables.read().await;
        Ok(count_by(tables.visits.values(), |v| v.date_of_visit.month() as i32))
    }

    async fn recent_visits(&self, limit: i64) -> StoreResult<Vec<VisitSummary>> {
        let tables = self.tables.read().await;
        let mut visits = tables.sorted_visits(|_| true);
        visits.reverse();

        Ok(visits
            .into_iter()
            .filter_map(|v| {
                let patient = tables.patients.get(&v.patient_id)?;
                let doctor = tables.doctors.get(&v.doctor_id)?;
                Some(VisitSummary {
                    visit_id: v.visit_id,
                    patient_id: v.patient_id,
                    patient_name: patient.patient_name.clone(),
                    doctor_id: v.doctor_id,
                    doctor_name: doctor.doctor_name.clone(),
                    date_of_visit: v.date_of_visit,
                    visit_status: v.visit_status,
                    visit_reason: v.visit_reason,
                })
            })
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }
}
