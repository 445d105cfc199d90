use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use shared_database::{AppState, DoctorRepository, HospitalStore, StatisticsRepository, VisitRepository};
use shared_models::auth::Session;
use shared_models::error::AppError;
use shared_models::identifier::IdentifierKind;
use shared_models::stats::CountBucket;
use shared_models::visit::{DoctorVisitView, Visit, VisitStatus};
use shared_utils::extractor::{require_doctor_access, require_patient_access};
use shared_utils::validation::{identifier, required_text};

use crate::models::{DoctorVisitStatistics, PatientVisitsQuery};

/// Read-only views over a doctor's or a patient's visits.
pub struct VisitScheduleService {
    store: Arc<dyn HospitalStore>,
}

impl VisitScheduleService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    async fn authorized_doctor(&self, session: &Session, doctor_id: &str) -> Result<String, AppError> {
        let doctor_id = identifier(IdentifierKind::Doctor, doctor_id)?;
        require_doctor_access(session, &doctor_id)?;

        if self.store.get_doctor(&doctor_id).await?.is_none() {
            return Err(AppError::NotFound("Doctor not found".to_string()));
        }
        Ok(doctor_id)
    }

    pub async fn all_pending(&self, session: &Session, doctor_id: &str) -> Result<Vec<Visit>, AppError> {
        self.doctor_view(session, doctor_id, DoctorVisitView::AllPending).await
    }

    pub async fn today(&self, session: &Session, doctor_id: &str) -> Result<Vec<Visit>, AppError> {
        let today = Utc::now().date_naive();
        self.doctor_view(session, doctor_id, DoctorVisitView::Today(today)).await
    }

    pub async fn upcoming(&self, session: &Session, doctor_id: &str) -> Result<Vec<Visit>, AppError> {
        let today = Utc::now().date_naive();
        self.doctor_view(session, doctor_id, DoctorVisitView::Upcoming(today)).await
    }

    pub async fn past(&self, session: &Session, doctor_id: &str) -> Result<Vec<Visit>, AppError> {
        let view = DoctorVisitView::Past {
            limit: DoctorVisitView::PAST_LIMIT,
        };
        self.doctor_view(session, doctor_id, view).await
    }

    async fn doctor_view(
        &self,
        session: &Session,
        doctor_id: &str,
        view: DoctorVisitView,
    ) -> Result<Vec<Visit>, AppError> {
        let doctor_id = self.authorized_doctor(session, doctor_id).await?;
        debug!("Loading {:?} visits for doctor {}", view, doctor_id);

        Ok(self.store.doctor_visits(&doctor_id, view).await?)
    }

    /// Status breakdown plus today's and upcoming counts, read concurrently.
    pub async fn statistics(&self, session: &Session, doctor_id: &str) -> Result<DoctorVisitStatistics, AppError> {
        let doctor_id = self.authorized_doctor(session, doctor_id).await?;
        let today = Utc::now().date_naive();

        let (by_status, today_visits, upcoming_visits) = futures::try_join!(
            self.store.visit_counts_by_status(Some(&doctor_id)),
            self.store.doctor_visits(&doctor_id, DoctorVisitView::Today(today)),
            self.store.doctor_visits(&doctor_id, DoctorVisitView::Upcoming(today)),
        )?;

        let visits_by_status: Vec<CountBucket> = VisitStatus::ALL
            .iter()
            .map(|status| {
                let count = by_status
                    .iter()
                    .find(|(s, _)| s == status)
                    .map(|(_, count)| *count)
                    .unwrap_or(0);
                CountBucket::new(status.as_str(), count)
            })
            .collect();

        Ok(DoctorVisitStatistics {
            total_visits: visits_by_status.iter().map(|bucket| bucket.count).sum(),
            visits_by_status,
            today_visits: today_visits.len() as i64,
            upcoming_visits: upcoming_visits.len() as i64,
            doctor_id,
        })
    }

    pub async fn patient_pending(&self, session: &Session, query: PatientVisitsQuery) -> Result<Vec<Visit>, AppError> {
        let patient_id = required_text("patientId", query.patient_id)?;
        let patient_id = identifier(IdentifierKind::Patient, &patient_id)?;
        require_patient_access(session, &patient_id)?;

        Ok(self
            .store
            .patient_visits(&patient_id, Some(VisitStatus::Pending))
            .await?)
    }
}
