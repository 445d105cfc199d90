//! Hospital-wide aggregates for the admin dashboard. Each report issues its
//! independent reads concurrently and shapes the raw counts into ordered
//! label/count buckets.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use shared_database::{AppState, HospitalStore, StatisticsRepository};
use shared_models::auth::Session;
use shared_models::demographics::{BloodGroup, Gender};
use shared_models::error::AppError;
use shared_models::stats::{month_name, weekday_name, AgeGroup, CountBucket};
use shared_models::visit::VisitStatus;
use shared_utils::extractor::require_admin;

use crate::models::{DoctorStatistics, DoctorVisitCount, PatientStatistics, VisitStatistics};

const RECENT_PATIENTS: i64 = 5;
const TOP_DOCTORS: i64 = 10;
const RECENT_VISITS: i64 = 10;

const GENDERS: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

fn count_of<K: PartialEq>(counts: &[(K, i64)], key: &K) -> i64 {
    counts
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, count)| *count)
        .unwrap_or(0)
}

/// Male, Female, Other, in that order.
pub fn gender_buckets(counts: &[(Gender, i64)]) -> Vec<CountBucket> {
    GENDERS
        .iter()
        .map(|gender| CountBucket::new(gender.label(), count_of(counts, gender)))
        .collect()
}

/// Groups present in the data, most common first.
pub fn blood_group_buckets(counts: &[(BloodGroup, i64)]) -> Vec<CountBucket> {
    let mut present: Vec<(BloodGroup, i64)> = BloodGroup::ALL
        .iter()
        .map(|group| (*group, count_of(counts, group)))
        .filter(|(_, count)| *count > 0)
        .collect();
    present.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    present
        .into_iter()
        .map(|(group, count)| CountBucket::new(group.as_str(), count))
        .collect()
}

/// Folds per-year counts into the fixed age bands, youngest first.
pub fn age_group_buckets(counts_by_age: &[(i32, i64)]) -> Vec<CountBucket> {
    AgeGroup::ALL
        .iter()
        .map(|group| {
            let count = counts_by_age
                .iter()
                .filter(|(age, _)| AgeGroup::for_age(*age) == *group)
                .map(|(_, count)| count)
                .sum();
            CountBucket::new(group.label(), count)
        })
        .collect()
}

pub fn status_buckets(counts: &[(VisitStatus, i64)]) -> Vec<CountBucket> {
    VisitStatus::ALL
        .iter()
        .map(|status| CountBucket::new(status.as_str(), count_of(counts, status)))
        .collect()
}

/// One bucket per calendar slot `1..=slots`, labelled by `name`.
pub fn calendar_buckets(counts: &[(i32, i64)], slots: i32, name: fn(i32) -> Option<&'static str>) -> Vec<CountBucket> {
    (1..=slots)
        .filter_map(|slot| name(slot).map(|label| CountBucket::new(label, count_of(counts, &slot))))
        .collect()
}

pub struct StatisticsService {
    store: Arc<dyn HospitalStore>,
}

impl StatisticsService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    pub async fn patient_statistics(&self, session: &Session) -> Result<PatientStatistics, AppError> {
        require_admin(session)?;
        let today = Utc::now().date_naive();
        debug!("Computing patient statistics as of {}", today);

        let (total, by_gender, by_blood_group, by_age, recent) = futures::try_join!(
            self.store.count_patients(),
            self.store.patient_counts_by_gender(),
            self.store.patient_counts_by_blood_group(),
            self.store.patient_counts_by_age(today),
            self.store.recently_updated_patients(RECENT_PATIENTS),
        )?;

        Ok(PatientStatistics {
            total_patients: total,
            patients_by_gender: gender_buckets(&by_gender),
            patients_by_blood_group: blood_group_buckets(&by_blood_group),
            patients_by_age_group: age_group_buckets(&by_age),
            recently_added_patients: recent,
        })
    }

    pub async fn doctor_statistics(&self, session: &Session) -> Result<DoctorStatistics, AppError> {
        require_admin(session)?;

        let (total, available, by_specialization, by_gender) = futures::try_join!(
            self.store.count_doctors(false),
            self.store.count_doctors(true),
            self.store.doctor_counts_by_specialization(),
            self.store.doctor_counts_by_gender(),
        )?;

        Ok(DoctorStatistics {
            total_doctors: total,
            available_doctors: available,
            doctors_by_specialization: by_specialization
                .into_iter()
                .map(|(specialization, count)| CountBucket::new(specialization, count))
                .collect(),
            doctors_by_gender: gender_buckets(&by_gender),
        })
    }

    pub async fn visit_statistics(&self, session: &Session) -> Result<VisitStatistics, AppError> {
        require_admin(session)?;

        let (by_status, by_doctor, by_weekday, by_month, recent) = futures::try_join!(
            self.store.visit_counts_by_status(None),
            self.store.visit_counts_by_doctor(TOP_DOCTORS),
            self.store.visit_counts_by_weekday(),
            self.store.visit_counts_by_month(),
            self.store.recent_visits(RECENT_VISITS),
        )?;

        let visits_by_status = status_buckets(&by_status);

        Ok(VisitStatistics {
            total_visits: visits_by_status.iter().map(|bucket| bucket.count).sum(),
            visits_by_status,
            visits_by_doctor: by_doctor
                .into_iter()
                .map(|(doctor_id, doctor_name, visit_count)| DoctorVisitCount {
                    doctor_id,
                    doctor_name,
                    visit_count,
                })
                .collect(),
            visits_by_day: calendar_buckets(&by_weekday, 7, weekday_name),
            visits_by_month: calendar_buckets(&by_month, 12, month_name),
            recent_visits: recent,
        })
    }
}
