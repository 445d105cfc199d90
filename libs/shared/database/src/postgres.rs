use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
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

/// How many times an insert is retried when a concurrent writer claimed the
/// identifier we derived.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &AppConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;

        info!(
            "Connected to Postgres (max {} connections)",
            config.database_max_connections
        );
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database schema is up to date");
        Ok(())
    }
}

async fn last_identifier(conn: &mut PgConnection, kind: IdentifierKind) -> StoreResult<Option<String>> {
    // Fixed-width suffixes make lexicographic order match numeric order.
    let sql = match kind {
        IdentifierKind::Patient => "SELECT patient_id FROM patient ORDER BY patient_id DESC LIMIT 1",
        IdentifierKind::Doctor => "SELECT doctor_id FROM doctor ORDER BY doctor_id DESC LIMIT 1",
        IdentifierKind::Report => "SELECT report_id FROM report ORDER BY report_id DESC LIMIT 1",
    };

    Ok(sqlx::query_scalar::<_, String>(sql)
        .fetch_optional(&mut *conn)
        .await?)
}

async fn candidate_identifier(conn: &mut PgConnection, kind: IdentifierKind) -> StoreResult<String> {
    let last = last_identifier(conn, kind).await?;
    Ok(next_identifier(kind, last.as_deref())?)
}

async fn has_visits(conn: &mut PgConnection, column: &str, id: &str) -> StoreResult<bool> {
    let sql = format!("SELECT EXISTS (SELECT 1 FROM visit WHERE {} = $1)", column);
    Ok(sqlx::query_scalar::<_, bool>(&sql)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?)
}

#[async_trait]
impl PatientRepository for PgStore {
    async fn insert_patient(&self, patient: NewPatient) -> StoreResult<Patient> {
        let mut tx = self.pool.begin().await?;

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let patient_id = candidate_identifier(&mut tx, IdentifierKind::Patient).await?;

            let inserted = sqlx::query_as::<_, Patient>(
                r#"
                INSERT INTO patient (
                    patient_id, patient_name, patient_dob, patient_address, patient_contact,
                    patient_gender, patient_blood_group, patient_height, patient_weight
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (patient_id) DO NOTHING
                RETURNING *
                "#,
            )
            .bind(&patient_id)
            .bind(&patient.name)
            .bind(patient.date_of_birth)
            .bind(&patient.address)
            .bind(&patient.contact)
            .bind(patient.gender)
            .bind(patient.blood_group)
            .bind(patient.height)
            .bind(patient.weight)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(created) = inserted {
                tx.commit().await?;
                debug!("Inserted patient {}", created.patient_id);
                return Ok(created);
            }

            warn!(
                "Patient identifier {} taken concurrently (attempt {})",
                patient_id, attempt
            );
        }

        Err(StoreError::AllocationContention(IdentifierKind::Patient))
    }

    async fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        Ok(sqlx::query_as::<_, Patient>("SELECT * FROM patient ORDER BY patient_id")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_patient(&self, patient_id: &str) -> StoreResult<Option<Patient>> {
        Ok(sqlx::query_as::<_, Patient>("SELECT * FROM patient WHERE patient_id = $1")
            .bind(patient_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_patient(&self, patient_id: &str, patch: PatientPatch) -> StoreResult<Option<Patient>> {
        Ok(sqlx::query_as::<_, Patient>(
            r#"
            UPDATE patient SET
                patient_name = COALESCE($2, patient_name),
                patient_dob = COALESCE($3, patient_dob),
                patient_address = COALESCE($4, patient_address),
                patient_contact = COALESCE($5, patient_contact),
                patient_gender = COALESCE($6, patient_gender),
                patient_blood_group = COALESCE($7, patient_blood_group),
                patient_height = COALESCE($8, patient_height),
                patient_weight = COALESCE($9, patient_weight),
                patient_updated_at = NOW()
            WHERE patient_id = $1
            RETURNING *
            "#,
        )
        .bind(patient_id)
        .bind(patch.name)
        .bind(patch.date_of_birth)
        .bind(patch.address)
        .bind(patch.contact)
        .bind(patch.gender)
        .bind(patch.blood_group)
        .bind(patch.height)
        .bind(patch.weight)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_patient(&self, patient_id: &str) -> StoreResult<Patient> {
        let mut tx = self.pool.begin().await?;

        // The row lock conflicts with the share lock visit creation takes.
        let existing = sqlx::query_as::<_, Patient>(
            "SELECT * FROM patient WHERE patient_id = $1 FOR UPDATE",
        )
        .bind(patient_id)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_none() {
            return Err(StoreError::not_found("patient", patient_id));
        }

        if has_visits(&mut tx, "patient_id", patient_id).await? {
            return Err(StoreError::StillReferenced {
                entity: "patient",
                id: patient_id.to_string(),
            });
        }

        let deleted = sqlx::query_as::<_, Patient>(
            "DELETE FROM patient WHERE patient_id = $1 RETURNING *",
        )
        .bind(patient_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(deleted)
    }
}

#[async_trait]
impl DoctorRepository for PgStore {
    async fn insert_doctor(&self, doctor: NewDoctor) -> StoreResult<Doctor> {
        let mut tx = self.pool.begin().await?;

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let doctor_id = candidate_identifier(&mut tx, IdentifierKind::Doctor).await?;

            let inserted = sqlx::query_as::<_, Doctor>(
                r#"
                INSERT INTO doctor (
                    doctor_id, doctor_name, doctor_specialization, doctor_date_of_birth,
                    doctor_contact, doctor_address, doctor_gender, doctor_is_available
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (doctor_id) DO NOTHING
                RETURNING *
                "#,
            )
            .bind(&doctor_id)
            .bind(&doctor.name)
            .bind(&doctor.specialization)
            .bind(doctor.date_of_birth)
            .bind(&doctor.contact)
            .bind(&doctor.address)
            .bind(doctor.gender)
            .bind(doctor.is_available)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(created) = inserted {
                tx.commit().await?;
                debug!("Inserted doctor {}", created.doctor_id);
                return Ok(created);
            }

            warn!(
                "Doctor identifier {} taken concurrently (attempt {})",
                doctor_id, attempt
            );
        }

        Err(StoreError::AllocationContention(IdentifierKind::Doctor))
    }

    async fn list_doctors(&self, available_only: bool) -> StoreResult<Vec<Doctor>> {
        Ok(sqlx::query_as::<_, Doctor>(
            "SELECT * FROM doctor WHERE ($1 = FALSE OR doctor_is_available) ORDER BY doctor_id",
        )
        .bind(available_only)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_doctor(&self, doctor_id: &str) -> StoreResult<Option<Doctor>> {
        Ok(sqlx::query_as::<_, Doctor>("SELECT * FROM doctor WHERE doctor_id = $1")
            .bind(doctor_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_doctor(&self, doctor_id: &str, patch: DoctorPatch) -> StoreResult<Option<Doctor>> {
        Ok(sqlx::query_as::<_, Doctor>(
            r#"
            UPDATE doctor SET
                doctor_name = COALESCE($2, doctor_name),
                doctor_specialization = COALESCE($3, doctor_specialization),
                doctor_date_of_birth = COALESCE($4, doctor_date_of_birth),
                doctor_contact = COALESCE($5, doctor_contact),
                doctor_address = COALESCE($6, doctor_address),
                doctor_gender = COALESCE($7, doctor_gender),
                doctor_is_available = COALESCE($8, doctor_is_available)
            WHERE doctor_id = $1
            RETURNING *
            "#,
        )
        .bind(doctor_id)
        .bind(patch.name)
        .bind(patch.specialization)
        .bind(patch.date_of_birth)
        .bind(patch.contact)
        .bind(patch.address)
        .bind(patch.gender)
        .bind(patch.is_available)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_doctor(&self, doctor_id: &str) -> StoreResult<Doctor> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Doctor>(
            "SELECT * FROM doctor WHERE doctor_id = $1 FOR UPDATE",
        )
        .bind(doctor_id)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_none() {
            return Err(StoreError::not_found("doctor", doctor_id));
        }

        if has_visits(&mut tx, "doctor_id", doctor_id).await? {
            return Err(StoreError::StillReferenced {
                entity: "doctor",
                id: doctor_id.to_string(),
            });
        }

        let deleted = sqlx::query_as::<_, Doctor>(
            "DELETE FROM doctor WHERE doctor_id = $1 RETURNING *",
        )
        .bind(doctor_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(deleted)
    }
}

#[async_trait]
impl VisitRepository for PgStore {
    async fn create_visit(&self, visit: NewVisit) -> StoreResult<Visit> {
        let mut tx = self.pool.begin().await?;

        let patient_exists = sqlx::query_scalar::<_, String>(
            "SELECT patient_id FROM patient WHERE patient_id = $1 FOR SHARE",
        )
        .bind(&visit.patient_id)
        .fetch_optional(&mut *tx)
        .await?;
        if patient_exists.is_none() {
            return Err(StoreError::not_found("patient", visit.patient_id));
        }

        let available = sqlx::query_scalar::<_, bool>(
            "SELECT doctor_is_available FROM doctor WHERE doctor_id = $1 FOR SHARE",
        )
        .bind(&visit.doctor_id)
        .fetch_optional(&mut *tx)
        .await?;
        match available {
            None => return Err(StoreError::not_found("doctor", visit.doctor_id)),
            Some(false) => return Err(StoreError::DoctorUnavailable(visit.doctor_id)),
            Some(true) => {}
        }

        let inserted = sqlx::query_as::<_, Visit>(
            r#"
            INSERT INTO visit (visit_id, patient_id, doctor_id, date_of_visit, visit_status, visit_reason)
            VALUES ($1, $2, $3, $4, 'pending', $5)
            ON CONFLICT (patient_id, doctor_id, date_of_visit) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&visit.patient_id)
        .bind(&visit.doctor_id)
        .bind(visit.date_of_visit)
        .bind(&visit.visit_reason)
        .fetch_optional(&mut *tx)
        .await?;

        let created = inserted.ok_or(StoreError::DuplicateVisit {
            patient_id: visit.patient_id,
            doctor_id: visit.doctor_id,
        })?;

        tx.commit().await?;
        debug!("Created visit {}", created.visit_id);
        Ok(created)
    }

    async fn list_visits(&self) -> StoreResult<Vec<Visit>> {
        Ok(sqlx::query_as::<_, Visit>("SELECT * FROM visit ORDER BY date_of_visit DESC")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_visit(&self, visit_id: Uuid) -> StoreResult<Option<Visit>> {
        Ok(sqlx::query_as::<_, Visit>("SELECT * FROM visit WHERE visit_id = $1")
            .bind(visit_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_visit_by_key(
        &self,
        patient_id: &str,
        doctor_id: &str,
        date_of_visit: DateTime<Utc>,
    ) -> StoreResult<Option<Visit>> {
        Ok(sqlx::query_as::<_, Visit>(
            "SELECT * FROM visit WHERE patient_id = $1 AND doctor_id = $2 AND date_of_visit = $3",
        )
        .bind(patient_id)
        .bind(doctor_id)
        .bind(date_of_visit)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn transition_visit(&self, visit_id: Uuid, transition: VisitTransition) -> StoreResult<TransitionOutcome> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Visit>("SELECT * FROM visit WHERE visit_id = $1 FOR UPDATE")
            .bind(visit_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StoreError::not_found("visit", visit_id.to_string()))?;

        let target = transition.target();
        if !current.visit_status.can_transition_to(target) {
            return Err(StoreError::InvalidTransition {
                visit_id: visit_id.to_string(),
                from: current.visit_status,
                to: target,
            });
        }

        let report = match transition {
            VisitTransition::Complete(note) => {
                let mut created = None;

                for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
                    let report_id = candidate_identifier(&mut tx, IdentifierKind::Report).await?;

                    let inserted = sqlx::query_as::<_, Report>(
                        r#"
                        INSERT INTO report (
                            report_id, visit_id, patient_id, doctor_id, date_of_visit,
                            doctor_remarks, prescription, follow_up_date
                        )
                        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                        ON CONFLICT (report_id) DO NOTHING
                        RETURNING *
                        "#,
                    )
                    .bind(&report_id)
                    .bind(current.visit_id)
                    .bind(&current.patient_id)
                    .bind(&current.doctor_id)
                    .bind(current.date_of_visit)
                    .bind(&note.doctor_remarks)
                    .bind(&note.prescription)
                    .bind(note.follow_up_date)
                    .fetch_optional(&mut *tx)
                    .await?;

                    if inserted.is_some() {
                        created = inserted;
                        break;
                    }

                    warn!(
                        "Report identifier {} taken concurrently (attempt {})",
                        report_id, attempt
                    );
                }

                Some(created.ok_or(StoreError::AllocationContention(IdentifierKind::Report))?)
            }
            VisitTransition::Miss | VisitTransition::Cancel => None,
        };

        let visit = sqlx::query_as::<_, Visit>(
            "UPDATE visit SET visit_status = $2, report_id = $3 WHERE visit_id = $1 RETURNING *",
        )
        .bind(visit_id)
        .bind(target)
        .bind(report.as_ref().map(|r| r.report_id.clone()))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        info!("Visit {} moved from {} to {}", visit_id, current.visit_status, target);

        Ok(TransitionOutcome { visit, report })
    }

    async fn doctor_visits(&self, doctor_id: &str, view: DoctorVisitView) -> StoreResult<Vec<Visit>> {
        let query = match view {
            DoctorVisitView::AllPending => sqlx::query_as::<_, Visit>(
                r#"
                SELECT * FROM visit
                WHERE doctor_id = $1 AND visit_status = 'pending'
                ORDER BY date_of_visit
                "#,
            )
            .bind(doctor_id),
            DoctorVisitView::Today(today) => sqlx::query_as::<_, Visit>(
                r#"
                SELECT * FROM visit
                WHERE doctor_id = $1 AND (date_of_visit AT TIME ZONE 'UTC')::date = $2
                ORDER BY date_of_visit
                "#,
            )
            .bind(doctor_id)
            .bind(today),
            DoctorVisitView::Upcoming(today) => sqlx::query_as::<_, Visit>(
                r#"
                SELECT * FROM visit
                WHERE doctor_id = $1
                  AND visit_status = 'pending'
                  AND (date_of_visit AT TIME ZONE 'UTC')::date > $2
                ORDER BY date_of_visit
                "#,
            )
            .bind(doctor_id)
            .bind(today),
            DoctorVisitView::Past { limit } => sqlx::query_as::<_, Visit>(
                r#"
                SELECT * FROM visit
                WHERE doctor_id = $1 AND visit_status <> 'pending'
                ORDER BY date_of_visit DESC
                LIMIT $2
                "#,
            )
            .bind(doctor_id)
            .bind(limit as i64),
        };

        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn patient_visits(&self, patient_id: &str, status: Option<VisitStatus>) -> StoreResult<Vec<Visit>> {
        Ok(sqlx::query_as::<_, Visit>(
            r#"
            SELECT * FROM visit
            WHERE patient_id = $1 AND ($2::visit_status IS NULL OR visit_status = $2)
            ORDER BY date_of_visit
            "#,
        )
        .bind(patient_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl ReportRepository for PgStore {
    async fn list_reports(&self, patient_id: Option<&str>) -> StoreResult<Vec<Report>> {
        Ok(sqlx::query_as::<_, Report>(
            r#"
            SELECT * FROM report
            WHERE ($1::text IS NULL OR patient_id = $1)
            ORDER BY date_of_visit DESC, report_id DESC
            "#,
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_report(&self, report_id: &str) -> StoreResult<Option<Report>> {
        Ok(sqlx::query_as::<_, Report>("SELECT * FROM report WHERE report_id = $1")
            .bind(report_id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl StatisticsRepository for PgStore {
    async fn count_patients(&self) -> StoreResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM patient")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn patient_counts_by_gender(&self) -> StoreResult<Vec<(Gender, i64)>> {
        Ok(sqlx::query_as::<_, (Gender, i64)>(
            "SELECT patient_gender, COUNT(*) FROM patient GROUP BY patient_gender",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn patient_counts_by_blood_group(&self) -> StoreResult<Vec<(BloodGroup, i64)>> {
        Ok(sqlx::query_as::<_, (BloodGroup, i64)>(
            "SELECT patient_blood_group, COUNT(*) FROM patient GROUP BY patient_blood_group",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn patient_counts_by_age(&self, today: NaiveDate) -> StoreResult<Vec<(i32, i64)>> {
        Ok(sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT EXTRACT(YEAR FROM AGE($1::date, patient_dob))::int AS age, COUNT(*)
            FROM patient
            GROUP BY age
            "#,
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn recently_updated_patients(&self, limit: i64) -> StoreResult<Vec<Patient>> {
        Ok(sqlx::query_as::<_, Patient>(
            "SELECT * FROM patient ORDER BY patient_updated_at DESC, patient_id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn count_doctors(&self, available_only: bool) -> StoreResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM doctor WHERE ($1 = FALSE OR doctor_is_available)",
        )
        .bind(available_only)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn doctor_counts_by_specialization(&self) -> StoreResult<Vec<(String, i64)>> {
        Ok(sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT doctor_specialization, COUNT(*) AS doctors
            FROM doctor
            GROUP BY doctor_specialization
            ORDER BY doctors DESC, doctor_specialization
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn doctor_counts_by_gender(&self) -> StoreResult<Vec<(Gender, i64)>> {
        Ok(sqlx::query_as::<_, (Gender, i64)>(
            "SELECT doctor_gender, COUNT(*) FROM doctor GROUP BY doctor_gender",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn visit_counts_by_status(&self, doctor_id: Option<&str>) -> StoreResult<Vec<(VisitStatus, i64)>> {
        Ok(sqlx::query_as::<_, (VisitStatus, i64)>(
            r#"
            SELECT visit_status, COUNT(*)
            FROM visit
            WHERE ($1::text IS NULL OR doctor_id = $1)
            GROUP BY visit_status
            "#,
        )
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn visit_counts_by_doctor(&self, limit: i64) -> StoreResult<Vec<(String, String, i64)>> {
        Ok(sqlx::query_as::<_, (String, String, i64)>(
            r#"
            SELECT d.doctor_id, d.doctor_name, COUNT(v.visit_id) AS visits
            FROM doctor d
            LEFT JOIN visit v ON v.doctor_id = d.doctor_id
            GROUP BY d.doctor_id, d.doctor_name
            ORDER BY visits DESC, d.doctor_id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn visit_counts_by_weekday(&self) -> StoreResult<Vec<(i32, i64)>> {
        Ok(sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT EXTRACT(ISODOW FROM date_of_visit AT TIME ZONE 'UTC')::int AS weekday, COUNT(*)
            FROM visit
            GROUP BY weekday
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn visit_counts_by_month(&self) -> StoreResult<Vec<(i32, i64)>> {
        Ok(sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT EXTRACT(MONTH FROM date_of_visit AT TIME ZONE 'UTC')::int AS month, COUNT(*)
            FROM visit
            GROUP BY month
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn recent_visits(&self, limit: i64) -> StoreResult<Vec<VisitSummary>> {
        Ok(sqlx::query_as::<_, VisitSummary>(
            r#"
            SELECT v.visit_id, v.patient_id, p.patient_name, v.doctor_id, d.doctor_name,
                   v.date_of_visit, v.visit_status, v.visit_reason
            FROM visit v
            JOIN patient p ON p.patient_id = v.patient_id
            JOIN doctor d ON d.doctor_id = v.doctor_id
            ORDER BY v.date_of_visit DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }
}
