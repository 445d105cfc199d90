//! Runs against a disposable Postgres database named by `TEST_DATABASE_URL`.
//! `cargo test -p shared-database -- --ignored`

use std::collections::HashSet;
use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;

use shared_config::AppConfig;
use shared_database::{
    DoctorRepository, PatientRepository, PgStore, ReportRepository, StoreError, VisitRepository,
};
use shared_models::demographics::{BloodGroup, Gender};
use shared_models::doctor::NewDoctor;
use shared_models::identifier::{IdentifierError, IdentifierKind};
use shared_models::patient::NewPatient;
use shared_models::visit::{CompletionNote, NewVisit, VisitStatus, VisitTransition};

async fn connect() -> Option<PgStore> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let config = AppConfig {
        database_url: url,
        database_max_connections: 10,
        session_secret: "unused".to_string(),
        session_ttl_hours: 1,
        admin_username: String::new(),
        admin_password: String::new(),
        port: 0,
    };

    let store = PgStore::connect(&config).await.unwrap();
    store.migrate().await.unwrap();
    Some(store)
}

#[tokio::test]
#[ignore]
async fn parallel_registrations_get_distinct_identifiers() {
    let Some(store) = connect().await else { return };
    let store = Arc::new(store);

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .insert_patient(NewPatient {
                        name: format!("Load Patient {}", i),
                        date_of_birth: NaiveDate::from_ymd_opt(1985, 6, 1).unwrap(),
                        address: "Test Ward".to_string(),
                        contact: "9999999999".to_string(),
                        gender: Gender::Other,
                        blood_group: BloodGroup::AbNegative,
                        height: None,
                        weight: None,
                    })
                    .await
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let patient = handle.await.unwrap().unwrap();
        assert!(ids.insert(patient.patient_id));
    }
    assert_eq!(ids.len(), 10);
}

#[tokio::test]
#[ignore]
async fn completion_is_atomic_in_postgres() {
    let Some(store) = connect().await else { return };

    let patient = store
        .insert_patient(NewPatient {
            name: "Atomic Patient".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 2, 29).unwrap(),
            address: "Test Ward".to_string(),
            contact: "9999999999".to_string(),
            gender: Gender::Female,
            blood_group: BloodGroup::BPositive,
            height: Some(150.0),
            weight: None,
        })
        .await
        .unwrap();
    let doctor = store
        .insert_doctor(NewDoctor {
            name: "Dr. Atomic".to_string(),
            specialization: "Neurology".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1975, 5, 5).unwrap(),
            contact: "8888888888".to_string(),
            address: "Test Wing".to_string(),
            gender: Gender::Male,
            is_available: true,
        })
        .await
        .unwrap();

    let visit = store
        .create_visit(NewVisit {
            patient_id: patient.patient_id.clone(),
            doctor_id: doctor.doctor_id.clone(),
            date_of_visit: Utc::now(),
            visit_reason: None,
        })
        .await
        .unwrap();

    let outcome = store
        .transition_visit(
            visit.visit_id,
            VisitTransition::Complete(CompletionNote {
                doctor_remarks: "Fine".to_string(),
                prescription: None,
                follow_up_date: None,
            }),
        )
        .await
        .unwrap();

    assert_eq!(outcome.visit.visit_status, VisitStatus::Visited);
    assert!(outcome.report.is_some());
    assert!(store
        .transition_visit(visit.visit_id, VisitTransition::Cancel)
        .await
        .is_err());

    // Park the report space at its last identifier and complete another visit.
    let pool = PgPool::connect(&std::env::var("TEST_DATABASE_URL").unwrap()).await.unwrap();
    let archived = store
        .create_visit(NewVisit {
            patient_id: patient.patient_id.clone(),
            doctor_id: doctor.doctor_id.clone(),
            date_of_visit: Utc::now() - Duration::days(30),
            visit_reason: None,
        })
        .await
        .unwrap();
    let mut tx = pool.begin().await.unwrap();
    sqlx::query(
        r#"
        INSERT INTO report (report_id, visit_id, patient_id, doctor_id, date_of_visit, doctor_remarks)
        VALUES ('R9999999999', $1, $2, $3, $4, 'Archived')
        "#,
    )
    .bind(archived.visit_id)
    .bind(&patient.patient_id)
    .bind(&doctor.doctor_id)
    .bind(archived.date_of_visit)
    .execute(&mut *tx)
    .await
    .unwrap();
    sqlx::query("UPDATE visit SET visit_status = 'visited', report_id = 'R9999999999' WHERE visit_id = $1")
        .bind(archived.visit_id)
        .execute(&mut *tx)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let next = store
        .create_visit(NewVisit {
            patient_id: patient.patient_id.clone(),
            doctor_id: doctor.doctor_id.clone(),
            date_of_visit: Utc::now() + Duration::days(1),
            visit_reason: None,
        })
        .await
        .unwrap();
    let reports_before = store.list_reports(None).await.unwrap().len();

    let result = store
        .transition_visit(
            next.visit_id,
            VisitTransition::Complete(CompletionNote {
                doctor_remarks: "Fine".to_string(),
                prescription: None,
                follow_up_date: None,
            }),
        )
        .await;
    let stored = store.get_visit(next.visit_id).await.unwrap().unwrap();
    let reports_after = store.list_reports(None).await.unwrap().len();

    // Free the last identifier again so later runs can allocate.
    let mut tx = pool.begin().await.unwrap();
    sqlx::query("UPDATE visit SET visit_status = 'cancelled', report_id = NULL WHERE visit_id = $1")
        .bind(archived.visit_id)
        .execute(&mut *tx)
        .await
        .unwrap();
    sqlx::query("DELETE FROM report WHERE report_id = 'R9999999999'")
        .execute(&mut *tx)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_matches!(
        result,
        Err(StoreError::Identifier(IdentifierError::Exhausted { kind: IdentifierKind::Report }))
    );
    assert_eq!(stored.visit_status, VisitStatus::Pending);
    assert_eq!(stored.report_id, None);
    assert_eq!(reports_after, reports_before);
}
