use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use shared_config::AppConfig;
use shared_database::{AppState, DoctorRepository, MemoryStore, PatientRepository};
use shared_models::auth::{Role, Session};
use shared_models::demographics::{BloodGroup, Gender};
use shared_models::doctor::{Doctor, NewDoctor};
use shared_models::patient::{NewPatient, Patient};

use crate::jwt::issue_token;

pub struct TestConfig {
    pub session_secret: String,
    pub admin_username: String,
    pub admin_password: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            session_secret: "test-session-secret-for-signing-must-be-long-enough".to_string(),
            admin_username: "admin".to_string(),
            admin_password: "admin-password".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_url: String::new(),
            database_max_connections: 1,
            session_secret: self.session_secret.clone(),
            session_ttl_hours: 1,
            admin_username: self.admin_username.clone(),
            admin_password: self.admin_password.clone(),
            port: 0,
        }
    }
}

pub struct TestSession {
    pub subject: String,
    pub role: Role,
    pub name: Option<String>,
}

impl TestSession {
    pub fn new(subject: &str, role: Role) -> Self {
        Self {
            subject: subject.to_string(),
            role,
            name: None,
        }
    }

    pub fn admin() -> Self {
        Self::new("admin", Role::Admin)
    }

    pub fn doctor(doctor_id: &str) -> Self {
        Self::new(doctor_id, Role::Doctor)
    }

    pub fn patient(patient_id: &str) -> Self {
        Self::new(patient_id, Role::Patient)
    }

    pub fn to_session(&self) -> Session {
        Session {
            subject: self.subject.clone(),
            role: self.role,
            name: self.name.clone(),
            expires_at: None,
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(session: &TestSession, secret: &str, exp_hours: Option<i64>) -> String {
        let (token, _) = issue_token(
            &session.subject,
            session.role,
            session.name.as_deref(),
            secret,
            Duration::hours(exp_hours.unwrap_or(24)),
        )
        .expect("test secret is not empty");
        token
    }

    pub fn create_expired_token(session: &TestSession, secret: &str) -> String {
        Self::create_test_token(session, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(session: &TestSession) -> String {
        Self::create_test_token(session, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// An in-memory application state plus direct access to its store for seeding.
pub struct TestState {
    pub config: TestConfig,
    pub store: Arc<MemoryStore>,
    pub state: Arc<AppState>,
}

impl TestState {
    pub fn new() -> Self {
        let config = TestConfig::default();
        let store = Arc::new(MemoryStore::new());
        let state = Arc::new(AppState::new(config.to_app_config(), store.clone()));
        Self { config, store, state }
    }

    pub fn bearer(&self, session: &TestSession) -> String {
        format!(
            "Bearer {}",
            JwtTestUtils::create_test_token(session, &self.config.session_secret, None)
        )
    }

    pub async fn seed_patient(&self, name: &str) -> Patient {
        self.store
            .insert_patient(sample_patient(name))
            .await
            .expect("seeding a patient into the memory store")
    }

    pub async fn seed_doctor(&self, name: &str, is_available: bool) -> Doctor {
        self.store
            .insert_doctor(sample_doctor(name, is_available))
            .await
            .expect("seeding a doctor into the memory store")
    }
}

impl Default for TestState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn sample_patient(name: &str) -> NewPatient {
    NewPatient {
        name: name.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1992, 8, 15).expect("valid date"),
        address: "21 Lake View Road".to_string(),
        contact: "9876501234".to_string(),
        gender: Gender::Female,
        blood_group: BloodGroup::BPositive,
        height: Some(162.0),
        weight: Some(55.0),
    }
}

pub fn sample_doctor(name: &str, is_available: bool) -> NewDoctor {
    NewDoctor {
        name: name.to_string(),
        specialization: "General Medicine".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1980, 3, 9).expect("valid date"),
        contact: "9012345678".to_string(),
        address: "3 Hospital Street".to_string(),
        gender: Gender::Male,
        is_available,
    }
}
