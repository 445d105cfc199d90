use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::{AppState, DoctorRepository, HospitalStore, PatientRepository};
use shared_models::auth::{LoginResponse, Role};
use shared_models::error::AppError;
use shared_models::identifier::IdentifierKind;
use shared_utils::jwt::issue_token;
use shared_utils::validation::{identifier, login_date, required_text};

use crate::models::{AdminLoginRequest, DoctorLoginRequest, PatientLoginRequest};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct LoginService {
    config: Arc<AppConfig>,
    store: Arc<dyn HospitalStore>,
}

impl LoginService {
    pub fn new(state: &AppState) -> Self {
        Self {
            config: Arc::clone(&state.config),
            store: Arc::clone(&state.store),
        }
    }

    pub async fn login_patient(&self, request: PatientLoginRequest) -> Result<LoginResponse, AppError> {
        let patient_id = required_text("patientId", request.patient_id)?;
        let dob = required_text("patientDateOfBirth", request.patient_date_of_birth)?;
        let patient_id = identifier(IdentifierKind::Patient, &patient_id)?;
        let dob = login_date("patientDateOfBirth", &dob)?;

        debug!("Patient login attempt for {}", patient_id);

        let patient = self
            .store
            .get_patient(&patient_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;

        self.check_date_of_birth(&patient_id, patient.patient_dob, dob)?;
        self.issue(&patient.patient_id, Role::Patient, Some(&patient.patient_name))
    }

    pub async fn login_doctor(&self, request: DoctorLoginRequest) -> Result<LoginResponse, AppError> {
        let doctor_id = required_text("doctorId", request.doctor_id)?;
        let dob = required_text("doctorDateOfBirth", request.doctor_date_of_birth)?;
        let doctor_id = identifier(IdentifierKind::Doctor, &doctor_id)?;
        let dob = login_date("doctorDateOfBirth", &dob)?;

        debug!("Doctor login attempt for {}", doctor_id);

        let doctor = self
            .store
            .get_doctor(&doctor_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

        self.check_date_of_birth(&doctor_id, doctor.doctor_date_of_birth, dob)?;
        self.issue(&doctor.doctor_id, Role::Doctor, Some(&doctor.doctor_name))
    }

    pub fn login_admin(&self, request: AdminLoginRequest) -> Result<LoginResponse, AppError> {
        let username = required_text("username", request.username)?;
        let password = request
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::ValidationError("password is required".to_string()))?;

        if !self.config.is_admin_login_enabled() {
            warn!("Admin login attempted but no admin credentials are configured");
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        }

        if username != self.config.admin_username || password != self.config.admin_password {
            warn!("Rejected admin login for {}", username);
            return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
        }

        self.issue(&username, Role::Admin, Some("Administrator"))
    }

    fn check_date_of_birth(&self, id: &str, stored: NaiveDate, supplied: NaiveDate) -> Result<(), AppError> {
        if stored == supplied {
            Ok(())
        } else {
            warn!("Rejected login for {}: date of birth mismatch", id);
            Err(AppError::Auth(INVALID_CREDENTIALS.to_string()))
        }
    }

    fn issue(&self, id: &str, role: Role, name: Option<&str>) -> Result<LoginResponse, AppError> {
        let (token, expires_at) = issue_token(
            id,
            role,
            name,
            &self.config.session_secret,
            Duration::hours(self.config.session_ttl_hours),
        )?;

        info!("Issued {} session for {}", role, id);

        Ok(LoginResponse {
            token,
            role,
            id: id.to_string(),
            name: name.map(str::to_string),
            expires_at,
        })
    }
}
