use std::sync::Arc;

use tracing::{debug, info};

use shared_database::{AppState, DoctorRepository, HospitalStore};
use shared_models::auth::Session;
use shared_models::demographics::Gender;
use shared_models::doctor::{Doctor, DoctorPatch, NewDoctor};
use shared_models::error::AppError;
use shared_models::identifier::IdentifierKind;
use shared_utils::extractor::{require_admin, require_doctor_access};
use shared_utils::validation::{contact_number, identifier, iso_date, patch_text, required_text};

use crate::models::{normalize_specialization, CreateDoctorRequest, UpdateDoctorRequest, SPECIALIZATIONS};

fn parse_specialization(value: &str) -> Result<String, AppError> {
    normalize_specialization(value)
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::ValidationError(format!(
                "Unknown specialization '{}'; expected one of: {}",
                value.trim(),
                SPECIALIZATIONS.join(", ")
            ))
        })
}

fn parse_gender(value: &str) -> Result<Gender, AppError> {
    value.parse().map_err(AppError::ValidationError)
}

pub fn validate_new_doctor(request: CreateDoctorRequest) -> Result<NewDoctor, AppError> {
    let name = required_text("doctorName", request.doctor_name)?;
    let specialization = required_text("doctorSpecialization", request.doctor_specialization)?;
    let dob = required_text("dateOfBirth", request.date_of_birth)?;
    let contact = required_text("contactNumber", request.contact_number)?;
    let address = required_text("address", request.address)?;
    let gender = required_text("gender", request.gender)?;

    Ok(NewDoctor {
        name,
        specialization: parse_specialization(&specialization)?,
        date_of_birth: iso_date("dateOfBirth", &dob)?,
        contact: contact_number("contactNumber", &contact)?,
        address,
        gender: parse_gender(&gender)?,
        is_available: request.doctor_is_available.unwrap_or(true),
    })
}

pub fn validate_patch(request: UpdateDoctorRequest) -> Result<DoctorPatch, AppError> {
    let patch = DoctorPatch {
        name: patch_text("doctorName", request.doctor_name)?,
        specialization: request
            .doctor_specialization
            .map(|s| parse_specialization(&s))
            .transpose()?,
        date_of_birth: request
            .date_of_birth
            .map(|dob| iso_date("dateOfBirth", &dob))
            .transpose()?,
        contact: request
            .contact_number
            .map(|c| contact_number("contactNumber", &c))
            .transpose()?,
        address: patch_text("address", request.address)?,
        gender: request.gender.map(|g| parse_gender(&g)).transpose()?,
        is_available: request.doctor_is_available,
    };

    if patch.is_empty() {
        return Err(AppError::ValidationError(
            "At least one field must be provided".to_string(),
        ));
    }
    Ok(patch)
}

pub struct DoctorService {
    store: Arc<dyn HospitalStore>,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    pub async fn create_doctor(&self, session: &Session, request: CreateDoctorRequest) -> Result<Doctor, AppError> {
        require_admin(session)?;
        let new_doctor = validate_new_doctor(request)?;

        let doctor = self.store.insert_doctor(new_doctor).await?;
        info!("Registered doctor {} ({})", doctor.doctor_id, doctor.doctor_specialization);
        Ok(doctor)
    }

    pub async fn list_doctors(&self, available_only: bool) -> Result<Vec<Doctor>, AppError> {
        debug!("Listing doctors (available only: {})", available_only);
        Ok(self.store.list_doctors(available_only).await?)
    }

    pub async fn get_doctor(&self, doctor_id: &str) -> Result<Doctor, AppError> {
        let doctor_id = identifier(IdentifierKind::Doctor, doctor_id)?;

        self.store
            .get_doctor(&doctor_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))
    }

    /// Admins, or the doctor editing their own record.
    pub async fn update_doctor(
        &self,
        session: &Session,
        doctor_id: &str,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, AppError> {
        let doctor_id = identifier(IdentifierKind::Doctor, doctor_id)?;
        require_doctor_access(session, &doctor_id)?;
        let patch = validate_patch(request)?;

        let doctor = self
            .store
            .update_doctor(&doctor_id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

        info!("Updated doctor {}", doctor.doctor_id);
        Ok(doctor)
    }

    pub async fn delete_doctor(&self, session: &Session, doctor_id: &str) -> Result<Doctor, AppError> {
        require_admin(session)?;
        let doctor_id = identifier(IdentifierKind::Doctor, doctor_id)?;

        let doctor = self.store.delete_doctor(&doctor_id).await?;
        info!("Deleted doctor {}", doctor.doctor_id);
        Ok(doctor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn complete_request() -> CreateDoctorRequest {
        CreateDoctorRequest {
            doctor_name: Some("Dr. Farah Khan".to_string()),
            doctor_specialization: Some("pediatrics".to_string()),
            date_of_birth: Some("1982-12-01".to_string()),
            contact_number: Some("9090909090".to_string()),
            address: Some("Block C".to_string()),
            gender: Some("F".to_string()),
            doctor_is_available: None,
        }
    }

    #[test]
    fn registration_defaults_to_available() {
        let doctor = validate_new_doctor(complete_request()).unwrap();
        assert!(doctor.is_available);
        assert_eq!(doctor.specialization, "Pediatrics");
    }

    #[test]
    fn rejects_unknown_specialization() {
        let mut request = complete_request();
        request.doctor_specialization = Some("Alchemy".to_string());
        assert_matches!(validate_new_doctor(request), Err(AppError::ValidationError(msg)) if msg.contains("Alchemy"));
    }

    #[test]
    fn availability_alone_is_a_valid_patch() {
        let patch = validate_patch(UpdateDoctorRequest {
            doctor_is_available: Some(false),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.is_available, Some(false));
        assert!(validate_patch(UpdateDoctorRequest::default()).is_err());
    }
}
