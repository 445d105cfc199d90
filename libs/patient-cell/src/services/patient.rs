use std::sync::Arc;

use tracing::{debug, info};

use shared_database::{AppState, HospitalStore, PatientRepository};
use shared_models::auth::{Role, Session};
use shared_models::demographics::{BloodGroup, Gender};
use shared_models::error::AppError;
use shared_models::identifier::IdentifierKind;
use shared_models::patient::{NewPatient, Patient, PatientPatch};
use shared_utils::extractor::{require_admin, require_patient_access};
use shared_utils::validation::{
    contact_number, identifier, iso_date, patch_text, positive_measure, required_text,
};

use crate::models::{CreatePatientRequest, UpdatePatientRequest};

fn parse_gender(value: &str) -> Result<Gender, AppError> {
    value.parse().map_err(AppError::ValidationError)
}

fn parse_blood_group(value: &str) -> Result<BloodGroup, AppError> {
    value.parse().map_err(AppError::ValidationError)
}

pub fn validate_new_patient(request: CreatePatientRequest) -> Result<NewPatient, AppError> {
    let name = required_text("patientName", request.patient_name)?;
    let dob = required_text("dateOfBirth", request.date_of_birth)?;
    let address = required_text("address", request.address)?;
    let contact = required_text("contactNumber", request.contact_number)?;
    let gender = required_text("gender", request.gender)?;
    let blood_group = required_text("bloodGroup", request.blood_group)?;

    Ok(NewPatient {
        name,
        date_of_birth: iso_date("dateOfBirth", &dob)?,
        address,
        contact: contact_number("contactNumber", &contact)?,
        gender: parse_gender(&gender)?,
        blood_group: parse_blood_group(&blood_group)?,
        height: positive_measure("height", request.height)?,
        weight: positive_measure("weight", request.weight)?,
    })
}

pub fn validate_patch(request: UpdatePatientRequest) -> Result<PatientPatch, AppError> {
    let patch = PatientPatch {
        name: patch_text("patientName", request.patient_name)?,
        date_of_birth: request
            .date_of_birth
            .map(|dob| iso_date("dateOfBirth", &dob))
            .transpose()?,
        address: patch_text("address", request.address)?,
        contact: request
            .contact_number
            .map(|c| contact_number("contactNumber", &c))
            .transpose()?,
        gender: request.gender.map(|g| parse_gender(&g)).transpose()?,
        blood_group: request
            .blood_group
            .map(|b| parse_blood_group(&b))
            .transpose()?,
        height: positive_measure("height", request.height)?,
        weight: positive_measure("weight", request.weight)?,
    };

    if patch.is_empty() {
        return Err(AppError::ValidationError(
            "At least one field must be provided".to_string(),
        ));
    }
    Ok(patch)
}

pub struct PatientService {
    store: Arc<dyn HospitalStore>,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.store),
        }
    }

    pub async fn create_patient(
        &self,
        session: &Session,
        request: CreatePatientRequest,
    ) -> Result<Patient, AppError> {
        require_admin(session)?;
        let new_patient = validate_new_patient(request)?;

        let patient = self.store.insert_patient(new_patient).await?;
        info!("Registered patient {}", patient.patient_id);
        Ok(patient)
    }

    pub async fn list_patients(&self, session: &Session) -> Result<Vec<Patient>, AppError> {
        require_admin(session)?;
        Ok(self.store.list_patients().await?)
    }

    /// Admins, any doctor, or the patient themself.
    pub async fn get_patient(&self, session: &Session, patient_id: &str) -> Result<Patient, AppError> {
        let patient_id = identifier(IdentifierKind::Patient, patient_id)?;
        if session.role != Role::Doctor {
            require_patient_access(session, &patient_id)?;
        }

        debug!("Fetching patient {}", patient_id);
        self.store
            .get_patient(&patient_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))
    }

    pub async fn update_patient(
        &self,
        session: &Session,
        patient_id: &str,
        request: UpdatePatientRequest,
    ) -> Result<Patient, AppError> {
        require_admin(session)?;
        let patient_id = identifier(IdentifierKind::Patient, patient_id)?;
        let patch = validate_patch(request)?;

        let patient = self
            .store
            .update_patient(&patient_id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;

        info!("Updated patient {}", patient.patient_id);
        Ok(patient)
    }

    pub async fn delete_patient(&self, session: &Session, patient_id: &str) -> Result<Patient, AppError> {
        require_admin(session)?;
        let patient_id = identifier(IdentifierKind::Patient, patient_id)?;

        let patient = self.store.delete_patient(&patient_id).await?;
        info!("Deleted patient {}", patient.patient_id);
        Ok(patient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn complete_request() -> CreatePatientRequest {
        CreatePatientRequest {
            patient_name: Some("Meera Pillai".to_string()),
            date_of_birth: Some("1988-11-02".to_string()),
            address: Some("7 Temple Street".to_string()),
            contact_number: Some("9988776655".to_string()),
            gender: Some("female".to_string()),
            blood_group: Some("ab-".to_string()),
            height: Some(158.0),
            weight: None,
        }
    }

    #[test]
    fn validates_registration() {
        let patient = validate_new_patient(complete_request()).unwrap();
        assert_eq!(patient.gender, Gender::Female);
        assert_eq!(patient.blood_group, BloodGroup::AbNegative);

        let mut missing = complete_request();
        missing.address = None;
        assert_matches!(validate_new_patient(missing), Err(AppError::ValidationError(msg)) if msg.contains("address"));

        let mut bad_contact = complete_request();
        bad_contact.contact_number = Some("12345".to_string());
        assert_matches!(validate_new_patient(bad_contact), Err(AppError::ValidationError(_)));

        let mut bad_group = complete_request();
        bad_group.blood_group = Some("C+".to_string());
        assert_matches!(validate_new_patient(bad_group), Err(AppError::ValidationError(_)));
    }

    #[test]
    fn patch_needs_at_least_one_field() {
        assert_matches!(
            validate_patch(UpdatePatientRequest::default()),
            Err(AppError::ValidationError(_))
        );

        let patch = validate_patch(UpdatePatientRequest {
            weight: Some(61.5),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.weight, Some(61.5));
        assert!(patch.name.is_none());
    }
}
