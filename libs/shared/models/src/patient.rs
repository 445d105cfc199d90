use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::demographics::{BloodGroup, Gender};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Patient {
    pub patient_id: String,
    pub patient_name: String,
    pub patient_dob: NaiveDate,
    pub patient_address: String,
    pub patient_contact: String,
    pub patient_gender: Gender,
    pub patient_blood_group: BloodGroup,
    pub patient_height: Option<f64>,
    pub patient_weight: Option<f64>,
    pub patient_updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        today.years_since(self.patient_dob).unwrap_or(0)
    }
}

/// Validated registration data; the identifier is allocated by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub contact: String,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientPatch {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub gender: Option<Gender>,
    pub blood_group: Option<BloodGroup>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl PatientPatch {
    pub fn is_empty(&self) -> bool {
        self == &PatientPatch::default()
    }

    pub fn apply_to(&self, patient: &mut Patient) {
        if let Some(name) = &self.name {
            patient.patient_name = name.clone();
        }
        if let Some(dob) = self.date_of_birth {
            patient.patient_dob = dob;
        }
        if let Some(address) = &self.address {
            patient.patient_address = address.clone();
        }
        if let Some(contact) = &self.contact {
            patient.patient_contact = contact.clone();
        }
        if let Some(gender) = self.gender {
            patient.patient_gender = gender;
        }
        if let Some(blood_group) = self.blood_group {
            patient.patient_blood_group = blood_group;
        }
        if let Some(height) = self.height {
            patient.patient_height = Some(height);
        }
        if let Some(weight) = self.weight {
            patient.patient_weight = Some(weight);
        }
    }
}
