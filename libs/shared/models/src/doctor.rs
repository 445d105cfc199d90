use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::demographics::Gender;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Doctor {
    pub doctor_id: String,
    pub doctor_name: String,
    pub doctor_specialization: String,
    pub doctor_date_of_birth: NaiveDate,
    pub doctor_contact: String,
    pub doctor_address: String,
    pub doctor_gender: Gender,
    pub doctor_is_available: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDoctor {
    pub name: String,
    pub specialization: String,
    pub date_of_birth: NaiveDate,
    pub contact: String,
    pub address: String,
    pub gender: Gender,
    pub is_available: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctorPatch {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub gender: Option<Gender>,
    pub is_available: Option<bool>,
}

impl DoctorPatch {
    pub fn is_empty(&self) -> bool {
        self == &DoctorPatch::default()
    }

    pub fn apply_to(&self, doctor: &mut Doctor) {
        if let Some(name) = &self.name {
            doctor.doctor_name = name.clone();
        }
        if let Some(specialization) = &self.specialization {
            doctor.doctor_specialization = specialization.clone();
        }
        if let Some(dob) = self.date_of_birth {
            doctor.doctor_date_of_birth = dob;
        }
        if let Some(contact) = &self.contact {
            doctor.doctor_contact = contact.clone();
        }
        if let Some(address) = &self.address {
            doctor.doctor_address = address.clone();
        }
        if let Some(gender) = self.gender {
            doctor.doctor_gender = gender;
        }
        if let Some(is_available) = self.is_available {
            doctor.doctor_is_available = is_available;
        }
    }
}
