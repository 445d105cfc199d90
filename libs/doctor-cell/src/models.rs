use serde::{Deserialize, Serialize};

/// Specializations a doctor may be registered under.
pub const SPECIALIZATIONS: [&str; 15] = [
    "Cardiology",
    "Dermatology",
    "Endocrinology",
    "Gastroenterology",
    "General Medicine",
    "Neurology",
    "Obstetrics",
    "Oncology",
    "Ophthalmology",
    "Orthopedics",
    "Pediatrics",
    "Psychiatry",
    "Pulmonology",
    "Radiology",
    "Urology",
];

/// Case-insensitive lookup returning the canonical spelling.
pub fn normalize_specialization(value: &str) -> Option<&'static str> {
    let value = value.trim();
    SPECIALIZATIONS
        .iter()
        .copied()
        .find(|known| known.eq_ignore_ascii_case(value))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    pub doctor_name: Option<String>,
    pub doctor_specialization: Option<String>,
    pub date_of_birth: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub doctor_is_available: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorRequest {
    pub doctor_name: Option<String>,
    pub doctor_specialization: Option<String>,
    pub date_of_birth: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub doctor_is_available: Option<bool>,
}
