use serde::{Deserialize, Serialize};

/// Registration body. Fields are optional here so that a missing field is
/// reported through the validation envelope rather than a JSON rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub patient_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    pub patient_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}
