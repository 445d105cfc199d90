use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Report {
    pub report_id: String,
    pub visit_id: Uuid,
    pub patient_id: String,
    pub doctor_id: String,
    pub date_of_visit: DateTime<Utc>,
    pub doctor_remarks: String,
    pub prescription: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}
