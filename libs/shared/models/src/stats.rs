use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::visit::VisitStatus;

/// One labelled count in an ordered breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBucket {
    pub label: String,
    pub count: i64,
}

impl CountBucket {
    pub fn new(label: impl Into<String>, count: i64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeGroup {
    Under18,
    From18To30,
    From31To45,
    From46To60,
    Over60,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::Under18,
        AgeGroup::From18To30,
        AgeGroup::From31To45,
        AgeGroup::From46To60,
        AgeGroup::Over60,
    ];

    pub fn for_age(years: i32) -> Self {
        match years {
            i32::MIN..=17 => AgeGroup::Under18,
            18..=30 => AgeGroup::From18To30,
            31..=45 => AgeGroup::From31To45,
            46..=60 => AgeGroup::From46To60,
            _ => AgeGroup::Over60,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Under18 => "Under 18",
            AgeGroup::From18To30 => "18-30",
            AgeGroup::From31To45 => "31-45",
            AgeGroup::From46To60 => "46-60",
            AgeGroup::Over60 => "Over 60",
        }
    }
}

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// ISO day of week, 1 = Monday.
pub fn weekday_name(iso_day: i32) -> Option<&'static str> {
    usize::try_from(iso_day - 1).ok().and_then(|i| WEEKDAYS.get(i).copied())
}

/// Calendar month, 1 = January.
pub fn month_name(month: i32) -> Option<&'static str> {
    usize::try_from(month - 1).ok().and_then(|i| MONTHS.get(i).copied())
}

/// A visit joined with the names of its participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VisitSummary {
    pub visit_id: uuid::Uuid,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub date_of_visit: DateTime<Utc>,
    pub visit_status: VisitStatus,
    pub visit_reason: Option<String>,
}
