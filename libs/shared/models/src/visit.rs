use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "visit_status", rename_all = "lowercase")]
pub enum VisitStatus {
    Pending,
    Visited,
    Missed,
    Cancelled,
}

impl VisitStatus {
    pub const ALL: [VisitStatus; 4] = [
        VisitStatus::Pending,
        VisitStatus::Visited,
        VisitStatus::Missed,
        VisitStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Pending => "pending",
            VisitStatus::Visited => "visited",
            VisitStatus::Missed => "missed",
            VisitStatus::Cancelled => "cancelled",
        }
    }

    /// All statuses reachable in one step from `self`.
    pub fn valid_transitions(&self) -> &'static [VisitStatus] {
        match self {
            VisitStatus::Pending => &[
                VisitStatus::Visited,
                VisitStatus::Missed,
                VisitStatus::Cancelled,
            ],
            // Terminal states - no transitions allowed
            VisitStatus::Visited | VisitStatus::Missed | VisitStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, target: VisitStatus) -> bool {
        self.valid_transitions().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        VisitStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| format!("Invalid visit status '{}'", s.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Visit {
    pub visit_id: Uuid,
    pub patient_id: String,
    pub doctor_id: String,
    pub date_of_visit: DateTime<Utc>,
    pub visit_status: VisitStatus,
    pub visit_reason: Option<String>,
    pub report_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Visit {
    pub fn visit_date(&self) -> NaiveDate {
        self.date_of_visit.date_naive()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVisit {
    pub patient_id: String,
    pub doctor_id: String,
    pub date_of_visit: DateTime<Utc>,
    pub visit_reason: Option<String>,
}

/// What the doctor records when a visit is completed.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionNote {
    pub doctor_remarks: String,
    pub prescription: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
}

/// A requested move out of `pending`.
#[derive(Debug, Clone, PartialEq)]
pub enum VisitTransition {
    Complete(CompletionNote),
    Miss,
    Cancel,
}

impl VisitTransition {
    pub fn target(&self) -> VisitStatus {
        match self {
            VisitTransition::Complete(_) => VisitStatus::Visited,
            VisitTransition::Miss => VisitStatus::Missed,
            VisitTransition::Cancel => VisitStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionOutcome {
    pub visit: Visit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
}

/// Read-only filters over one doctor's visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorVisitView {
    AllPending,
    Today(NaiveDate),
    Upcoming(NaiveDate),
    Past { limit: usize },
}

impl DoctorVisitView {
    pub const PAST_LIMIT: usize = 20;

    pub fn matches(&self, visit: &Visit) -> bool {
        match self {
            DoctorVisitView::AllPending => visit.visit_status == VisitStatus::Pending,
            DoctorVisitView::Today(today) => visit.visit_date() == *today,
            DoctorVisitView::Upcoming(today) => {
                visit.visit_status == VisitStatus::Pending && visit.visit_date() > *today
            }
            DoctorVisitView::Past { .. } => visit.visit_status.is_terminal(),
        }
    }

    pub fn most_recent_first(&self) -> bool {
        matches!(self, DoctorVisitView::Past { .. })
    }

    pub fn limit(&self) -> Option<usize> {
        match self {
            DoctorVisitView::Past { limit } => Some(*limit),
            _ => None,
        }
    }
}
