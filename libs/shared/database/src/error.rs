use thiserror::Error;
use tracing::error;

use shared_models::error::AppError;
use shared_models::identifier::{IdentifierError, IdentifierKind};
use shared_models::visit::VisitStatus;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("doctor {0} is not available for appointments")]
    DoctorUnavailable(String),

    #[error("visit {visit_id} is {from} and cannot become {to}")]
    InvalidTransition {
        visit_id: String,
        from: VisitStatus,
        to: VisitStatus,
    },

    #[error("{entity} {id} is still referenced by visits")]
    StillReferenced { entity: &'static str, id: String },

    #[error("patient {patient_id} already has a visit with doctor {doctor_id} at that time")]
    DuplicateVisit { patient_id: String, doctor_id: String },

    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    #[error("could not allocate a {0} identifier after repeated collisions")]
    AllocationContention(IdentifierKind),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

fn capitalized(entity: &str) -> String {
    let mut chars = entity.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => {
                AppError::NotFound(format!("{} not found", capitalized(entity)))
            }
            StoreError::DoctorUnavailable(_) => {
                AppError::PreconditionFailed("Doctor is not available for appointments".to_string())
            }
            StoreError::InvalidTransition { from, to, .. } => AppError::PreconditionFailed(format!(
                "Visit is already {} and cannot be marked {}",
                from, to
            )),
            StoreError::StillReferenced { entity, .. } => AppError::Conflict(format!(
                "Cannot delete {} because they have associated visits",
                entity
            )),
            StoreError::DuplicateVisit { .. } => AppError::Conflict(
                "A visit with this doctor is already booked at that time".to_string(),
            ),
            StoreError::Identifier(IdentifierError::Exhausted { kind }) => {
                AppError::Conflict(format!("No {} identifiers left to allocate", kind))
            }
            StoreError::Identifier(malformed @ IdentifierError::Malformed { .. }) => {
                error!("Identifier integrity fault: {}", malformed);
                AppError::Integrity(malformed.to_string())
            }
            StoreError::AllocationContention(kind) => AppError::Conflict(format!(
                "Could not allocate a new {} identifier, please retry",
                kind
            )),
            StoreError::Database(db) => AppError::Database(db.to_string()),
            StoreError::Migration(migration) => AppError::Database(migration.to_string()),
        }
    }
}
