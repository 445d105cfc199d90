pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod state;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::{
    DoctorRepository, HospitalStore, PatientRepository, ReportRepository, StatisticsRepository,
    VisitRepository,
};
pub use state::AppState;
