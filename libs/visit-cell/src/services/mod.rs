pub mod booking;
pub mod lifecycle;
pub mod schedule;

pub use booking::VisitBookingService;
pub use lifecycle::VisitLifecycleService;
pub use schedule::VisitScheduleService;
