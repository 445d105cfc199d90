pub mod auth;
pub mod demographics;
pub mod doctor;
pub mod error;
pub mod identifier;
pub mod patient;
pub mod report;
pub mod response;
pub mod stats;
pub mod visit;
