//! Hostel back-office library: guest onboarding wizard, room catalog,
//! identity directory search, and booking submission.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
