//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod appointment;
pub mod clinic;
pub mod patient_record;
pub mod user;
pub mod xray;
