//! Persistence layer for the Comparte Ride backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations, including the transactional guards for
//!   invitation issuance and ride seat accounting

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
