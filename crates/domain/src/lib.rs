//! Domain layer for the Comparte Ride backend.
//!
//! This crate contains:
//! - Domain models (User, Circle, Membership, Invitation, Ride, Rating)
//! - Pure business rules (membership guards, invitation code policy)

pub mod models;
pub mod services;
