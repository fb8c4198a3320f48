//! Shared utilities and common types for the Comparte Ride backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Password hashing with Argon2id
//! - JWT issuance and validation (session and account-verification tokens)
//! - Common validation logic
//! - Offset pagination helpers

pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
