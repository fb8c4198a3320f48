//! HTTP route handlers.

pub mod circles;
pub mod health;
pub mod invitations;
pub mod rides;
pub mod users;
