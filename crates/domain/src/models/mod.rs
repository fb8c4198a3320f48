//! Domain models.

pub mod circle;
pub mod invitation;
pub mod membership;
pub mod rating;
pub mod ride;
pub mod user;
