//! Repository implementations.

pub mod circle;
pub mod invitation;
pub mod membership;
pub mod rating;
pub mod ride;
pub mod user;

pub use circle::CircleRepository;
pub use invitation::InvitationRepository;
pub use membership::MembershipRepository;
pub use rating::{RatingRepository, RatingWrite};
pub use ride::{JoinRideOutcome, RideRepository};
pub use user::UserRepository;
