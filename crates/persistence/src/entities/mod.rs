//! Database entity definitions (row mappings).

pub mod circle;
pub mod invitation;
pub mod membership;
pub mod rating;
pub mod ride;
pub mod user;

pub use circle::CircleEntity;
pub use invitation::InvitationEntity;
pub use membership::MembershipEntity;
pub use rating::RatingEntity;
pub use ride::{PassengerEntity, RideEntity};
pub use user::UserEntity;
