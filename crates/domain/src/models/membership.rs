//! Membership domain models.
//!
//! A membership ties one user to one circle, carrying role flags and the
//! invitation entitlement. At most one membership exists per
//! (user, circle) pair.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Invitation entitlement granted to every new membership.
///
/// This is a ceiling fixed at membership creation, not a balance consumed
/// per issuance call.
pub const DEFAULT_REMAINING_INVITATIONS: i32 = 10;

/// A user's membership in a circle, as seen by business rules.
#[derive(Debug, Clone)]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub circle_id: Uuid,
    pub is_active: bool,
    pub is_admin: bool,
    pub remaining_invitations: i32,
    pub rides_offered: i32,
    pub rides_taken: i32,
    pub joined_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_entitlement() {
        assert_eq!(DEFAULT_REMAINING_INVITATIONS, 10);
    }

    #[test]
    fn test_membership_clone() {
        let membership = Membership {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            circle_id: Uuid::new_v4(),
            is_active: true,
            is_admin: false,
            remaining_invitations: DEFAULT_REMAINING_INVITATIONS,
            rides_offered: 0,
            rides_taken: 0,
            joined_at: Utc::now(),
        };
        let cloned = membership.clone();
        assert_eq!(membership.user_id, cloned.user_id);
        assert_eq!(membership.remaining_invitations, 10);
    }
}
