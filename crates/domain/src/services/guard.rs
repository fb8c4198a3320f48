//! Membership guard predicates.
//!
//! Authorization over (user, circle, resource) triples expressed as pure
//! functions: no I/O, no exceptions. Callers fetch the membership
//! snapshot, ask the guard, and map a denial to their own error code.

use uuid::Uuid;

use crate::models::membership::Membership;

/// True iff an active membership exists for the user in the circle.
pub fn is_active_member(membership: Option<&Membership>) -> bool {
    membership.map(|m| m.is_active).unwrap_or(false)
}

/// True iff an active admin membership exists for the user in the circle.
pub fn is_circle_admin(membership: Option<&Membership>) -> bool {
    membership.map(|m| m.is_active && m.is_admin).unwrap_or(false)
}

/// True iff the acting user owns the target membership, or holds an
/// active admin membership in the circle.
pub fn is_admin_or_owner(
    acting_user: Uuid,
    membership_owner: Uuid,
    acting_membership: Option<&Membership>,
) -> bool {
    acting_user == membership_owner || is_circle_admin(acting_membership)
}

/// True iff the acting user is the owner of the target membership.
pub fn is_self_member(acting_user: Uuid, membership_owner: Uuid) -> bool {
    acting_user == membership_owner
}

/// True iff the user offered the ride. `offered_by` is nullable because
/// user references survive user deletion as NULL.
pub fn is_ride_owner(user: Uuid, offered_by: Option<Uuid>) -> bool {
    offered_by == Some(user)
}

/// True iff the user did not offer the ride.
pub fn is_not_ride_owner(user: Uuid, offered_by: Option<Uuid>) -> bool {
    !is_ride_owner(user, offered_by)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn membership(is_active: bool, is_admin: bool) -> Membership {
        Membership {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            circle_id: Uuid::new_v4(),
            is_active,
            is_admin,
            remaining_invitations: 10,
            rides_offered: 0,
            rides_taken: 0,
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_active_member() {
        assert!(is_active_member(Some(&membership(true, false))));
        assert!(!is_active_member(Some(&membership(false, false))));
        assert!(!is_active_member(None));
    }

    #[test]
    fn test_is_circle_admin() {
        assert!(is_circle_admin(Some(&membership(true, true))));
        assert!(!is_circle_admin(Some(&membership(true, false))));
        // An inactive admin membership grants nothing.
        assert!(!is_circle_admin(Some(&membership(false, true))));
        assert!(!is_circle_admin(None));
    }

    #[test]
    fn test_is_admin_or_owner_as_owner() {
        let user = Uuid::new_v4();
        assert!(is_admin_or_owner(user, user, None));
    }

    #[test]
    fn test_is_admin_or_owner_as_admin() {
        let acting = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(is_admin_or_owner(acting, other, Some(&membership(true, true))));
        assert!(!is_admin_or_owner(acting, other, Some(&membership(true, false))));
        assert!(!is_admin_or_owner(acting, other, None));
    }

    #[test]
    fn test_is_self_member() {
        let user = Uuid::new_v4();
        assert!(is_self_member(user, user));
        assert!(!is_self_member(user, Uuid::new_v4()));
    }

    #[test]
    fn test_ride_owner_predicates() {
        let owner = Uuid::new_v4();
        let passenger = Uuid::new_v4();

        assert!(is_ride_owner(owner, Some(owner)));
        assert!(!is_ride_owner(passenger, Some(owner)));
        assert!(is_not_ride_owner(passenger, Some(owner)));

        // Deleted offerer: nobody owns the ride.
        assert!(!is_ride_owner(owner, None));
        assert!(is_not_ride_owner(owner, None));
    }
}
