//! Membership repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::MembershipEntity;
use crate::metrics::QueryTimer;

/// Repository for circle membership database operations.
#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Creates a new MembershipRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the membership of a user in a circle, active or not.
    pub async fn find(
        &self,
        user_id: Uuid,
        circle_id: Uuid,
    ) -> Result<Option<MembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_membership");
        let result = sqlx::query_as::<_, MembershipEntity>(
            r#"
            SELECT id, user_id, circle_id, is_active, is_admin, remaining_invitations,
                   rides_offered, rides_taken, invited_by, created_at, updated_at
            FROM memberships
            WHERE user_id = $1 AND circle_id = $2
            "#,
        )
        .bind(user_id)
        .bind(circle_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the membership of a user in a circle by the member's username.
    pub async fn find_by_username(
        &self,
        username: &str,
        circle_id: Uuid,
    ) -> Result<Option<MembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_membership_by_username");
        let result = sqlx::query_as::<_, MembershipEntity>(
            r#"
            SELECT m.id, m.user_id, m.circle_id, m.is_active, m.is_admin, m.remaining_invitations,
                   m.rides_offered, m.rides_taken, m.invited_by, m.created_at, m.updated_at
            FROM memberships m
            JOIN users u ON u.id = m.user_id
            WHERE u.username = $1 AND m.circle_id = $2
            "#,
        )
        .bind(username)
        .bind(circle_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

