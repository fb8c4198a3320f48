//! Circle repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::membership::DEFAULT_REMAINING_INVITATIONS;

use crate::entities::CircleEntity;
use crate::metrics::QueryTimer;

/// Repository for circle-related database operations.
#[derive(Clone)]
pub struct CircleRepository {
    pool: PgPool,
}

impl CircleRepository {
    /// Creates a new CircleRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a circle and enroll its creator as the founding admin.
    ///
    /// Both inserts run in a single transaction so a circle can never
    /// exist without at least one admin member.
    pub async fn create_with_founder(
        &self,
        name: &str,
        slug: &str,
        about: Option<&str>,
        is_public: bool,
        is_limited: bool,
        founder_id: Uuid,
    ) -> Result<CircleEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_circle");
        let mut tx = self.pool.begin().await?;

        let circle = sqlx::query_as::<_, CircleEntity>(
            r#"
            INSERT INTO circles (name, slug, about, is_public, is_limited, members_count)
            VALUES ($1, $2, $3, $4, $5, 1)
            RETURNING id, name, slug, about, is_public, is_verified, is_limited, rides_offered, rides_taken, members_count, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(about)
        .bind(is_public)
        .bind(is_limited)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO memberships (user_id, circle_id, is_admin, remaining_invitations)
            VALUES ($1, $2, true, $3)
            "#,
        )
        .bind(founder_id)
        .bind(circle.id)
        .bind(DEFAULT_REMAINING_INVITATIONS)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(circle)
    }

    /// Find a circle by its slug.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<CircleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_circle_by_slug");
        let result = sqlx::query_as::<_, CircleEntity>(
            r#"
            SELECT id, name, slug, about, is_public, is_verified, is_limited, rides_offered, rides_taken, members_count, created_at, updated_at
            FROM circles
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List public circles, most active first, with a total count for
    /// pagination.
    pub async fn list_public(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<CircleEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_public_circles");

        let circles = sqlx::query_as::<_, CircleEntity>(
            r#"
            SELECT id, name, slug, about, is_public, is_verified, is_limited, rides_offered, rides_taken, members_count, created_at, updated_at
            FROM circles
            WHERE is_public = true
            ORDER BY members_count DESC, rides_offered DESC, rides_taken DESC, name ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM circles WHERE is_public = true")
                .fetch_one(&self.pool)
                .await?;

        timer.record();
        Ok((circles, total.0))
    }

    /// Update circle fields by slug. `None` leaves a field untouched.
    /// The slug itself and the verified flag are never updated here.
    pub async fn update(
        &self,
        slug: &str,
        name: Option<&str>,
        about: Option<&str>,
        is_public: Option<bool>,
        is_limited: Option<bool>,
    ) -> Result<Option<CircleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_circle");
        let result = sqlx::query_as::<_, CircleEntity>(
            r#"
            UPDATE circles
            SET name = COALESCE($2, name),
                about = COALESCE($3, about),
                is_public = COALESCE($4, is_public),
                is_limited = COALESCE($5, is_limited),
                updated_at = NOW()
            WHERE slug = $1
            RETURNING id, name, slug, about, is_public, is_verified, is_limited, rides_offered, rides_taken, members_count, created_at, updated_at
            "#,
        )
        .bind(slug)
        .bind(name)
        .bind(about)
        .bind(is_public)
        .bind(is_limited)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

