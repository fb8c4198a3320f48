//! Rating repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RatingEntity;
use crate::metrics::QueryTimer;

/// Fields for a new rating row.
#[derive(Debug, Clone)]
pub struct RatingWrite {
    pub ride_id: Uuid,
    pub circle_id: Uuid,
    pub rating_user_id: Uuid,
    pub rated_user_id: Uuid,
    pub score: i16,
    pub comment: Option<String>,
}

/// Repository for rating database operations.
#[derive(Clone)]
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    /// Creates a new RatingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a rating and fold it into the rated user's reputation in
    /// the same transaction.
    ///
    /// The unique index on (ride_id, rating_user_id, rated_user_id)
    /// rejects a second rating for the same pair on the same ride.
    pub async fn create(&self, write: RatingWrite) -> Result<RatingEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_rating");
        let mut tx = self.pool.begin().await?;

        let rating = sqlx::query_as::<_, RatingEntity>(
            r#"
            INSERT INTO ratings (ride_id, circle_id, rating_user_id, rated_user_id, score, comment)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, ride_id, circle_id, rating_user_id, rated_user_id, score, comment, created_at
            "#,
        )
        .bind(write.ride_id)
        .bind(write.circle_id)
        .bind(write.rating_user_id)
        .bind(write.rated_user_id)
        .bind(write.score)
        .bind(write.comment.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE users
            SET reputation = (
                    SELECT AVG(score)::float8 FROM ratings WHERE rated_user_id = $1
                ),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(write.rated_user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(rating)
    }

    /// Whether this rater has already rated this user on this ride.
    pub async fn exists(
        &self,
        ride_id: Uuid,
        rating_user_id: Uuid,
        rated_user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("rating_exists");
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM ratings
                WHERE ride_id = $1 AND rating_user_id = $2 AND rated_user_id = $3
            )
            "#,
        )
        .bind(ride_id)
        .bind(rating_user_id)
        .bind(rated_user_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(result.0)
    }
}

