//! Ride repository for database operations.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::ride::{RIDE_JOIN_GRACE_MINUTES, RIDE_SWEEP_WINDOW_MINUTES};

use crate::entities::{PassengerEntity, RideEntity};
use crate::metrics::QueryTimer;

const RIDE_COLUMNS: &str = "id, circle_id, offered_by, departure_location, departure_date, arrival_location, arrival_date, available_seats, comments, is_active, finished_at, created_at, updated_at";

/// Outcome of a join attempt, resolved inside one transaction.
#[derive(Debug)]
pub enum JoinRideOutcome {
    /// The passenger was added and a seat taken.
    Joined(RideEntity),
    /// No seats left.
    Full,
    /// The user already sits on this ride.
    AlreadyPassenger,
    /// The ride is already finished.
    Finished,
    /// Departure already passed or falls inside the boarding grace window.
    Departed,
    /// The ride no longer exists in this circle.
    NotFound,
}

/// Repository for ride-related database operations.
#[derive(Clone)]
pub struct RideRepository {
    pool: PgPool,
}

impl RideRepository {
    /// Creates a new RideRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a ride and bump the offered counters on the circle and the
    /// offering membership, all in one transaction.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        circle_id: Uuid,
        offered_by: Uuid,
        departure_location: &str,
        departure_date: DateTime<Utc>,
        arrival_location: &str,
        arrival_date: DateTime<Utc>,
        available_seats: i32,
        comments: Option<&str>,
    ) -> Result<RideEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_ride");
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO rides (circle_id, offered_by, departure_location, departure_date, arrival_location, arrival_date, available_seats, comments)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {RIDE_COLUMNS}
            "#
        );
        let ride = sqlx::query_as::<_, RideEntity>(&sql)
            .bind(circle_id)
            .bind(offered_by)
            .bind(departure_location)
            .bind(departure_date)
            .bind(arrival_location)
            .bind(arrival_date)
            .bind(available_seats)
            .bind(comments)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE circles SET rides_offered = rides_offered + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(circle_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE memberships
            SET rides_offered = rides_offered + 1, updated_at = NOW()
            WHERE user_id = $1 AND circle_id = $2
            "#,
        )
        .bind(offered_by)
        .bind(circle_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(ride)
    }

    /// List joinable rides in a circle: active, with seats, departing
    /// after the join grace window. Soonest departure first.
    pub async fn list_joinable(
        &self,
        circle_id: Uuid,
        now: DateTime<Utc>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<RideEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_joinable_rides");
        let cutoff = now + Duration::minutes(RIDE_JOIN_GRACE_MINUTES);
        let pattern = search.map(|s| format!("%{s}%"));

        let sql = format!(
            r#"
            SELECT {RIDE_COLUMNS}
            FROM rides
            WHERE circle_id = $1
              AND is_active = true
              AND available_seats >= 1
              AND departure_date >= $2
              AND ($3::text IS NULL OR departure_location ILIKE $3 OR arrival_location ILIKE $3)
            ORDER BY departure_date ASC, arrival_date ASC, available_seats ASC
            LIMIT $4 OFFSET $5
            "#
        );
        let rides = sqlx::query_as::<_, RideEntity>(&sql)
            .bind(circle_id)
            .bind(cutoff)
            .bind(pattern.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let total: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM rides
            WHERE circle_id = $1
              AND is_active = true
              AND available_seats >= 1
              AND departure_date >= $2
              AND ($3::text IS NULL OR departure_location ILIKE $3 OR arrival_location ILIKE $3)
            "#,
        )
        .bind(circle_id)
        .bind(cutoff)
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        timer.record();
        Ok((rides, total.0))
    }

    /// Find a ride by id within a circle, regardless of its state.
    pub async fn find_by_id(
        &self,
        circle_id: Uuid,
        ride_id: Uuid,
    ) -> Result<Option<RideEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_ride_by_id");
        let sql = format!("SELECT {RIDE_COLUMNS} FROM rides WHERE id = $1 AND circle_id = $2");
        let result = sqlx::query_as::<_, RideEntity>(&sql)
            .bind(ride_id)
            .bind(circle_id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List the passengers of a ride with their usernames.
    pub async fn passengers(&self, ride_id: Uuid) -> Result<Vec<PassengerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_ride_passengers");
        let result = sqlx::query_as::<_, PassengerEntity>(
            r#"
            SELECT p.user_id, u.username
            FROM ride_passengers p
            JOIN users u ON u.id = p.user_id
            WHERE p.ride_id = $1
            ORDER BY p.created_at ASC
            "#,
        )
        .bind(ride_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether a user is the offerer or a passenger of a ride.
    pub async fn is_participant(
        &self,
        ride_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("is_ride_participant");
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM rides WHERE id = $1 AND offered_by = $2
                UNION ALL
                SELECT 1 FROM ride_passengers WHERE ride_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(ride_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(result.0)
    }

    /// Add a passenger to a ride, taking one seat.
    ///
    /// The ride row is locked first; the seat itself is taken with a
    /// conditional decrement so that past the last seat every concurrent
    /// attempt resolves to `Full`.
    pub async fn join(
        &self,
        circle_id: Uuid,
        ride_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<JoinRideOutcome, sqlx::Error> {
        let timer = QueryTimer::new("join_ride");
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "SELECT {RIDE_COLUMNS} FROM rides WHERE id = $1 AND circle_id = $2 FOR UPDATE"
        );
        let ride = sqlx::query_as::<_, RideEntity>(&sql)
            .bind(ride_id)
            .bind(circle_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(ride) = ride else {
            tx.rollback().await?;
            timer.record();
            return Ok(JoinRideOutcome::NotFound);
        };
        if !ride.is_active {
            tx.rollback().await?;
            timer.record();
            return Ok(JoinRideOutcome::Finished);
        }
        let cutoff = now + Duration::minutes(RIDE_JOIN_GRACE_MINUTES);
        if ride.departure_date < cutoff {
            tx.rollback().await?;
            timer.record();
            return Ok(JoinRideOutcome::Departed);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO ride_passengers (ride_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (ride_id, user_id) DO NOTHING
            "#,
        )
        .bind(ride_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            timer.record();
            return Ok(JoinRideOutcome::AlreadyPassenger);
        }

        let sql = format!(
            r#"
            UPDATE rides
            SET available_seats = available_seats - 1, updated_at = NOW()
            WHERE id = $1 AND available_seats > 0
            RETURNING {RIDE_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, RideEntity>(&sql)
            .bind(ride_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(updated) = updated else {
            tx.rollback().await?;
            timer.record();
            return Ok(JoinRideOutcome::Full);
        };

        sqlx::query(
            "UPDATE circles SET rides_taken = rides_taken + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(circle_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE memberships
            SET rides_taken = rides_taken + 1, updated_at = NOW()
            WHERE user_id = $1 AND circle_id = $2
            "#,
        )
        .bind(user_id)
        .bind(circle_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(JoinRideOutcome::Joined(updated))
    }

    /// Finish an active ride, recording the finish time. Returns `None`
    /// when the ride does not exist or is already finished.
    pub async fn finish(
        &self,
        circle_id: Uuid,
        ride_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<RideEntity>, sqlx::Error> {
        let timer = QueryTimer::new("finish_ride");
        let sql = format!(
            r#"
            UPDATE rides
            SET is_active = false, finished_at = $3, updated_at = NOW()
            WHERE id = $1 AND circle_id = $2 AND is_active = true
            RETURNING {RIDE_COLUMNS}
            "#
        );
        let result = sqlx::query_as::<_, RideEntity>(&sql)
            .bind(ride_id)
            .bind(circle_id)
            .bind(now)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Deactivate rides whose arrival fell within the sweep window before
    /// `now` without an explicit finish. Idempotent: swept rides are
    /// inactive and never match again.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("sweep_rides");
        let window_start = now - Duration::minutes(RIDE_SWEEP_WINDOW_MINUTES);
        let result = sqlx::query(
            r#"
            UPDATE rides
            SET is_active = false, finished_at = arrival_date, updated_at = NOW()
            WHERE is_active = true AND arrival_date > $1 AND arrival_date <= $2
            "#,
        )
        .bind(window_start)
        .bind(now)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
