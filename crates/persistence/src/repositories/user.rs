//! User repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new, unverified user.
    pub async fn create_user(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
        phone_number: &str,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (email, username, password_hash, first_name, last_name, phone_number)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, username, first_name, last_name, phone_number, password_hash, is_verified, is_client, reputation, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .bind(phone_number)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, username, first_name, last_name, phone_number, password_hash, is_verified, is_client, reputation, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, username, first_name, last_name, phone_number, password_hash, is_verified, is_client, reputation, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by username.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_username");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, username, first_name, last_name, phone_number, password_hash, is_verified, is_client, reputation, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark the user with the given username as verified.
    ///
    /// Returns the number of rows updated (0 if the user does not exist
    /// or was already verified).
    pub async fn mark_verified(&self, username: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_user_verified");
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_verified = true, updated_at = NOW()
            WHERE username = $1 AND is_verified = false
            "#,
        )
        .bind(username)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Update profile fields for a user. `None` leaves a field untouched.
    pub async fn update_profile(
        &self,
        id: Uuid,
        first_name: Option<&str>,
        last_name: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_user_profile");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone_number = COALESCE($4, phone_number),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, username, first_name, last_name, phone_number, password_hash, is_verified, is_client, reputation, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .bind(phone_number)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

