//! Invitation repository for database operations.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use domain::services::codes::generate_invitation_code;

use crate::entities::InvitationEntity;
use crate::metrics::QueryTimer;

/// Upper bound on code regeneration attempts per insert. The code space
/// is 38^10 so more than a couple of collisions in a row signals a
/// broken generator rather than bad luck.
const MAX_CODE_ATTEMPTS: usize = 100;

/// Repository for invitation-code database operations.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Creates a new InvitationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List invitations issued by a member in a circle, oldest first.
    pub async fn list_for_member(
        &self,
        issued_by: Uuid,
        circle_id: Uuid,
    ) -> Result<Vec<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_invitations");
        let result = sqlx::query_as::<_, InvitationEntity>(
            r#"
            SELECT id, circle_id, issued_by, code, created_at
            FROM invitations
            WHERE issued_by = $1 AND circle_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(issued_by)
        .bind(circle_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a single invitation with a unique code.
    ///
    /// `requested_code` is only a hint: on collision a fresh code is
    /// generated instead of failing.
    pub async fn create_invitation(
        &self,
        circle_id: Uuid,
        issued_by: Uuid,
        requested_code: Option<&str>,
    ) -> Result<InvitationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invitation");
        let mut tx = self.pool.begin().await?;
        let invitation =
            insert_with_unique_code(&mut tx, circle_id, issued_by, requested_code).await?;
        tx.commit().await?;
        timer.record();
        Ok(invitation)
    }

    /// Return a member's invitations for a circle, topping the set up to
    /// the membership's entitlement first.
    ///
    /// The membership row is locked for the duration of the transaction
    /// so concurrent calls for the same (user, circle) pair serialize and
    /// can never issue past the entitlement. Returns `None` when the user
    /// has no active membership in the circle.
    pub async fn list_or_issue(
        &self,
        user_id: Uuid,
        circle_id: Uuid,
    ) -> Result<Option<Vec<InvitationEntity>>, sqlx::Error> {
        let timer = QueryTimer::new("list_or_issue_invitations");
        let mut tx = self.pool.begin().await?;

        let entitlement: Option<(i32,)> = sqlx::query_as(
            r#"
            SELECT remaining_invitations
            FROM memberships
            WHERE user_id = $1 AND circle_id = $2 AND is_active = true
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(circle_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((entitlement,)) = entitlement else {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        };

        let (issued,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM invitations WHERE issued_by = $1 AND circle_id = $2",
        )
        .bind(user_id)
        .bind(circle_id)
        .fetch_one(&mut *tx)
        .await?;

        let missing = (i64::from(entitlement) - issued).max(0);
        for _ in 0..missing {
            insert_with_unique_code(&mut tx, circle_id, user_id, None).await?;
        }

        let invitations = sqlx::query_as::<_, InvitationEntity>(
            r#"
            SELECT id, circle_id, issued_by, code, created_at
            FROM invitations
            WHERE issued_by = $1 AND circle_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(circle_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(invitations))
    }
}

/// Insert one invitation, regenerating the code until it is unique.
///
/// The unique index on `invitations.code` is the backstop: the insert
/// uses `ON CONFLICT DO NOTHING` and retries with a fresh code whenever
/// no row comes back.
async fn insert_with_unique_code(
    tx: &mut Transaction<'_, Postgres>,
    circle_id: Uuid,
    issued_by: Uuid,
    requested_code: Option<&str>,
) -> Result<InvitationEntity, sqlx::Error> {
    for attempt in 0..MAX_CODE_ATTEMPTS {
        let code = match (attempt, requested_code) {
            (0, Some(code)) => code.to_string(),
            _ => generate_invitation_code(),
        };

        let inserted = sqlx::query_as::<_, InvitationEntity>(
            r#"
            INSERT INTO invitations (circle_id, issued_by, code)
            VALUES ($1, $2, $3)
            ON CONFLICT (code) DO NOTHING
            RETURNING id, circle_id, issued_by, code, created_at
            "#,
        )
        .bind(circle_id)
        .bind(issued_by)
        .bind(&code)
        .fetch_optional(&mut **tx)
        .await?;

        if let Some(invitation) = inserted {
            return Ok(invitation);
        }
    }

    Err(sqlx::Error::Protocol(
        "exhausted invitation code generation attempts".into(),
    ))
}

