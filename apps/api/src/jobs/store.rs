//! Persistence gateway for jobs. Every operation is scoped by owner.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::job::{Job, JobFields};

/// Carried in `AppState` as `Arc<dyn JobStore>`.
///
/// Record ids arrive as raw path segments. An id that does not parse as a
/// UUID is a storage error, not a miss.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create(&self, owner: &str, fields: JobFields) -> Result<Job, sqlx::Error>;

    async fn list(&self, owner: &str) -> Result<Vec<Job>, sqlx::Error>;

    /// `Ok(None)` when no job matches both `id` and `owner`.
    async fn update(
        &self,
        owner: &str,
        id: &str,
        fields: JobFields,
    ) -> Result<Option<Job>, sqlx::Error>;

    /// Succeeds whether or not a matching job existed.
    async fn delete(&self, owner: &str, id: &str) -> Result<(), sqlx::Error>;
}

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn create(&self, owner: &str, fields: JobFields) -> Result<Job, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs
                (id, user_id, company, position, status, applied_date, follow_up_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(fields.company)
        .bind(fields.position)
        .bind(fields.status)
        .bind(fields.applied_date)
        .bind(fields.follow_up_date)
        .fetch_one(&self.pool)
        .await
    }

    async fn list(&self, owner: &str) -> Result<Vec<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE user_id = $1 ORDER BY created_at")
            .bind(owner)
            .fetch_all(&self.pool)
            .await
    }

    async fn update(
        &self,
        owner: &str,
        id: &str,
        fields: JobFields,
    ) -> Result<Option<Job>, sqlx::Error> {
        // $1 is bound as text; the cast makes a malformed id fail in Postgres.
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs SET
                company        = COALESCE($3, company),
                position       = COALESCE($4, position),
                status         = COALESCE($5, status),
                applied_date   = COALESCE($6, applied_date),
                follow_up_date = COALESCE($7, follow_up_date),
                updated_at     = now()
            WHERE id = $1::uuid AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(fields.company)
        .bind(fields.position)
        .bind(fields.status)
        .bind(fields.applied_date)
        .bind(fields.follow_up_date)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete(&self, owner: &str, id: &str) -> Result<(), sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1::uuid AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        debug!("Deleted {} job(s) with id {id}", result.rows_affected());
        Ok(())
    }
}
