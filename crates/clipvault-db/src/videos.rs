use chrono::{DateTime, Utc};
use clipvault_core::models::Video;
use clipvault_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for video metadata rows.
///
/// Object bytes live in the storage backend; this repository only tracks the
/// metadata and the storage key linking the two.
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a metadata row for an already-uploaded object.
    ///
    /// `expires_at` is computed by the caller from the creation time so the
    /// retention window is exact; it is never derived again after this point.
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "insert"))]
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        owner_id: Uuid,
        original_name: &str,
        storage_key: &str,
        file_size: i64,
        content_type: &str,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<Video, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            INSERT INTO videos (
                owner_id, original_name, storage_key,
                file_size, content_type, created_at, expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(original_name)
        .bind(storage_key)
        .bind(file_size)
        .bind(content_type)
        .bind(created_at)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(video)
    }

    /// List all videos owned by an account, newest first.
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Video>, AppError> {
        let videos = sqlx::query_as::<Postgres, Video>(
            "SELECT * FROM videos WHERE owner_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(video)
    }

    /// Fetch a video only if it belongs to the given owner.
    ///
    /// Used by the delete path so ownership checks and row lookup stay in
    /// one query; a video owned by someone else is indistinguishable from a
    /// missing one.
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    pub async fn find_owned(&self, id: i64, owner_id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            "SELECT * FROM videos WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    /// Delete a row by id. Returns whether a row was actually removed, so
    /// callers can stay idempotent when two sweeps race.
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "delete"))]
    pub async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Fetch all videos whose retention window has passed.
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    pub async fn get_expired(&self, now: DateTime<Utc>) -> Result<Vec<Video>, AppError> {
        let videos = sqlx::query_as::<Postgres, Video>(
            "SELECT * FROM videos WHERE expires_at <= $1 ORDER BY expires_at",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }
}
