//! Repository for the `buckets` table.

use plank_core::types::DbId;
use sqlx::PgPool;

use crate::models::bucket::{Bucket, CreateBucket, UpdateBucket};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "id, project_id, title, position, custom_fields_config, created_at, updated_at";

/// Provides CRUD operations for buckets.
pub struct BucketRepo;

impl BucketRepo {
    /// Insert a new bucket, returning the created row.
    ///
    /// If `position` is `None` in the input, defaults to 0.
    pub async fn create(pool: &PgPool, input: &CreateBucket) -> Result<Bucket, sqlx::Error> {
        let query = format!(
            "INSERT INTO buckets (project_id, title, position, custom_fields_config)
             VALUES ($1, $2, COALESCE($3, 0), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bucket>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(input.position)
            .bind(&input.custom_fields_config)
            .fetch_one(pool)
            .await
    }

    /// Find a bucket by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Bucket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM buckets WHERE id = $1");
        sqlx::query_as::<_, Bucket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all buckets of a project, ordered by `position`.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Bucket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM buckets
             WHERE project_id = $1
             ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, Bucket>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a bucket. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBucket,
    ) -> Result<Option<Bucket>, sqlx::Error> {
        let query = format!(
            "UPDATE buckets SET
                title = COALESCE($2, title),
                position = COALESCE($3, position),
                custom_fields_config = COALESCE($4, custom_fields_config),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bucket>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.position)
            .bind(&input.custom_fields_config)
            .fetch_optional(pool)
            .await
    }

    /// Delete a bucket by ID. Returns `true` if a row was removed.
    ///
    /// Tasks referencing the bucket keep their row and get
    /// `bucket_id = NULL` through the foreign key's ON DELETE SET NULL.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM buckets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
