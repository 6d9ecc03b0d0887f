//! Repository for the `tasks` table.

use plank_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, UpdateTask};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, project_id, bucket_id, title, status, priority, \
    assignee_id, position, start_date, due_date, \
    history, checklist, attachments, custom_fields, \
    created_at, updated_at";

/// Provides CRUD operations for tasks.
///
/// Removing a single task goes through
/// [`RecoveryRepo::delete_task`](crate::repositories::RecoveryRepo::delete_task)
/// so the tombstone is written; there is no bare row delete here.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    ///
    /// `status` defaults to `todo`, `priority` and `position` to 0.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (project_id, bucket_id, title, status, priority, assignee_id,
                 position, start_date, due_date, history, checklist,
                 attachments, custom_fields)
             VALUES ($1, $2, $3, COALESCE($4, 'todo'), COALESCE($5, 0), $6,
                     COALESCE($7, 0), $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.project_id)
            .bind(input.bucket_id)
            .bind(&input.title)
            .bind(&input.status)
            .bind(input.priority)
            .bind(input.assignee_id)
            .bind(input.position)
            .bind(input.start_date)
            .bind(input.due_date)
            .bind(&input.history)
            .bind(&input.checklist)
            .bind(&input.attachments)
            .bind(&input.custom_fields)
            .fetch_one(pool)
            .await
    }

    /// Find a task by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all tasks of a project, ordered by `position`.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE project_id = $1
             ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List all tasks of a bucket, ordered by `position`.
    pub async fn list_by_bucket(pool: &PgPool, bucket_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE bucket_id = $1
             ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(bucket_id)
            .fetch_all(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists. Clearing a
    /// task's bucket is done by deleting the bucket (ON DELETE SET NULL),
    /// not through this patch.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                bucket_id = COALESCE($2, bucket_id),
                title = COALESCE($3, title),
                status = COALESCE($4, status),
                priority = COALESCE($5, priority),
                assignee_id = COALESCE($6, assignee_id),
                position = COALESCE($7, position),
                start_date = COALESCE($8, start_date),
                due_date = COALESCE($9, due_date),
                history = COALESCE($10, history),
                checklist = COALESCE($11, checklist),
                attachments = COALESCE($12, attachments),
                custom_fields = COALESCE($13, custom_fields),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(input.bucket_id)
            .bind(&input.title)
            .bind(&input.status)
            .bind(input.priority)
            .bind(input.assignee_id)
            .bind(input.position)
            .bind(input.start_date)
            .bind(input.due_date)
            .bind(&input.history)
            .bind(&input.checklist)
            .bind(&input.attachments)
            .bind(&input.custom_fields)
            .fetch_optional(pool)
            .await
    }
}
