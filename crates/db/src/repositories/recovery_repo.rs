//! Cross-table soft-delete / restore operations.
//!
//! Deleting a project cascades over its buckets and tasks and writes the
//! whole aggregate into the recovery log as one transaction; deleting a
//! single task writes one tombstone. Restoring consumes exactly the
//! tombstones it reconstitutes and resolves dangling bucket references
//! through the orphan policy instead of failing the restore.
//!
//! Every public method runs as a single transaction: any error rolls back
//! all writes made so far in that call.

use std::collections::HashSet;

use plank_core::orphan::resolve_bucket_ref;
use plank_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::error::{DbError, DbResult};
use crate::models::bucket::Bucket;
use crate::models::project::Project;
use crate::models::recovery::{BucketSnapshot, DeletedProject, DeletedTask, ProjectCascade};
use crate::models::task::Task;
use crate::repositories::{bucket_repo, project_repo, task_repo};

/// Column list for the `deleted_projects` table.
const DP_COLUMNS: &str = "id, name, description, status, start_date, end_date, \
    owner_id, last_modified_by, buckets, deleted_at, deleted_by, deleted_by_name";

/// Column list for the `deleted_tasks` table.
const DT_COLUMNS: &str = "id, project_id, bucket_id, title, status, priority, \
    assignee_id, position, start_date, due_date, \
    history, checklist, attachments, custom_fields, \
    created_at, updated_at, deleted_by_project, deleted_at, deleted_by, deleted_by_name";

type PgTx<'a> = sqlx::Transaction<'a, sqlx::Postgres>;

/// Provides the soft-delete / restore core for projects and tasks.
pub struct RecoveryRepo;

impl RecoveryRepo {
    // ── Delete ────────────────────────────────────────────────────────

    /// Delete a project together with all of its buckets and tasks,
    /// writing the aggregate into the recovery log.
    ///
    /// Task tombstones are written with `deleted_by_project = true`; the
    /// project tombstone embeds the ordered bucket snapshot. Live rows are
    /// removed children-first. Returns the pre-deletion aggregate so the
    /// caller can notify and audit.
    pub async fn delete_project(
        pool: &PgPool,
        project_id: DbId,
        actor_id: DbId,
        actor_name: &str,
    ) -> DbResult<ProjectCascade> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {} FROM projects WHERE id = $1",
            project_repo::COLUMNS
        );
        let project: Project = sqlx::query_as(&query)
            .bind(project_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound {
                entity: "Project",
                id: project_id,
            })?;

        let query = format!(
            "SELECT {} FROM buckets WHERE project_id = $1 ORDER BY position ASC, id ASC",
            bucket_repo::COLUMNS
        );
        let buckets: Vec<Bucket> = sqlx::query_as(&query)
            .bind(project_id)
            .fetch_all(&mut *tx)
            .await?;

        let query = format!(
            "SELECT {} FROM tasks WHERE project_id = $1 ORDER BY position ASC, id ASC",
            task_repo::COLUMNS
        );
        let tasks: Vec<Task> = sqlx::query_as(&query)
            .bind(project_id)
            .fetch_all(&mut *tx)
            .await?;

        for task in &tasks {
            Self::insert_task_tombstone(&mut tx, task, true, actor_id, actor_name).await?;
        }

        let snapshots: Vec<BucketSnapshot> = buckets.iter().map(BucketSnapshot::from).collect();
        sqlx::query(
            "INSERT INTO deleted_projects
                (id, name, description, status, start_date, end_date,
                 owner_id, last_modified_by, buckets, deleted_by, deleted_by_name)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.status)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.owner_id)
        .bind(project.last_modified_by)
        .bind(Json(&snapshots))
        .bind(actor_id)
        .bind(actor_name)
        .execute(&mut *tx)
        .await?;

        // Children before parents to respect the foreign keys.
        sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM buckets WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            project_id,
            buckets = buckets.len(),
            tasks = tasks.len(),
            "Project cascade moved to recovery log"
        );

        Ok(ProjectCascade {
            project,
            buckets,
            tasks,
        })
    }

    /// Delete a single task, writing its tombstone.
    ///
    /// `deleted_by_project` is `false` for every ad-hoc deletion; the
    /// project cascade writes its tombstones in bulk and does not go
    /// through this method. Returns the pre-deletion task.
    pub async fn delete_task(
        pool: &PgPool,
        task_id: DbId,
        actor_id: DbId,
        actor_name: &str,
        deleted_by_project: bool,
    ) -> DbResult<Task> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {} FROM tasks WHERE id = $1", task_repo::COLUMNS);
        let task: Task = sqlx::query_as(&query)
            .bind(task_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound {
                entity: "Task",
                id: task_id,
            })?;

        Self::insert_task_tombstone(&mut tx, &task, deleted_by_project, actor_id, actor_name)
            .await?;

        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(task_id, deleted_by_project, "Task moved to recovery log");

        Ok(task)
    }

    // ── Restore ───────────────────────────────────────────────────────

    /// Restore a project, its snapshotted buckets, and every task the
    /// cascade captured, consuming the tombstones.
    ///
    /// Fails with `Conflict` if a live project with the same id exists
    /// (independently recreated after the deletion, or already restored);
    /// with `NotFound` if there is no tombstone either. Task tombstones
    /// with `deleted_by_project = false` are left untouched.
    pub async fn restore_project(pool: &PgPool, project_id: DbId) -> DbResult<ProjectCascade> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {DP_COLUMNS} FROM deleted_projects WHERE id = $1");
        let tombstone: Option<DeletedProject> = sqlx::query_as(&query)
            .bind(project_id)
            .fetch_optional(&mut *tx)
            .await?;

        // Conflict wins over NotFound: a second restore of the same
        // project reports the live row, not the consumed tombstone.
        let live: Option<(DbId,)> = sqlx::query_as("SELECT id FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(&mut *tx)
            .await?;
        if live.is_some() {
            return Err(DbError::Conflict(format!(
                "project {project_id} already exists"
            )));
        }
        let tombstone = tombstone.ok_or(DbError::NotFound {
            entity: "DeletedProject",
            id: project_id,
        })?;

        let query = format!(
            "INSERT INTO projects
                (id, name, description, status, start_date, end_date,
                 owner_id, last_modified_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            project_repo::COLUMNS
        );
        let project: Project = sqlx::query_as(&query)
            .bind(tombstone.id)
            .bind(&tombstone.name)
            .bind(&tombstone.description)
            .bind(&tombstone.status)
            .bind(tombstone.start_date)
            .bind(tombstone.end_date)
            .bind(tombstone.owner_id)
            .bind(tombstone.last_modified_by)
            .fetch_one(&mut *tx)
            .await?;

        let mut buckets = Vec::with_capacity(tombstone.buckets.0.len());
        for snapshot in &tombstone.buckets.0 {
            let query = format!(
                "INSERT INTO buckets (id, project_id, title, position, custom_fields_config)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING {}",
                bucket_repo::COLUMNS
            );
            let bucket: Bucket = sqlx::query_as(&query)
                .bind(snapshot.id)
                .bind(project_id)
                .bind(&snapshot.title)
                .bind(snapshot.position)
                .bind(&snapshot.custom_fields_config)
                .fetch_one(&mut *tx)
                .await?;
            buckets.push(bucket);
        }
        let valid: HashSet<DbId> = buckets.iter().map(|b| b.id).collect();

        let query = format!(
            "SELECT {DT_COLUMNS} FROM deleted_tasks
             WHERE project_id = $1 AND deleted_by_project = TRUE
             ORDER BY position ASC, id ASC"
        );
        let tombstoned_tasks: Vec<DeletedTask> = sqlx::query_as(&query)
            .bind(project_id)
            .fetch_all(&mut *tx)
            .await?;

        let mut tasks = Vec::with_capacity(tombstoned_tasks.len());
        for dt in &tombstoned_tasks {
            let bucket_id = resolve_bucket_ref(dt.bucket_id, &valid);
            let task = Self::insert_task_row(&mut tx, dt, bucket_id).await?;
            tasks.push(task);
        }

        // Consume exactly what was restored; standalone tombstones for the
        // same project stay in the log.
        sqlx::query(
            "DELETE FROM deleted_tasks WHERE project_id = $1 AND deleted_by_project = TRUE",
        )
        .bind(project_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM deleted_projects WHERE id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            project_id,
            buckets = buckets.len(),
            tasks = tasks.len(),
            "Project cascade restored from recovery log"
        );

        Ok(ProjectCascade {
            project,
            buckets,
            tasks,
        })
    }

    /// Restore a single task from its tombstone.
    ///
    /// The parent project must exist live (restore it first otherwise).
    /// The bucket reference is resolved against the project's current live
    /// buckets; a dangling reference becomes NULL.
    pub async fn restore_task(pool: &PgPool, task_id: DbId) -> DbResult<Task> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {DT_COLUMNS} FROM deleted_tasks WHERE id = $1");
        let tombstone: DeletedTask = sqlx::query_as(&query)
            .bind(task_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound {
                entity: "DeletedTask",
                id: task_id,
            })?;

        let parent: Option<(DbId,)> = sqlx::query_as("SELECT id FROM projects WHERE id = $1")
            .bind(tombstone.project_id)
            .fetch_optional(&mut *tx)
            .await?;
        if parent.is_none() {
            return Err(DbError::NotFound {
                entity: "Project",
                id: tombstone.project_id,
            });
        }

        let rows: Vec<(DbId,)> = sqlx::query_as("SELECT id FROM buckets WHERE project_id = $1")
            .bind(tombstone.project_id)
            .fetch_all(&mut *tx)
            .await?;
        let valid: HashSet<DbId> = rows.into_iter().map(|(id,)| id).collect();
        let bucket_id = resolve_bucket_ref(tombstone.bucket_id, &valid);

        let task = Self::insert_task_row(&mut tx, &tombstone, bucket_id).await?;

        sqlx::query("DELETE FROM deleted_tasks WHERE id = $1")
            .bind(task_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(task_id, "Task restored from recovery log");

        Ok(task)
    }

    // ── Internal helpers ──────────────────────────────────────────────

    /// Write one `deleted_tasks` row within an existing transaction,
    /// copying every live column verbatim.
    async fn insert_task_tombstone(
        tx: &mut PgTx<'_>,
        task: &Task,
        deleted_by_project: bool,
        actor_id: DbId,
        actor_name: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO deleted_tasks
                (id, project_id, bucket_id, title, status, priority,
                 assignee_id, position, start_date, due_date,
                 history, checklist, attachments, custom_fields,
                 created_at, updated_at, deleted_by_project,
                 deleted_by, deleted_by_name)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                     $11, $12, $13, $14, $15, $16, $17, $18, $19)",
        )
        .bind(task.id)
        .bind(task.project_id)
        .bind(task.bucket_id)
        .bind(&task.title)
        .bind(&task.status)
        .bind(task.priority)
        .bind(task.assignee_id)
        .bind(task.position)
        .bind(task.start_date)
        .bind(task.due_date)
        .bind(&task.history)
        .bind(&task.checklist)
        .bind(&task.attachments)
        .bind(&task.custom_fields)
        .bind(task.created_at)
        .bind(task.updated_at)
        .bind(deleted_by_project)
        .bind(actor_id)
        .bind(actor_name)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Reinsert a live task row from its tombstone within an existing
    /// transaction, with an already-resolved bucket reference.
    async fn insert_task_row(
        tx: &mut PgTx<'_>,
        tombstone: &DeletedTask,
        bucket_id: Option<DbId>,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (id, project_id, bucket_id, title, status, priority,
                 assignee_id, position, start_date, due_date,
                 history, checklist, attachments, custom_fields,
                 created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                     $11, $12, $13, $14, $15, $16)
             RETURNING {}",
            task_repo::COLUMNS
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(tombstone.id)
            .bind(tombstone.project_id)
            .bind(bucket_id)
            .bind(&tombstone.title)
            .bind(&tombstone.status)
            .bind(tombstone.priority)
            .bind(tombstone.assignee_id)
            .bind(tombstone.position)
            .bind(tombstone.start_date)
            .bind(tombstone.due_date)
            .bind(&tombstone.history)
            .bind(&tombstone.checklist)
            .bind(&tombstone.attachments)
            .bind(&tombstone.custom_fields)
            .bind(tombstone.created_at)
            .bind(tombstone.updated_at)
            .fetch_one(&mut **tx)
            .await
    }
}
