//! Tombstone models for the recovery log.
//!
//! Presence of an identity here and in the live tables are mutually
//! exclusive: deleting moves a row into its tombstone, restoring consumes
//! the tombstone and reinserts the live row.

use plank_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::bucket::Bucket;
use crate::models::project::Project;
use crate::models::task::Task;

/// Snapshot of a bucket embedded in a project tombstone.
///
/// Buckets have no tombstone table of their own; the full ordered set of a
/// project's buckets is captured by value at deletion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSnapshot {
    pub id: DbId,
    pub title: String,
    pub position: i32,
    pub custom_fields_config: Option<serde_json::Value>,
}

impl From<&Bucket> for BucketSnapshot {
    fn from(bucket: &Bucket) -> Self {
        BucketSnapshot {
            id: bucket.id,
            title: bucket.title.clone(),
            position: bucket.position,
            custom_fields_config: bucket.custom_fields_config.clone(),
        }
    }
}

/// A row from the `deleted_projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeletedProject {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub owner_id: Option<DbId>,
    pub last_modified_by: Option<DbId>,
    /// Ordered bucket snapshots captured at deletion time.
    pub buckets: Json<Vec<BucketSnapshot>>,
    pub deleted_at: Timestamp,
    pub deleted_by: DbId,
    pub deleted_by_name: String,
}

/// A row from the `deleted_tasks` table.
///
/// `deleted_by_project` is `true` when the tombstone was written by a
/// project cascade, `false` for a standalone task deletion. Project restore
/// only ever consumes the `true` population.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeletedTask {
    pub id: DbId,
    pub project_id: DbId,
    pub bucket_id: Option<DbId>,
    pub title: String,
    pub status: String,
    pub priority: i16,
    pub assignee_id: Option<DbId>,
    pub position: i32,
    pub start_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    pub history: Option<serde_json::Value>,
    pub checklist: Option<serde_json::Value>,
    pub attachments: Option<serde_json::Value>,
    pub custom_fields: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_by_project: bool,
    pub deleted_at: Timestamp,
    pub deleted_by: DbId,
    pub deleted_by_name: String,
}

/// Aggregate returned by the cascade delete and project restore operations:
/// the project together with its buckets and tasks, in `position` order.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectCascade {
    pub project: Project,
    pub buckets: Vec<Bucket>,
    pub tasks: Vec<Task>,
}
