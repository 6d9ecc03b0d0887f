//! Task entity model and DTOs.

use plank_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A task row from the `tasks` table.
///
/// A task always belongs to exactly one project; its bucket reference is
/// optional and may become NULL when the bucket goes away.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Task {
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
}

/// DTO for creating a new task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub project_id: DbId,
    pub bucket_id: Option<DbId>,
    pub title: String,
    /// Defaults to `todo` if omitted.
    pub status: Option<String>,
    /// Defaults to 0 if omitted.
    pub priority: Option<i16>,
    pub assignee_id: Option<DbId>,
    /// Defaults to 0 if omitted.
    pub position: Option<i32>,
    pub start_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    pub history: Option<serde_json::Value>,
    pub checklist: Option<serde_json::Value>,
    pub attachments: Option<serde_json::Value>,
    pub custom_fields: Option<serde_json::Value>,
}

/// DTO for updating an existing task. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTask {
    pub bucket_id: Option<DbId>,
    pub title: Option<String>,
    pub status: Option<String>,
    pub priority: Option<i16>,
    pub assignee_id: Option<DbId>,
    pub position: Option<i32>,
    pub start_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    pub history: Option<serde_json::Value>,
    pub checklist: Option<serde_json::Value>,
    pub attachments: Option<serde_json::Value>,
    pub custom_fields: Option<serde_json::Value>,
}
