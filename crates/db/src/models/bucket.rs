//! Bucket entity model and DTOs.

use plank_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A bucket row from the `buckets` table.
///
/// Buckets always belong to exactly one project and are ordered within it
/// by `position`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Bucket {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub position: i32,
    pub custom_fields_config: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBucket {
    pub project_id: DbId,
    pub title: String,
    /// Defaults to 0 if omitted.
    pub position: Option<i32>,
    pub custom_fields_config: Option<serde_json::Value>,
}

/// DTO for updating an existing bucket. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBucket {
    pub title: Option<String>,
    pub position: Option<i32>,
    pub custom_fields_config: Option<serde_json::Value>,
}
