//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! `recovery` holds the tombstone rows and the bucket snapshot embedded in
//! a project tombstone.

pub mod bucket;
pub mod project;
pub mod recovery;
pub mod task;
