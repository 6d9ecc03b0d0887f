//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. `RecoveryRepo` holds the
//! cross-table soft-delete / restore operations; everything it does runs
//! inside a single transaction per call.

pub mod bucket_repo;
pub mod project_repo;
pub mod recovery_repo;
pub mod task_repo;

pub use bucket_repo::BucketRepo;
pub use project_repo::ProjectRepo;
pub use recovery_repo::RecoveryRepo;
pub use task_repo::TaskRepo;
