//! Integration tests for the live-row CRUD repositories.
//!
//! Exercises the repository layer against a real database:
//! - Create full hierarchy (project -> buckets -> tasks)
//! - Ordering by `position` in list queries
//! - COALESCE patch semantics on update
//! - Foreign key behaviour (bad parent, bucket removal sets NULL)

use plank_db::models::bucket::{CreateBucket, UpdateBucket};
use plank_db::models::project::{CreateProject, UpdateProject};
use plank_db::models::task::{CreateTask, UpdateTask};
use plank_db::repositories::{BucketRepo, ProjectRepo, TaskRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: Some("crud test".to_string()),
        status: None,
        start_date: None,
        end_date: None,
        owner_id: Some(7),
    }
}

fn new_bucket(project_id: i64, title: &str, position: i32) -> CreateBucket {
    CreateBucket {
        project_id,
        title: title.to_string(),
        position: Some(position),
        custom_fields_config: None,
    }
}

fn new_task(project_id: i64, bucket_id: Option<i64>, title: &str, position: i32) -> CreateTask {
    CreateTask {
        project_id,
        bucket_id,
        title: title.to_string(),
        status: None,
        priority: None,
        assignee_id: None,
        position: Some(position),
        start_date: None,
        due_date: None,
        history: None,
        checklist: None,
        attachments: None,
        custom_fields: None,
    }
}

// ---------------------------------------------------------------------------
// Test: full hierarchy create and find
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_full_hierarchy(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Hierarchy"))
        .await
        .unwrap();
    assert_eq!(project.status, "active", "status should default to active");

    let bucket = BucketRepo::create(&pool, &new_bucket(project.id, "Backlog", 0))
        .await
        .unwrap();
    let task = TaskRepo::create(&pool, &new_task(project.id, Some(bucket.id), "First", 0))
        .await
        .unwrap();
    assert_eq!(task.status, "todo", "status should default to todo");
    assert_eq!(task.priority, 0);

    let found = TaskRepo::find_by_id(&pool, task.id).await.unwrap().unwrap();
    assert_eq!(found.bucket_id, Some(bucket.id));
    assert_eq!(found.project_id, project.id);
}

// ---------------------------------------------------------------------------
// Test: list queries order by position
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lists_order_by_position(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Ordered"))
        .await
        .unwrap();

    // Insert out of order; listing must come back sorted by position.
    BucketRepo::create(&pool, &new_bucket(project.id, "Third", 2))
        .await
        .unwrap();
    BucketRepo::create(&pool, &new_bucket(project.id, "First", 0))
        .await
        .unwrap();
    BucketRepo::create(&pool, &new_bucket(project.id, "Second", 1))
        .await
        .unwrap();

    let buckets = BucketRepo::list_by_project(&pool, project.id).await.unwrap();
    let titles: Vec<&str> = buckets.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["First", "Second", "Third"]);

    TaskRepo::create(&pool, &new_task(project.id, None, "B", 1))
        .await
        .unwrap();
    TaskRepo::create(&pool, &new_task(project.id, None, "A", 0))
        .await
        .unwrap();

    let tasks = TaskRepo::list_by_project(&pool, project.id).await.unwrap();
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["A", "B"]);
}

// ---------------------------------------------------------------------------
// Test: update applies only non-None fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_patch_semantics(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Patch Me"))
        .await
        .unwrap();

    let patch = UpdateProject {
        name: Some("Patched".to_string()),
        description: None,
        status: Some("paused".to_string()),
        start_date: None,
        end_date: None,
        owner_id: None,
    };
    let updated = ProjectRepo::update(&pool, project.id, &patch, 42)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "Patched");
    assert_eq!(updated.status, "paused");
    assert_eq!(
        updated.description,
        Some("crud test".to_string()),
        "untouched fields keep their value"
    );
    assert_eq!(updated.last_modified_by, Some(42));

    // Update on a missing id returns None.
    let missing = ProjectRepo::update(&pool, 999_999, &patch, 42).await.unwrap();
    assert!(missing.is_none());
}

// ---------------------------------------------------------------------------
// Test: task update moves between buckets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_update_moves_bucket(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Mover"))
        .await
        .unwrap();
    let from = BucketRepo::create(&pool, &new_bucket(project.id, "From", 0))
        .await
        .unwrap();
    let to = BucketRepo::create(&pool, &new_bucket(project.id, "To", 1))
        .await
        .unwrap();
    let task = TaskRepo::create(&pool, &new_task(project.id, Some(from.id), "Move", 0))
        .await
        .unwrap();

    let patch = UpdateTask {
        bucket_id: Some(to.id),
        title: None,
        status: None,
        priority: None,
        assignee_id: None,
        position: None,
        start_date: None,
        due_date: None,
        history: None,
        checklist: None,
        attachments: None,
        custom_fields: None,
    };
    let moved = TaskRepo::update(&pool, task.id, &patch).await.unwrap().unwrap();
    assert_eq!(moved.bucket_id, Some(to.id));

    let in_to = TaskRepo::list_by_bucket(&pool, to.id).await.unwrap();
    assert_eq!(in_to.len(), 1);
    let in_from = TaskRepo::list_by_bucket(&pool, from.id).await.unwrap();
    assert!(in_from.is_empty());
}

// ---------------------------------------------------------------------------
// Test: deleting a bucket nulls task references
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bucket_delete_nulls_task_reference(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Null Ref"))
        .await
        .unwrap();
    let bucket = BucketRepo::create(&pool, &new_bucket(project.id, "Doomed", 0))
        .await
        .unwrap();
    let task = TaskRepo::create(&pool, &new_task(project.id, Some(bucket.id), "Orphan", 0))
        .await
        .unwrap();

    let removed = BucketRepo::delete(&pool, bucket.id).await.unwrap();
    assert!(removed);

    let task = TaskRepo::find_by_id(&pool, task.id).await.unwrap().unwrap();
    assert_eq!(task.bucket_id, None, "task should survive with NULL bucket");
}

// ---------------------------------------------------------------------------
// Test: bucket update patches title and position
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bucket_update(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Bucket Patch"))
        .await
        .unwrap();
    let bucket = BucketRepo::create(&pool, &new_bucket(project.id, "Old", 0))
        .await
        .unwrap();

    let patch = UpdateBucket {
        title: Some("New".to_string()),
        position: Some(3),
        custom_fields_config: None,
    };
    let updated = BucketRepo::update(&pool, bucket.id, &patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "New");
    assert_eq!(updated.position, 3);
}

// ---------------------------------------------------------------------------
// Test: foreign key violation on bad parent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_create_rejects_missing_project(pool: PgPool) {
    let result = TaskRepo::create(&pool, &new_task(999_999, None, "Nope", 0)).await;
    assert!(result.is_err(), "insert with missing project should fail");
}
