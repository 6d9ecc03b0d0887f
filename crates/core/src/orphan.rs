//! Orphan policy for restored task rows.
//!
//! A task coming back out of the recovery log may reference a bucket that
//! no longer exists (or that was not part of the snapshot being restored).
//! The policy is deliberately a pure function so the dangling-reference
//! handling can be tested apart from the transaction machinery.

use std::collections::HashSet;

use crate::types::DbId;

/// Resolve a candidate bucket reference against the set of bucket ids that
/// are valid in the context of the restore.
///
/// - `None` stays `None`.
/// - An id present in `valid` is kept.
/// - Any other id is dropped to `None`, so the task itself survives the
///   restore instead of failing it.
pub fn resolve_bucket_ref(bucket_id: Option<DbId>, valid: &HashSet<DbId>) -> Option<DbId> {
    bucket_id.filter(|id| valid.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_reference_stays_null() {
        let valid: HashSet<DbId> = [1, 2, 3].into_iter().collect();
        assert_eq!(resolve_bucket_ref(None, &valid), None);
    }

    #[test]
    fn valid_reference_is_kept() {
        let valid: HashSet<DbId> = [1, 2, 3].into_iter().collect();
        assert_eq!(resolve_bucket_ref(Some(2), &valid), Some(2));
    }

    #[test]
    fn dangling_reference_becomes_null() {
        let valid: HashSet<DbId> = [1, 2, 3].into_iter().collect();
        assert_eq!(resolve_bucket_ref(Some(99), &valid), None);
    }

    #[test]
    fn empty_valid_set_drops_everything() {
        let valid = HashSet::new();
        assert_eq!(resolve_bucket_ref(Some(1), &valid), None);
        assert_eq!(resolve_bucket_ref(None, &valid), None);
    }
}
