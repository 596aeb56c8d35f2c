//! Exit codes of the `catalog-cascade` binary.

pub const SUCCESS: i32 = 0;
pub const INCONSISTENT: i32 = 1; // Subject and class disagree on grade level
pub const INTERNAL_ERROR: i32 = 2; // Bad arguments or configuration
pub const FETCH_FAILED: i32 = 3; // At least one catalog could not be loaded

/// Exit code for an error that aborted a command.
pub fn for_error(err: &anyhow::Error) -> i32 {
    let fetch_failure = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<catalog_cascade::CascadeError>())
        .any(catalog_cascade::CascadeError::is_fetch_failure);
    if fetch_failure {
        FETCH_FAILED
    } else {
        INTERNAL_ERROR
    }
}
