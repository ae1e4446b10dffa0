use tourwise_core::error::CoreError;

/// Error type for repository methods that enforce business rules inside a
/// transaction (the check-then-write paths).
///
/// Plain lookup and list methods keep returning `sqlx::Error` directly;
/// this type exists for the manager methods where a domain failure and a
/// storage failure can both occur.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A business-rule failure, recoverable by the caller.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// A storage-layer failure; callers should treat it as transient.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Convenience alias for manager method return values.
pub type RepoResult<T> = Result<T, RepoError>;
