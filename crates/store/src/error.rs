use thiserror::Error;

/// Result type for the persistence boundary.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures at the persistence boundary.
///
/// Deliberately separate from the domain error model: the engine never sees
/// these, only the calling layer does.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store lock poisoned")]
    LockPoisoned,
}
