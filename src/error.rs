use thiserror::Error;

/// User input that could not be turned into numbers. Nothing is mutated
/// when this is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please enter valid numbers for: {}", .0.join(", "))]
    InvalidFields(Vec<String>),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Snapshot storage unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot could not be encoded: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum JournalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Action applied but not saved: {0}")]
    Store(#[from] StoreError),
}
