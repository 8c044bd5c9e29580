use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
