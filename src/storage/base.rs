use crate::meeting::Meeting;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage operation failed: {0}")]
    OperationError(String),
    #[error("Serialization failed: {0}")]
    SerializationError(String),
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::OperationError(error.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::SerializationError(error.to_string())
    }
}

/// Downstream hand-off for finalized meetings, one record at a time.
#[async_trait]
pub trait MeetingSink: Send + Sync {
    async fn store(&self, spider: &str, meeting: &Meeting) -> Result<(), StorageError>;
}
