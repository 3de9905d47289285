//! Project store abstraction.

mod memory;

pub use memory::MemoryProjectStore;

use crate::project::ProjectRecord;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use uuid::Uuid;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Project not found: {0}")]
    NotFound(Uuid),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for store operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for project storage backends.
///
/// Records are stored whole; the store never looks inside `plannerData`.
pub trait ProjectStore: Send + Sync {
    /// Insert or replace a record. Returns the stored copy, whose `updatedAt`
    /// is set to the time of the save.
    fn save(&self, record: &ProjectRecord) -> BoxFuture<'_, StorageResult<ProjectRecord>>;

    /// Load a record.
    fn load(&self, id: Uuid) -> BoxFuture<'_, StorageResult<ProjectRecord>>;

    /// Delete a record.
    fn delete(&self, id: Uuid) -> BoxFuture<'_, StorageResult<()>>;

    /// All records, most recently updated first.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<ProjectRecord>>>;

    /// Check if a record exists.
    fn exists(&self, id: Uuid) -> BoxFuture<'_, StorageResult<bool>>;
}
