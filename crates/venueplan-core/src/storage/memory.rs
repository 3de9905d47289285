//! In-memory project store.

use super::{BoxFuture, ProjectStore, StorageError, StorageResult};
use crate::project::ProjectRecord;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

struct Entry {
    /// Store-wide save counter; orders saves that share a timestamp.
    revision: u64,
    record: ProjectRecord,
}

#[derive(Default)]
struct Inner {
    records: HashMap<Uuid, Entry>,
    revision: u64,
}

/// In-memory store for the REST service, tests and ephemeral use.
#[derive(Default)]
pub struct MemoryProjectStore {
    inner: RwLock<Inner>,
}

impl MemoryProjectStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl ProjectStore for MemoryProjectStore {
    fn save(&self, record: &ProjectRecord) -> BoxFuture<'_, StorageResult<ProjectRecord>> {
        let mut record = record.clone();
        Box::pin(async move {
            let mut inner = self.inner.write().map_err(lock_error)?;
            record.touch();
            inner.revision += 1;
            let revision = inner.revision;
            inner.records.insert(
                record.id,
                Entry {
                    revision,
                    record: record.clone(),
                },
            );
            log::debug!("Stored project {} (revision {})", record.id, revision);
            Ok(record)
        })
    }

    fn load(&self, id: Uuid) -> BoxFuture<'_, StorageResult<ProjectRecord>> {
        Box::pin(async move {
            let inner = self.inner.read().map_err(lock_error)?;
            inner
                .records
                .get(&id)
                .map(|entry| entry.record.clone())
                .ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: Uuid) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.write().map_err(lock_error)?;
            inner.records.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<ProjectRecord>>> {
        Box::pin(async move {
            let inner = self.inner.read().map_err(lock_error)?;
            let mut entries: Vec<&Entry> = inner.records.values().collect();
            entries.sort_by(|a, b| {
                b.record
                    .updated_at
                    .cmp(&a.record.updated_at)
                    .then(b.revision.cmp(&a.revision))
            });
            Ok(entries.into_iter().map(|e| e.record.clone()).collect())
        })
    }

    fn exists(&self, id: Uuid) -> BoxFuture<'_, StorageResult<bool>> {
        Box::pin(async move {
            let inner = self.inner.read().map_err(lock_error)?;
            Ok(inner.records.contains_key(&id))
        })
    }
}
