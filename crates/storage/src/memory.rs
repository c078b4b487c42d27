use std::collections::BTreeMap;

use crate::error::StorageError;
use crate::traits::EntityStore;
use crate::EntityId;

/// `BTreeMap`-backed `EntityStore`.
#[derive(Debug, Clone)]
pub struct MemoryStore<R> {
    records: BTreeMap<EntityId, R>,
}

impl<R> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> EntityStore<R> for MemoryStore<R>
where
    R: Clone + Send,
{
    fn get(&self, id: EntityId) -> Result<Option<R>, StorageError> {
        Ok(self.records.get(&id).cloned())
    }

    fn insert(&mut self, id: EntityId, record: R) -> Result<(), StorageError> {
        if self.records.contains_key(&id) {
            return Err(StorageError::AlreadyExists { id });
        }
        self.records.insert(id, record);
        tracing::trace!(id, "memory store insert");
        Ok(())
    }

    fn replace(&mut self, id: EntityId, record: R) -> Result<(), StorageError> {
        match self.records.get_mut(&id) {
            Some(slot) => {
                *slot = record;
                tracing::trace!(id, "memory store replace");
                Ok(())
            }
            None => Err(StorageError::NotFound { id }),
        }
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.records.len())
    }
}
