use crate::error::StorageError;
use crate::EntityId;

/// The storage trait for registry backends.
///
/// An `EntityStore` holds one kind of record keyed by `EntityId`. Stores are
/// append-only: records are inserted once and afterwards only replaced in
/// place, never removed.
///
/// ## Atomicity
///
/// Each method either applies fully or returns an error without changing the
/// store. Registries rely on this to keep failed calls side-effect free.
///
/// ## Ownership of records
///
/// `get` returns an owned copy. Backends that serialize records (a database,
/// a file) cannot hand out references into their storage, so the trait does
/// not ask for them either.
pub trait EntityStore<R>: Send {
    /// Read a record without modifying it.
    ///
    /// Returns `Ok(None)` if no record is stored under `id`.
    fn get(&self, id: EntityId) -> Result<Option<R>, StorageError>;

    /// Store a new record under `id`.
    ///
    /// Returns `Err(StorageError::AlreadyExists)` if `id` is taken.
    fn insert(&mut self, id: EntityId, record: R) -> Result<(), StorageError>;

    /// Overwrite the record stored under `id`.
    ///
    /// Returns `Err(StorageError::NotFound)` if `id` was never inserted.
    fn replace(&mut self, id: EntityId, record: R) -> Result<(), StorageError>;

    /// Number of stored records.
    fn len(&self) -> Result<usize, StorageError>;

    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}
