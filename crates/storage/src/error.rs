use crate::EntityId;

/// All errors that can be returned by an `EntityStore` implementation or an
/// `IdSequence`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// No record is stored under the given ID.
    #[error("record not found: {id}")]
    NotFound { id: EntityId },

    /// A record is already stored under the given ID. Stores are append-only,
    /// so an ID can be inserted at most once.
    #[error("record already exists: {id}")]
    AlreadyExists { id: EntityId },

    /// The sequence reached `u64::MAX` and cannot hand out another ID.
    #[error("id sequence exhausted")]
    SequenceExhausted,

    /// `IdSequence::commit` was called with an ID other than the next one.
    /// Usually means two writers raced on the same sequence.
    #[error("id sequence mismatch: expected {expected}, got {got}")]
    SequenceMismatch { expected: EntityId, got: EntityId },

    /// A backend-specific storage error (connection, serialization, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
