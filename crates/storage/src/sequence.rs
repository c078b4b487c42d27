use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::StorageError;
use crate::EntityId;

/// A monotonically increasing ID counter.
///
/// The counter starts at 0, meaning "nothing allocated yet", so the first ID
/// handed out is 1. Allocation is split in two steps so a registry can store
/// the record before the ID is consumed:
///
/// 1. `peek_next()` returns the candidate ID without advancing
/// 2. `commit(id)` advances the counter to `id`
///
/// If the write between the two steps fails, the counter is left untouched
/// and the same ID is offered again on the next call.
///
/// Cloning an `IdSequence` yields a handle to the *same* counter. Use
/// [`IdSequence::new`] for an independent one.
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    current: Arc<AtomicU64>,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a sequence whose last allocated ID is `current`.
    pub fn starting_at(current: EntityId) -> Self {
        Self {
            current: Arc::new(AtomicU64::new(current)),
        }
    }

    /// The last ID handed out, or 0 if none.
    pub fn current(&self) -> EntityId {
        self.current.load(Ordering::Acquire)
    }

    /// The ID the next `commit` must use.
    pub fn peek_next(&self) -> Result<EntityId, StorageError> {
        self.current()
            .checked_add(1)
            .ok_or(StorageError::SequenceExhausted)
    }

    /// Advance the counter to `id`, which must be exactly `current() + 1`.
    pub fn commit(&self, id: EntityId) -> Result<(), StorageError> {
        let expected = self.peek_next()?;
        if id != expected {
            return Err(StorageError::SequenceMismatch { expected, got: id });
        }
        self.current
            .compare_exchange(id - 1, id, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|actual| StorageError::SequenceMismatch {
                expected: actual.saturating_add(1),
                got: id,
            })
    }

    /// Whether `other` shares this sequence's counter.
    pub fn is_shared_with(&self, other: &IdSequence) -> bool {
        Arc::ptr_eq(&self.current, &other.current)
    }
}
