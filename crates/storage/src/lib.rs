//! cityledger-storage: persistence seam for cityledger registries.
//!
//! A registry is an [`IdSequence`] paired with an [`EntityStore`]. The
//! sequence hands out IDs; the store keeps the records. [`MemoryStore`] is
//! the in-process backend; other backends can check themselves against the
//! [`conformance`] suite.

/// Identifier of a stored record. 0 is never assigned.
pub type EntityId = u64;

pub mod conformance;
mod error;
mod memory;
mod sequence;
mod traits;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use sequence::IdSequence;
pub use traits::EntityStore;
