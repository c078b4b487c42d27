use std::fmt;

use cityledger_storage::StorageError;

use crate::types::{EntityId, Principal};

/// Which enumerated input was out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumField {
    AssetType,
    AssetStatus,
    TaskPriority,
    TaskStatus,
    SensorType,
}

impl EnumField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AssetType => "asset type",
            Self::AssetStatus => "asset status",
            Self::TaskPriority => "task priority",
            Self::TaskStatus => "task status",
            Self::SensorType => "sensor type",
        }
    }
}

impl fmt::Display for EnumField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Asset,
    Task,
    Sensor,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Task => "task",
            Self::Sensor => "sensor",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors returned by registry operations. A call that returns an error has
/// not changed any registry state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A type, status, or priority code outside its recognized set.
    #[error("invalid {field}: {value}")]
    InvalidEnum { field: EnumField, value: u64 },

    /// The referenced ID is not present in the owning registry.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: EntityId },

    /// The caller is not the owner, creator, or assignee the operation needs.
    #[error("'{caller}' is not authorized to modify {kind} {id}")]
    NotAuthorized {
        kind: EntityKind,
        id: EntityId,
        caller: Principal,
    },

    /// The record's current status does not allow the operation.
    #[error("{kind} {id} is {current}, operation requires {required}")]
    InvalidTransition {
        kind: EntityKind,
        id: EntityId,
        current: &'static str,
        required: &'static str,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl RegistryError {
    /// Numeric error code as exposed at the ledger boundary.
    ///
    /// Type and priority codes share 1, status codes use 2.
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidEnum { field, .. } => match field {
                EnumField::AssetStatus | EnumField::TaskStatus => 2,
                EnumField::AssetType | EnumField::TaskPriority | EnumField::SensorType => 1,
            },
            Self::NotAuthorized { .. } => 3,
            Self::InvalidTransition { .. } => 4,
            Self::NotFound { .. } => 404,
            Self::Storage(_) => 500,
        }
    }

    pub(crate) fn not_found(kind: EntityKind, id: EntityId) -> Self {
        Self::NotFound { kind, id }
    }

    pub(crate) fn not_authorized(kind: EntityKind, id: EntityId, caller: &Principal) -> Self {
        Self::NotAuthorized {
            kind,
            id,
            caller: caller.clone(),
        }
    }
}
