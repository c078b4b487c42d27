use std::fmt;

use serde::{Deserialize, Serialize};

pub use cityledger_storage::EntityId;

/// Ledger height supplied by the execution context. Used as a timestamp
/// surrogate for completion dates and readings.
pub type BlockHeight = u64;

/// Caller-supplied timestamp (installation and scheduled dates). Stored as
/// given; the registries never interpret it.
pub type Timestamp = u64;

/// Identity of whoever issued a call. Compared by plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Principal(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Principal::new(s)
    }
}

impl From<String> for Principal {
    fn from(s: String) -> Self {
        Principal(s)
    }
}

/// The ambient facts a mutating call runs under: who is calling and at
/// which ledger height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Principal,
    pub height: BlockHeight,
}

impl CallContext {
    pub fn new(caller: impl Into<Principal>, height: BlockHeight) -> Self {
        CallContext {
            caller: caller.into(),
            height,
        }
    }

    pub fn is(&self, principal: &Principal) -> bool {
        &self.caller == principal
    }
}
