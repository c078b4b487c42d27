//! Asset registry: roads, bridges, buildings, utilities, and parks.
//!
//! Assets are registered once and afterwards only their status changes, and
//! only at the request of the principal that registered them.

use std::fmt;

use cityledger_storage::{EntityStore, IdSequence, MemoryStore};
use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, EnumField, RegistryError};
use crate::types::{CallContext, EntityId, Principal, Timestamp};

// ──────────────────────────────────────────────
// Enumerations
// ──────────────────────────────────────────────

/// Kind of physical asset. Discriminants are the ledger codes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Road = 1,
    Bridge = 2,
    Building = 3,
    Utility = 4,
    Park = 5,
}

impl AssetType {
    pub fn from_id(id: u64) -> Option<Self> {
        match id {
            1 => Some(Self::Road),
            2 => Some(Self::Bridge),
            3 => Some(Self::Building),
            4 => Some(Self::Utility),
            5 => Some(Self::Park),
            _ => None,
        }
    }

    pub fn id(&self) -> u64 {
        *self as u64
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Road => "road",
            Self::Bridge => "bridge",
            Self::Building => "building",
            Self::Utility => "utility",
            Self::Park => "park",
        }
    }

    fn parse(id: u64) -> Result<Self, RegistryError> {
        Self::from_id(id).ok_or(RegistryError::InvalidEnum {
            field: EnumField::AssetType,
            value: id,
        })
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Operational status of an asset.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Active = 1,
    Maintenance = 2,
    Inactive = 3,
    Deprecated = 4,
}

impl AssetStatus {
    pub fn from_id(id: u64) -> Option<Self> {
        match id {
            1 => Some(Self::Active),
            2 => Some(Self::Maintenance),
            3 => Some(Self::Inactive),
            4 => Some(Self::Deprecated),
            _ => None,
        }
    }

    pub fn id(&self) -> u64 {
        *self as u64
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Maintenance => "maintenance",
            Self::Inactive => "inactive",
            Self::Deprecated => "deprecated",
        }
    }

    fn parse(id: u64) -> Result<Self, RegistryError> {
        Self::from_id(id).ok_or(RegistryError::InvalidEnum {
            field: EnumField::AssetStatus,
            value: id,
        })
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ──────────────────────────────────────────────
// Record
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub asset_type: AssetType,
    pub location: String,
    pub installation_date: Timestamp,
    /// 0 means never maintained.
    pub last_maintenance: Timestamp,
    pub status: AssetStatus,
    pub owner: Principal,
}

// ──────────────────────────────────────────────
// Registry
// ──────────────────────────────────────────────

/// Asset records plus the sequence that numbers them.
#[derive(Debug)]
pub struct AssetRegistry<S = MemoryStore<Asset>> {
    ids: IdSequence,
    store: S,
}

impl AssetRegistry {
    /// Empty registry backed by a `MemoryStore`.
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new(), IdSequence::new())
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EntityStore<Asset>> AssetRegistry<S> {
    pub fn with_store(store: S, ids: IdSequence) -> Self {
        AssetRegistry { ids, store }
    }

    /// Register a new asset owned by the caller. Returns its ID.
    pub fn register_asset(
        &mut self,
        ctx: &CallContext,
        name: impl Into<String>,
        asset_type: u64,
        location: impl Into<String>,
        installation_date: Timestamp,
    ) -> Result<EntityId, RegistryError> {
        let asset_type = AssetType::parse(asset_type)?;

        let id = self.ids.peek_next()?;
        let asset = Asset {
            name: name.into(),
            asset_type,
            location: location.into(),
            installation_date,
            last_maintenance: 0,
            status: AssetStatus::Active,
            owner: ctx.caller.clone(),
        };
        self.store.insert(id, asset)?;
        self.ids.commit(id)?;

        tracing::debug!(asset_id = id, %asset_type, owner = %ctx.caller, "asset registered");
        Ok(id)
    }

    /// Overwrite an asset's status. Only the owner may do this; any status
    /// may follow any other.
    pub fn update_asset_status(
        &mut self,
        ctx: &CallContext,
        asset_id: EntityId,
        new_status: u64,
    ) -> Result<bool, RegistryError> {
        let new_status = AssetStatus::parse(new_status)?;

        let mut asset = self
            .store
            .get(asset_id)?
            .ok_or_else(|| RegistryError::not_found(EntityKind::Asset, asset_id))?;
        if !ctx.is(&asset.owner) {
            return Err(RegistryError::not_authorized(
                EntityKind::Asset,
                asset_id,
                &ctx.caller,
            ));
        }

        let previous = asset.status;
        asset.status = new_status;
        self.store.replace(asset_id, asset)?;

        tracing::debug!(asset_id, from = %previous, to = %new_status, "asset status updated");
        Ok(true)
    }

    pub fn get_asset(&self, asset_id: EntityId) -> Result<Option<Asset>, RegistryError> {
        Ok(self.store.get(asset_id)?)
    }

    /// Number of assets ever registered, which is also the last ID issued.
    pub fn asset_count(&self) -> u64 {
        self.ids.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> CallContext {
        CallContext::new("public-works", 100)
    }

    #[test]
    fn register_returns_sequential_ids() {
        let mut reg = AssetRegistry::new();
        for (expected, ty) in (1u64..).zip(1u64..=5) {
            let id = reg
                .register_asset(&owner(), format!("Asset {ty}"), ty, "Ward 3", 1620000000)
                .unwrap();
            assert_eq!(id, expected);
        }
        assert_eq!(reg.asset_count(), 5);
    }

    #[test]
    fn register_stores_defaults() {
        let mut reg = AssetRegistry::new();
        let id = reg
            .register_asset(&owner(), "Main Street Bridge", 2, "Downtown", 1620000000)
            .unwrap();
        let asset = reg.get_asset(id).unwrap().unwrap();
        assert_eq!(asset.name, "Main Street Bridge");
        assert_eq!(asset.asset_type, AssetType::Bridge);
        assert_eq!(asset.location, "Downtown");
        assert_eq!(asset.installation_date, 1620000000);
        assert_eq!(asset.last_maintenance, 0);
        assert_eq!(asset.status, AssetStatus::Active);
        assert_eq!(asset.owner, Principal::new("public-works"));
    }

    #[test]
    fn invalid_type_leaves_counter_unchanged() {
        let mut reg = AssetRegistry::new();
        for bad in [0, 6, 10, u64::MAX] {
            let err = reg
                .register_asset(&owner(), "Invalid Asset", bad, "Nowhere", 1620000000)
                .unwrap_err();
            assert_eq!(
                err,
                RegistryError::InvalidEnum {
                    field: EnumField::AssetType,
                    value: bad
                }
            );
        }
        assert_eq!(reg.asset_count(), 0);
        assert_eq!(reg.get_asset(1).unwrap(), None);
    }

    #[test]
    fn owner_can_update_status() {
        let mut reg = AssetRegistry::new();
        let id = reg
            .register_asset(&owner(), "City Hall", 3, "Downtown", 1620000000)
            .unwrap();
        let before = reg.get_asset(id).unwrap().unwrap();

        assert!(reg.update_asset_status(&owner(), id, 2).unwrap());

        let after = reg.get_asset(id).unwrap().unwrap();
        assert_eq!(after.status, AssetStatus::Maintenance);
        assert_eq!(
            Asset {
                status: before.status,
                ..after
            },
            before
        );
    }

    #[test]
    fn status_can_move_back_from_deprecated() {
        let mut reg = AssetRegistry::new();
        let id = reg
            .register_asset(&owner(), "Elm Park", 5, "North", 1)
            .unwrap();
        reg.update_asset_status(&owner(), id, 4).unwrap();
        reg.update_asset_status(&owner(), id, 1).unwrap();
        assert_eq!(
            reg.get_asset(id).unwrap().unwrap().status,
            AssetStatus::Active
        );
    }

    #[test]
    fn update_unknown_asset_is_not_found() {
        let mut reg = AssetRegistry::new();
        let err = reg.update_asset_status(&owner(), 999, 3).unwrap_err();
        assert_eq!(err, RegistryError::not_found(EntityKind::Asset, 999));
    }

    #[test]
    fn update_by_other_principal_is_rejected() {
        let mut reg = AssetRegistry::new();
        let id = reg
            .register_asset(&owner(), "Water Main", 4, "East", 1)
            .unwrap();
        let intruder = CallContext::new("contractor", 101);
        let err = reg.update_asset_status(&intruder, id, 3).unwrap_err();
        assert_eq!(
            err,
            RegistryError::not_authorized(EntityKind::Asset, id, &intruder.caller)
        );
        assert_eq!(
            reg.get_asset(id).unwrap().unwrap().status,
            AssetStatus::Active
        );
    }

    #[test]
    fn invalid_status_checked_before_existence() {
        let mut reg = AssetRegistry::new();
        let err = reg.update_asset_status(&owner(), 999, 7).unwrap_err();
        assert_eq!(err.code(), 2);
    }

    #[test]
    fn enum_codes_round_trip() {
        for id in 1..=5 {
            assert_eq!(AssetType::from_id(id).unwrap().id(), id);
        }
        for id in 1..=4 {
            assert_eq!(AssetStatus::from_id(id).unwrap().id(), id);
        }
        assert_eq!(AssetType::from_id(6), None);
        assert_eq!(AssetStatus::from_id(0), None);
    }
}
