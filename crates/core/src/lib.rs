//! cityledger-core: municipal infrastructure registries.
//!
//! Three independent registries, each an ID sequence plus an append-only
//! record store:
//!
//! - [`AssetRegistry`] -- roads, bridges, buildings, utilities, parks
//! - [`MaintenanceScheduler`] -- maintenance tasks against assets
//! - [`SensorRegistry`] -- sensors on assets and the readings they report
//!
//! Registries never call each other. Cross-registry fields (`asset_id`,
//! `sensor_id`) are plain IDs and are not checked on write.
//!
//! Every mutating call takes a [`CallContext`] carrying the caller and the
//! current ledger height, and either applies fully or returns a
//! [`RegistryError`] without touching state.

pub mod asset;
pub mod error;
pub mod maintenance;
pub mod sensor;
pub mod types;

// ── Convenience re-exports ───────────────────────────────────────────

pub use asset::{Asset, AssetRegistry, AssetStatus, AssetType};
pub use error::{EntityKind, EnumField, RegistryError};
pub use maintenance::{MaintenanceScheduler, MaintenanceTask, TaskPriority, TaskStatus};
pub use sensor::{Sensor, SensorReading, SensorRegistry, SensorType};
pub use types::{BlockHeight, CallContext, EntityId, Principal, Timestamp};
