//! Cross-registry scenarios run against the public API.

use cityledger_core::{
    Asset, AssetRegistry, AssetStatus, CallContext, EntityKind, EnumField, MaintenanceScheduler,
    RegistryError, SensorRegistry, TaskStatus,
};
use cityledger_storage::{EntityId, EntityStore, IdSequence, MemoryStore, StorageError};

// ──────────────────────────────────────────────
// Downtown bridge walkthrough
// ──────────────────────────────────────────────

#[test]
fn downtown_bridge_walkthrough() {
    let mut assets = AssetRegistry::new();
    let mut tasks = MaintenanceScheduler::new();
    let mut sensors = SensorRegistry::new();

    let engineer = CallContext::new("city-engineer", 1_000);

    let bridge = assets
        .register_asset(&engineer, "Main Street Bridge", 2, "Downtown", 1620000000)
        .unwrap();
    assert_eq!(bridge, 1);
    assert_eq!(
        assets.get_asset(bridge).unwrap().unwrap().status,
        AssetStatus::Active
    );

    let err = assets
        .register_asset(&engineer, "Invalid Asset", 10, "Nowhere", 1620000000)
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::InvalidEnum {
            field: EnumField::AssetType,
            value: 10
        }
    );
    assert_eq!(assets.asset_count(), 1);

    let task = tasks
        .create_task(&engineer, bridge, "Replace bearings", 3, 1620000000)
        .unwrap();
    assert_eq!(task, 1);
    assert!(tasks.assign_task(&engineer, task, "worker-A").unwrap());
    let err = tasks.assign_task(&engineer, task, "worker-A").unwrap_err();
    assert!(matches!(err, RegistryError::InvalidTransition { .. }));
    assert_eq!(err.code(), 4);

    let at = CallContext::new("city-engineer", 1_004);
    let sensor = sensors
        .register_sensor(&at, "Temp Sensor", 1, bridge, "Support")
        .unwrap();
    let reading = sensors
        .record_sensor_reading(&at, sensor, 250, Some("High traffic".to_string()))
        .unwrap();
    assert_eq!(reading, sensor + 1);
    let stored = sensors.get_sensor_reading(reading).unwrap().unwrap();
    assert_eq!(stored.timestamp, 1_004);
    assert_eq!(stored.sensor_id, sensor);
}

#[test]
fn worker_completes_assigned_task() {
    let mut tasks = MaintenanceScheduler::new();
    let planner = CallContext::new("planner", 10);
    let id = tasks
        .create_task(&planner, 1, "Clean storm drains", 2, 1620000000)
        .unwrap();
    tasks.assign_task(&planner, id, "crew-7").unwrap();

    tasks
        .update_task_status(&CallContext::new("crew-7", 11), id, 2)
        .unwrap();
    tasks
        .update_task_status(&CallContext::new("crew-7", 15), id, 3)
        .unwrap();

    let done = tasks.get_task(id).unwrap().unwrap();
    assert_eq!(done.status, TaskStatus::Completed);
    assert_eq!(done.completion_date, Some(15));
}

#[test]
fn records_serialize_with_labels() {
    let mut assets = AssetRegistry::new();
    let ctx = CallContext::new("parks-dept", 1);
    let id = assets
        .register_asset(&ctx, "Elm Park", 5, "North", 1600000000)
        .unwrap();
    let asset = assets.get_asset(id).unwrap().unwrap();

    let json = serde_json::to_value(&asset).unwrap();
    assert_eq!(json["asset_type"], "park");
    assert_eq!(json["status"], "active");
    assert_eq!(json["owner"], "parks-dept");

    let back: Asset = serde_json::from_value(json).unwrap();
    assert_eq!(back, asset);
}

// ──────────────────────────────────────────────
// Failing backend
// ──────────────────────────────────────────────

/// Wraps a `MemoryStore` and fails every write after the first `budget`.
struct FlakyStore<R> {
    inner: MemoryStore<R>,
    budget: usize,
}

impl<R: Clone + Send> EntityStore<R> for FlakyStore<R> {
    fn get(&self, id: EntityId) -> Result<Option<R>, StorageError> {
        self.inner.get(id)
    }

    fn insert(&mut self, id: EntityId, record: R) -> Result<(), StorageError> {
        if self.budget == 0 {
            return Err(StorageError::Backend("disk full".to_string()));
        }
        self.budget -= 1;
        self.inner.insert(id, record)
    }

    fn replace(&mut self, id: EntityId, record: R) -> Result<(), StorageError> {
        if self.budget == 0 {
            return Err(StorageError::Backend("disk full".to_string()));
        }
        self.budget -= 1;
        self.inner.replace(id, record)
    }

    fn len(&self) -> Result<usize, StorageError> {
        self.inner.len()
    }
}

#[test]
fn failed_write_does_not_consume_an_id() {
    let store = FlakyStore {
        inner: MemoryStore::new(),
        budget: 1,
    };
    let mut assets = AssetRegistry::with_store(store, IdSequence::new());
    let ctx = CallContext::new("public-works", 1);

    assert_eq!(
        assets
            .register_asset(&ctx, "Oak Road", 1, "West", 1)
            .unwrap(),
        1
    );

    let err = assets
        .register_asset(&ctx, "Pine Road", 1, "West", 1)
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::Storage(StorageError::Backend("disk full".to_string()))
    );
    assert_eq!(err.code(), 500);
    assert_eq!(assets.asset_count(), 1);
    assert_eq!(assets.get_asset(2).unwrap(), None);

    let err = assets.update_asset_status(&ctx, 1, 3).unwrap_err();
    assert_eq!(err.code(), 500);
    assert_eq!(
        assets.get_asset(1).unwrap().unwrap().status,
        AssetStatus::Active
    );
}

#[test]
fn shared_sequence_can_span_registries() {
    // Two sensor registries fed from one sequence never hand out the same ID.
    let ids = IdSequence::new();
    let mut north = SensorRegistry::with_stores(
        MemoryStore::new(),
        MemoryStore::new(),
        ids.clone(),
        ids.clone(),
    );
    let mut south =
        SensorRegistry::with_stores(MemoryStore::new(), MemoryStore::new(), ids.clone(), ids);
    let ctx = CallContext::new("ops", 1);
    let a = north.register_sensor(&ctx, "N1", 1, 1, "North").unwrap();
    let b = south.register_sensor(&ctx, "S1", 1, 2, "South").unwrap();
    assert_eq!((a, b), (1, 2));

    let err = north.record_sensor_reading(&ctx, b, 1, None).unwrap_err();
    assert_eq!(
        err,
        RegistryError::NotFound {
            kind: EntityKind::Sensor,
            id: 2
        }
    );
}
