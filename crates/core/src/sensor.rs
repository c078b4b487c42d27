//! Sensors attached to assets, and the readings they report.
//!
//! By default sensors and readings are numbered from one shared sequence, so
//! registering a sensor after a reading skips the reading's ID and vice
//! versa. [`SensorRegistry::with_separate_sequences`] numbers them
//! independently.

use std::fmt;

use cityledger_storage::{EntityStore, IdSequence, MemoryStore};
use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, EnumField, RegistryError};
use crate::types::{BlockHeight, CallContext, EntityId, Principal};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    Temperature = 1,
    Humidity = 2,
    Traffic = 3,
    AirQuality = 4,
    Structural = 5,
    WaterLevel = 6,
}

impl SensorType {
    pub fn from_id(id: u64) -> Option<Self> {
        match id {
            1 => Some(Self::Temperature),
            2 => Some(Self::Humidity),
            3 => Some(Self::Traffic),
            4 => Some(Self::AirQuality),
            5 => Some(Self::Structural),
            6 => Some(Self::WaterLevel),
            _ => None,
        }
    }

    pub fn id(&self) -> u64 {
        *self as u64
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Traffic => "traffic",
            Self::AirQuality => "air_quality",
            Self::Structural => "structural",
            Self::WaterLevel => "water_level",
        }
    }

    fn parse(id: u64) -> Result<Self, RegistryError> {
        Self::from_id(id).ok_or(RegistryError::InvalidEnum {
            field: EnumField::SensorType,
            value: id,
        })
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    pub name: String,
    pub sensor_type: SensorType,
    /// Soft reference into the asset registry.
    pub asset_id: EntityId,
    pub location: String,
    pub owner: Principal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorReading {
    pub sensor_id: EntityId,
    /// Ledger height at which the reading was recorded.
    pub timestamp: BlockHeight,
    pub value: i64,
    pub notes: Option<String>,
}

#[derive(Debug)]
pub struct SensorRegistry<SS = MemoryStore<Sensor>, RS = MemoryStore<SensorReading>> {
    sensor_ids: IdSequence,
    reading_ids: IdSequence,
    sensors: SS,
    readings: RS,
}

impl SensorRegistry {
    /// Empty in-memory registry; sensors and readings share one sequence.
    pub fn new() -> Self {
        let ids = IdSequence::new();
        Self::with_stores(MemoryStore::new(), MemoryStore::new(), ids.clone(), ids)
    }

    /// Empty in-memory registry with one sequence per record kind.
    pub fn with_separate_sequences() -> Self {
        Self::with_stores(
            MemoryStore::new(),
            MemoryStore::new(),
            IdSequence::new(),
            IdSequence::new(),
        )
    }
}

impl Default for SensorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl<SS, RS> SensorRegistry<SS, RS>
where
    SS: EntityStore<Sensor>,
    RS: EntityStore<SensorReading>,
{
    /// Pass clones of one `IdSequence` to share numbering between sensors
    /// and readings.
    pub fn with_stores(
        sensors: SS,
        readings: RS,
        sensor_ids: IdSequence,
        reading_ids: IdSequence,
    ) -> Self {
        SensorRegistry {
            sensor_ids,
            reading_ids,
            sensors,
            readings,
        }
    }

    /// Register a sensor owned by the caller. `asset_id` is not looked up.
    pub fn register_sensor(
        &mut self,
        ctx: &CallContext,
        name: impl Into<String>,
        sensor_type: u64,
        asset_id: EntityId,
        location: impl Into<String>,
    ) -> Result<EntityId, RegistryError> {
        let sensor_type = SensorType::parse(sensor_type)?;

        let id = self.sensor_ids.peek_next()?;
        let sensor = Sensor {
            name: name.into(),
            sensor_type,
            asset_id,
            location: location.into(),
            owner: ctx.caller.clone(),
        };
        self.sensors.insert(id, sensor)?;
        self.sensor_ids.commit(id)?;

        tracing::debug!(sensor_id = id, asset_id, %sensor_type, owner = %ctx.caller, "sensor registered");
        Ok(id)
    }

    /// Append a reading for a sensor the caller owns, stamped with the
    /// current ledger height.
    pub fn record_sensor_reading(
        &mut self,
        ctx: &CallContext,
        sensor_id: EntityId,
        value: i64,
        notes: Option<String>,
    ) -> Result<EntityId, RegistryError> {
        let sensor = self
            .sensors
            .get(sensor_id)?
            .ok_or_else(|| RegistryError::not_found(EntityKind::Sensor, sensor_id))?;
        if !ctx.is(&sensor.owner) {
            return Err(RegistryError::not_authorized(
                EntityKind::Sensor,
                sensor_id,
                &ctx.caller,
            ));
        }

        let id = self.reading_ids.peek_next()?;
        let reading = SensorReading {
            sensor_id,
            timestamp: ctx.height,
            value,
            notes,
        };
        self.readings.insert(id, reading)?;
        self.reading_ids.commit(id)?;

        tracing::debug!(
            reading_id = id,
            sensor_id,
            value,
            height = ctx.height,
            "reading recorded"
        );
        Ok(id)
    }

    pub fn get_sensor(&self, sensor_id: EntityId) -> Result<Option<Sensor>, RegistryError> {
        Ok(self.sensors.get(sensor_id)?)
    }

    pub fn get_sensor_reading(
        &self,
        reading_id: EntityId,
    ) -> Result<Option<SensorReading>, RegistryError> {
        Ok(self.readings.get(reading_id)?)
    }

    /// Last ID handed to a sensor's sequence.
    pub fn last_sensor_id(&self) -> EntityId {
        self.sensor_ids.current()
    }

    /// Last ID handed to a reading's sequence. Equal to `last_sensor_id`
    /// when the sequence is shared.
    pub fn last_reading_id(&self) -> EntityId {
        self.reading_ids.current()
    }

    pub fn shares_sequence(&self) -> bool {
        self.sensor_ids.is_shared_with(&self.reading_ids)
    }
}
