//! Scenario file format for `cityledger run`.
//!
//! A scenario is a list of registry calls replayed in order against empty
//! registries, each at its own ledger height.
//!
//! # Example
//!
//! ```toml
//! [ledger]
//! start_height = 1000
//! height_step = 1
//! default_caller = "city-engineer"
//!
//! [[steps]]
//! op = "register_asset"
//! name = "Main Street Bridge"
//! asset_type = 2
//! location = "Downtown"
//! installation_date = 1620000000
//!
//! [[steps]]
//! op = "assign_task"
//! caller = "planner"
//! task_id = 1
//! worker = "worker-A"
//! ```

use std::path::{Path, PathBuf};

use cityledger_core::{BlockHeight, CallContext, EntityId, Principal, Timestamp};
use serde::Deserialize;

/// Caller recorded for read-only steps that name nobody.
pub const ANONYMOUS: &str = "anonymous";

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("could not read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A mutating step has no `caller` and the ledger has no `default_caller`.
    #[error("step {step} ({op}) needs a caller: set `caller` or `ledger.default_caller`")]
    MissingCaller { step: usize, op: &'static str },
}

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// `[ledger]` section: how the simulated execution context behaves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Height of the first step.
    pub start_height: BlockHeight,
    /// Height increase between consecutive steps.
    pub height_step: u64,
    /// Caller for steps that do not set one.
    pub default_caller: Option<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            start_height: 1,
            height_step: 1,
            default_caller: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub caller: Option<String>,
    #[serde(flatten)]
    pub call: Call,
}

/// One registry entry point with its arguments. Enum codes are passed
/// through unparsed so out-of-range values reach the registries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call {
    RegisterAsset {
        name: String,
        asset_type: u64,
        location: String,
        installation_date: Timestamp,
    },
    UpdateAssetStatus {
        asset_id: EntityId,
        status: u64,
    },
    GetAsset {
        asset_id: EntityId,
    },
    AssetCount,
    CreateTask {
        asset_id: EntityId,
        description: String,
        priority: u64,
        scheduled_date: Timestamp,
    },
    AssignTask {
        task_id: EntityId,
        worker: String,
    },
    UpdateTaskStatus {
        task_id: EntityId,
        status: u64,
    },
    GetTask {
        task_id: EntityId,
    },
    RegisterSensor {
        name: String,
        sensor_type: u64,
        asset_id: EntityId,
        location: String,
    },
    RecordSensorReading {
        sensor_id: EntityId,
        value: i64,
        #[serde(default)]
        notes: Option<String>,
    },
    GetSensor {
        sensor_id: EntityId,
    },
    GetSensorReading {
        reading_id: EntityId,
    },
}

impl Call {
    pub fn op(&self) -> &'static str {
        match self {
            Call::RegisterAsset { .. } => "register_asset",
            Call::UpdateAssetStatus { .. } => "update_asset_status",
            Call::GetAsset { .. } => "get_asset",
            Call::AssetCount => "asset_count",
            Call::CreateTask { .. } => "create_task",
            Call::AssignTask { .. } => "assign_task",
            Call::UpdateTaskStatus { .. } => "update_task_status",
            Call::GetTask { .. } => "get_task",
            Call::RegisterSensor { .. } => "register_sensor",
            Call::RecordSensorReading { .. } => "record_sensor_reading",
            Call::GetSensor { .. } => "get_sensor",
            Call::GetSensorReading { .. } => "get_sensor_reading",
        }
    }

    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Call::RegisterAsset { .. }
                | Call::UpdateAssetStatus { .. }
                | Call::CreateTask { .. }
                | Call::AssignTask { .. }
                | Call::UpdateTaskStatus { .. }
                | Call::RegisterSensor { .. }
                | Call::RecordSensorReading { .. }
        )
    }
}

/// A step with its caller and height resolved.
#[derive(Debug, Clone)]
pub struct PlannedStep {
    /// 1-based position in the scenario.
    pub index: usize,
    pub ctx: CallContext,
    pub call: Call,
}

// ── Functions ─────────────────────────────────────────────────────────────────

/// Read and parse a scenario TOML file from `path`.
pub fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ScenarioError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Scenario {
    /// Resolve every step's caller and height.
    ///
    /// Fails on the first mutating step without a caller, before anything
    /// has run.
    pub fn plan(&self) -> Result<Vec<PlannedStep>, ScenarioError> {
        let mut height = self.ledger.start_height;
        let mut planned = Vec::with_capacity(self.steps.len());
        let default_caller = self.ledger.default_caller.as_deref();

        for (i, step) in self.steps.iter().enumerate() {
            let index = i + 1;
            let caller = match (step.caller.as_deref(), default_caller) {
                (Some(c), _) | (None, Some(c)) => c,
                (None, None) if !step.call.is_mutating() => ANONYMOUS,
                (None, None) => {
                    return Err(ScenarioError::MissingCaller {
                        step: index,
                        op: step.call.op(),
                    })
                }
            };
            planned.push(PlannedStep {
                index,
                ctx: CallContext::new(Principal::new(caller), height),
                call: step.call.clone(),
            });
            height = height.saturating_add(self.ledger.height_step);
        }

        Ok(planned)
    }
}
