//! Replays a planned scenario against fresh registries.

use cityledger_core::{
    AssetRegistry, CallContext, MaintenanceScheduler, RegistryError, SensorRegistry,
};
use serde::Serialize;
use serde_json::Value;

use crate::scenario::{Call, PlannedStep};

/// Result of one replayed step.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub op: &'static str,
    pub caller: String,
    pub height: u64,
    #[serde(flatten)]
    pub result: StepResult,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepResult {
    Ok(Value),
    Err { code: u32, message: String },
}

impl StepOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self.result, StepResult::Ok(_))
    }
}

/// The three registries a scenario runs against.
#[derive(Debug, Default)]
pub struct Runner {
    assets: AssetRegistry,
    tasks: MaintenanceScheduler,
    sensors: SensorRegistry,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute `plan` in order. With `fail_fast`, stop after the first
    /// rejected step.
    pub fn run(&mut self, plan: &[PlannedStep], fail_fast: bool) -> Vec<StepOutcome> {
        let mut outcomes = Vec::with_capacity(plan.len());

        for planned in plan {
            let op = planned.call.op();
            let result = match self.execute(&planned.ctx, &planned.call) {
                Ok(value) => {
                    tracing::debug!(step = planned.index, op, "step ok");
                    StepResult::Ok(value)
                }
                Err(e) => {
                    tracing::info!(step = planned.index, op, code = e.code(), error = %e, "step rejected");
                    StepResult::Err {
                        code: e.code(),
                        message: e.to_string(),
                    }
                }
            };
            let outcome = StepOutcome {
                step: planned.index,
                op,
                caller: planned.ctx.caller.as_str().to_owned(),
                height: planned.ctx.height,
                result,
            };
            let stop = fail_fast && !outcome.is_ok();
            outcomes.push(outcome);
            if stop {
                tracing::info!(step = planned.index, "stopping after failed step");
                break;
            }
        }

        outcomes
    }

    fn execute(&mut self, ctx: &CallContext, call: &Call) -> Result<Value, RegistryError> {
        let value = match call {
            Call::RegisterAsset {
                name,
                asset_type,
                location,
                installation_date,
            } => Value::from(self.assets.register_asset(
                ctx,
                name.as_str(),
                *asset_type,
                location.as_str(),
                *installation_date,
            )?),
            Call::UpdateAssetStatus { asset_id, status } => {
                Value::from(self.assets.update_asset_status(ctx, *asset_id, *status)?)
            }
            Call::GetAsset { asset_id } => to_json(&self.assets.get_asset(*asset_id)?),
            Call::AssetCount => Value::from(self.assets.asset_count()),
            Call::CreateTask {
                asset_id,
                description,
                priority,
                scheduled_date,
            } => Value::from(self.tasks.create_task(
                ctx,
                *asset_id,
                description.as_str(),
                *priority,
                *scheduled_date,
            )?),
            Call::AssignTask { task_id, worker } => {
                Value::from(self.tasks.assign_task(ctx, *task_id, worker.as_str())?)
            }
            Call::UpdateTaskStatus { task_id, status } => {
                Value::from(self.tasks.update_task_status(ctx, *task_id, *status)?)
            }
            Call::GetTask { task_id } => to_json(&self.tasks.get_task(*task_id)?),
            Call::RegisterSensor {
                name,
                sensor_type,
                asset_id,
                location,
            } => Value::from(self.sensors.register_sensor(
                ctx,
                name.as_str(),
                *sensor_type,
                *asset_id,
                location.as_str(),
            )?),
            Call::RecordSensorReading {
                sensor_id,
                value,
                notes,
            } => Value::from(self.sensors.record_sensor_reading(
                ctx,
                *sensor_id,
                *value,
                notes.clone(),
            )?),
            Call::GetSensor { sensor_id } => to_json(&self.sensors.get_sensor(*sensor_id)?),
            Call::GetSensorReading { reading_id } => {
                to_json(&self.sensors.get_sensor_reading(*reading_id)?)
            }
        };
        Ok(value)
    }
}

/// Render a record as JSON. `null` is reserved for a missing record; a
/// record that fails to serialize renders as the error text.
fn to_json<T: Serialize>(record: &T) -> Value {
    match serde_json::to_value(record) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "record could not be serialized");
            Value::String(format!("unserializable record: {}", e))
        }
    }
}
