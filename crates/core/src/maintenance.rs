//! Maintenance scheduler.
//!
//! Tasks point at assets by ID only; the scheduler never checks that the
//! asset exists. The creator may assign a task once, while it is still
//! `Scheduled`; the creator or the assignee may then set its status.
//!
//! The intended lifecycle is
//!
//! ```text
//! Scheduled ──► InProgress ──► Completed
//!     │              └───────► Cancelled
//!     ├──► Completed
//!     └──► Cancelled
//! ```
//!
//! but `update_task_status` does not enforce it: an authorized caller may
//! set any status at any time. Only `assign_task` looks at the current
//! status.

use std::fmt;

use cityledger_storage::{EntityStore, IdSequence, MemoryStore};
use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, EnumField, RegistryError};
use crate::types::{BlockHeight, CallContext, EntityId, Principal, Timestamp};

// ──────────────────────────────────────────────
// Enumerations
// ──────────────────────────────────────────────

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low = 1,
    Medium = 2,
    High = 3,
    Emergency = 4,
}

impl TaskPriority {
    pub fn from_id(id: u64) -> Option<Self> {
        match id {
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            4 => Some(Self::Emergency),
            _ => None,
        }
    }

    pub fn id(&self) -> u64 {
        *self as u64
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Emergency => "emergency",
        }
    }

    fn parse(id: u64) -> Result<Self, RegistryError> {
        Self::from_id(id).ok_or(RegistryError::InvalidEnum {
            field: EnumField::TaskPriority,
            value: id,
        })
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Scheduled = 1,
    InProgress = 2,
    Completed = 3,
    Cancelled = 4,
}

impl TaskStatus {
    pub fn from_id(id: u64) -> Option<Self> {
        match id {
            1 => Some(Self::Scheduled),
            2 => Some(Self::InProgress),
            3 => Some(Self::Completed),
            4 => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn id(&self) -> u64 {
        *self as u64
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    fn parse(id: u64) -> Result<Self, RegistryError> {
        Self::from_id(id).ok_or(RegistryError::InvalidEnum {
            field: EnumField::TaskStatus,
            value: id,
        })
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ──────────────────────────────────────────────
// Record
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceTask {
    /// Soft reference into the asset registry.
    pub asset_id: EntityId,
    pub description: String,
    pub priority: TaskPriority,
    pub scheduled_date: Timestamp,
    /// Ledger height of the most recent move to `Completed`. Never cleared.
    pub completion_date: Option<BlockHeight>,
    pub status: TaskStatus,
    pub assigned_to: Option<Principal>,
    pub created_by: Principal,
}

// ──────────────────────────────────────────────
// Scheduler
// ──────────────────────────────────────────────

#[derive(Debug)]
pub struct MaintenanceScheduler<S = MemoryStore<MaintenanceTask>> {
    ids: IdSequence,
    store: S,
}

impl MaintenanceScheduler {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new(), IdSequence::new())
    }
}

impl Default for MaintenanceScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EntityStore<MaintenanceTask>> MaintenanceScheduler<S> {
    pub fn with_store(store: S, ids: IdSequence) -> Self {
        MaintenanceScheduler { ids, store }
    }

    /// Schedule a task against `asset_id`. The asset is not looked up.
    pub fn create_task(
        &mut self,
        ctx: &CallContext,
        asset_id: EntityId,
        description: impl Into<String>,
        priority: u64,
        scheduled_date: Timestamp,
    ) -> Result<EntityId, RegistryError> {
        let priority = TaskPriority::parse(priority)?;

        let id = self.ids.peek_next()?;
        let task = MaintenanceTask {
            asset_id,
            description: description.into(),
            priority,
            scheduled_date,
            completion_date: None,
            status: TaskStatus::Scheduled,
            assigned_to: None,
            created_by: ctx.caller.clone(),
        };
        self.store.insert(id, task)?;
        self.ids.commit(id)?;

        tracing::debug!(task_id = id, asset_id, %priority, created_by = %ctx.caller, "task created");
        Ok(id)
    }

    /// Hand a scheduled, unassigned task to `worker`. Status is unchanged.
    pub fn assign_task(
        &mut self,
        ctx: &CallContext,
        task_id: EntityId,
        worker: impl Into<Principal>,
    ) -> Result<bool, RegistryError> {
        let mut task = self.load(task_id)?;
        if !ctx.is(&task.created_by) {
            return Err(RegistryError::not_authorized(
                EntityKind::Task,
                task_id,
                &ctx.caller,
            ));
        }
        if task.status != TaskStatus::Scheduled {
            return Err(RegistryError::InvalidTransition {
                kind: EntityKind::Task,
                id: task_id,
                current: task.status.label(),
                required: TaskStatus::Scheduled.label(),
            });
        }
        if task.assigned_to.is_some() {
            return Err(RegistryError::InvalidTransition {
                kind: EntityKind::Task,
                id: task_id,
                current: "assigned",
                required: "unassigned",
            });
        }

        let worker = worker.into();
        task.assigned_to = Some(worker.clone());
        self.store.replace(task_id, task)?;

        tracing::debug!(task_id, worker = %worker, "task assigned");
        Ok(true)
    }

    /// Set a task's status. The creator and the current assignee may both
    /// do this. Moving to `Completed` stamps `completion_date` with the
    /// current height.
    pub fn update_task_status(
        &mut self,
        ctx: &CallContext,
        task_id: EntityId,
        new_status: u64,
    ) -> Result<bool, RegistryError> {
        let new_status = TaskStatus::parse(new_status)?;

        let mut task = self.load(task_id)?;
        let is_assignee = task.assigned_to.as_ref().is_some_and(|w| ctx.is(w));
        if !ctx.is(&task.created_by) && !is_assignee {
            return Err(RegistryError::not_authorized(
                EntityKind::Task,
                task_id,
                &ctx.caller,
            ));
        }

        let previous = task.status;
        task.status = new_status;
        if new_status == TaskStatus::Completed {
            task.completion_date = Some(ctx.height);
        }
        self.store.replace(task_id, task)?;

        tracing::debug!(task_id, from = %previous, to = %new_status, height = ctx.height, "task status updated");
        Ok(true)
    }

    pub fn get_task(&self, task_id: EntityId) -> Result<Option<MaintenanceTask>, RegistryError> {
        Ok(self.store.get(task_id)?)
    }

    /// Number of tasks ever created, which is also the last ID issued.
    pub fn task_count(&self) -> u64 {
        self.ids.current()
    }

    fn load(&self, task_id: EntityId) -> Result<MaintenanceTask, RegistryError> {
        self.store
            .get(task_id)?
            .ok_or_else(|| RegistryError::not_found(EntityKind::Task, task_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> CallContext {
        CallContext::new("planner", 500)
    }

    fn scheduler_with_task() -> (MaintenanceScheduler, EntityId) {
        let mut sched = MaintenanceScheduler::new();
        let id = sched
            .create_task(&planner(), 1, "Replace bridge bearings", 3, 1620000000)
            .unwrap();
        (sched, id)
    }

    #[test]
    fn create_stores_defaults() {
        let (sched, id) = scheduler_with_task();
        assert_eq!(id, 1);
        let task = sched.get_task(id).unwrap().unwrap();
        assert_eq!(task.asset_id, 1);
        assert_eq!(task.description, "Replace bridge bearings");
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.scheduled_date, 1620000000);
        assert_eq!(task.status, TaskStatus::Scheduled);
        assert_eq!(task.completion_date, None);
        assert_eq!(task.assigned_to, None);
        assert_eq!(task.created_by, Principal::new("planner"));
    }

    #[test]
    fn create_does_not_check_asset() {
        let mut sched = MaintenanceScheduler::new();
        let id = sched
            .create_task(&planner(), 424242, "Inspect culvert", 1, 0)
            .unwrap();
        assert_eq!(sched.get_task(id).unwrap().unwrap().asset_id, 424242);
    }

    #[test]
    fn invalid_priority_rejected() {
        let mut sched = MaintenanceScheduler::new();
        let err = sched
            .create_task(&planner(), 1, "Invalid Task", 10, 1620000000)
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::InvalidEnum {
                field: EnumField::TaskPriority,
                value: 10
            }
        );
        assert_eq!(err.code(), 1);
        assert_eq!(sched.task_count(), 0);
    }

    #[test]
    fn assign_sets_worker_and_keeps_status() {
        let (mut sched, id) = scheduler_with_task();
        assert!(sched
            .assign_task(&planner(), id, "worker-principal")
            .unwrap());
        let task = sched.get_task(id).unwrap().unwrap();
        assert_eq!(task.assigned_to, Some(Principal::new("worker-principal")));
        assert_eq!(task.status, TaskStatus::Scheduled);
    }

    #[test]
    fn second_assign_is_invalid_transition() {
        let (mut sched, id) = scheduler_with_task();
        sched.assign_task(&planner(), id, "crew-a").unwrap();
        let err = sched.assign_task(&planner(), id, "crew-b").unwrap_err();
        assert_eq!(
            err,
            RegistryError::InvalidTransition {
                kind: EntityKind::Task,
                id,
                current: "assigned",
                required: "unassigned",
            }
        );
        assert_eq!(
            sched.get_task(id).unwrap().unwrap().assigned_to,
            Some(Principal::new("crew-a"))
        );
    }

    #[test]
    fn assign_after_start_is_invalid_transition() {
        let (mut sched, id) = scheduler_with_task();
        sched.update_task_status(&planner(), id, 2).unwrap();
        let err = sched.assign_task(&planner(), id, "crew-a").unwrap_err();
        assert_eq!(
            err,
            RegistryError::InvalidTransition {
                kind: EntityKind::Task,
                id,
                current: "in_progress",
                required: "scheduled",
            }
        );
        assert_eq!(sched.get_task(id).unwrap().unwrap().assigned_to, None);
    }

    #[test]
    fn assign_by_non_creator_rejected() {
        let (mut sched, id) = scheduler_with_task();
        let other = CallContext::new("crew-a", 501);
        let err = sched.assign_task(&other, id, "crew-a").unwrap_err();
        assert_eq!(err.code(), 3);
    }

    #[test]
    fn authorization_checked_before_status_on_assign() {
        let (mut sched, id) = scheduler_with_task();
        sched.update_task_status(&planner(), id, 4).unwrap();
        let other = CallContext::new("crew-a", 501);
        let err = sched.assign_task(&other, id, "crew-a").unwrap_err();
        assert_eq!(err.code(), 3);
    }

    #[test]
    fn assign_unknown_task_is_not_found() {
        let mut sched = MaintenanceScheduler::new();
        let err = sched.assign_task(&planner(), 7, "crew-a").unwrap_err();
        assert_eq!(err, RegistryError::not_found(EntityKind::Task, 7));
    }

    #[test]
    fn assignee_may_update_status() {
        let (mut sched, id) = scheduler_with_task();
        sched.assign_task(&planner(), id, "crew-a").unwrap();
        let crew = CallContext::new("crew-a", 510);
        assert!(sched.update_task_status(&crew, id, 2).unwrap());
        assert_eq!(
            sched.get_task(id).unwrap().unwrap().status,
            TaskStatus::InProgress
        );
    }

    #[test]
    fn stranger_may_not_update_status() {
        let (mut sched, id) = scheduler_with_task();
        sched.assign_task(&planner(), id, "crew-a").unwrap();
        let stranger = CallContext::new("crew-b", 510);
        let err = sched.update_task_status(&stranger, id, 3).unwrap_err();
        assert_eq!(
            err,
            RegistryError::not_authorized(EntityKind::Task, id, &stranger.caller)
        );
        let task = sched.get_task(id).unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Scheduled);
        assert_eq!(task.completion_date, None);
    }

    #[test]
    fn completion_stamps_height_and_is_kept() {
        let (mut sched, id) = scheduler_with_task();
        sched
            .update_task_status(&CallContext::new("planner", 777), id, 3)
            .unwrap();
        let task = sched.get_task(id).unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.completion_date, Some(777));

        sched
            .update_task_status(&CallContext::new("planner", 900), id, 2)
            .unwrap();
        let task = sched.get_task(id).unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.completion_date, Some(777));
    }

    #[test]
    fn completing_again_restamps_height() {
        let (mut sched, id) = scheduler_with_task();
        for (height, status) in [(777, 3), (900, 2), (950, 3)] {
            sched
                .update_task_status(&CallContext::new("planner", height), id, status)
                .unwrap();
        }
        let task = sched.get_task(id).unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.completion_date, Some(950));
    }

    #[test]
    fn terminal_states_are_not_enforced() {
        let (mut sched, id) = scheduler_with_task();
        sched.update_task_status(&planner(), id, 4).unwrap();
        sched.update_task_status(&planner(), id, 1).unwrap();
        assert_eq!(
            sched.get_task(id).unwrap().unwrap().status,
            TaskStatus::Scheduled
        );
    }

    #[test]
    fn invalid_status_rejected_before_lookup() {
        let mut sched = MaintenanceScheduler::new();
        let err = sched.update_task_status(&planner(), 999, 5).unwrap_err();
        assert_eq!(
            err,
            RegistryError::InvalidEnum {
                field: EnumField::TaskStatus,
                value: 5
            }
        );
        let err = sched.update_task_status(&planner(), 999, 2).unwrap_err();
        assert_eq!(err.code(), 404);
    }
}
