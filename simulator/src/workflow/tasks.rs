use cellcore::prelude::OperatingMode;
use cellcore::telemetry::LogManager;
use cellcore::{SimError, SimResult};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::thread;
use std::time::Duration;

pub const MIN_TASK_MINUTES: u32 = 1;
pub const MAX_TASK_MINUTES: u32 = 120;

/// Maintenance actions an operator can schedule against the pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    StartCharging,
    StartDischarging,
    SetIdle,
    PerformMaintenance,
}

impl TaskKind {
    pub fn label(self) -> &'static str {
        match self {
            TaskKind::StartCharging => "Start Charging",
            TaskKind::StartDischarging => "Start Discharging",
            TaskKind::SetIdle => "Set Idle",
            TaskKind::PerformMaintenance => "Perform Maintenance",
        }
    }

    /// Mode the pack is left in once the task completes.
    pub fn implied_mode(self) -> Option<OperatingMode> {
        match self {
            TaskKind::StartCharging => Some(OperatingMode::Charging),
            TaskKind::StartDischarging => Some(OperatingMode::Discharging),
            TaskKind::SetIdle => Some(OperatingMode::Idle),
            TaskKind::PerformMaintenance => None,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduledTask {
    pub kind: TaskKind,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOutcome {
    pub task: ScheduledTask,
    pub mode: Option<OperatingMode>,
    pub message: String,
}

impl ScheduledTask {
    pub fn new(kind: TaskKind, minutes: u32) -> SimResult<Self> {
        if !(MIN_TASK_MINUTES..=MAX_TASK_MINUTES).contains(&minutes) {
            return Err(SimError::InvalidConfig(format!(
                "task duration {} min outside {}..={}",
                minutes, MIN_TASK_MINUTES, MAX_TASK_MINUTES
            )));
        }
        Ok(Self { kind, minutes })
    }

    pub fn describe(&self) -> String {
        format!("Task `{}` scheduled for {} minutes.", self.kind, self.minutes)
    }

    /// Blocks for `delay` to stand in for the task running, then reports it done.
    pub fn execute(&self, delay: Duration) -> TaskOutcome {
        let logger = LogManager::new();
        logger.record(&format!(
            "Executing task: {} for {} minutes...",
            self.kind, self.minutes
        ));
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        let message = format!("Task `{}` executed successfully!", self.kind);
        logger.record(&message);

        TaskOutcome {
            task: *self,
            mode: self.kind.implied_mode(),
            message,
        }
    }
}
