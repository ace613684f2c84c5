// src/dag/scheduler_step.rs

//! Step-by-step execution result types for the scheduler.

use crate::dag::task_info::ScheduledTarget;
use crate::engine::TargetName;

/// Structured result of a single scheduler "step".
///
/// Tests can drive the scheduler by hand and make assertions about what
/// changed.
#[derive(Debug, Clone, Default)]
pub struct SchedulerStep {
    /// Target that became ready to run as a result of this step. Execution
    /// is sequential, so there is at most one.
    pub newly_scheduled: Option<ScheduledTarget>,
    /// Targets that were newly marked as skipped in this step.
    pub newly_skipped: Vec<TargetName>,
    /// Whether this step caused the run to finish.
    pub run_just_finished: bool,
}

/// Final outcome of a run, in plan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: Vec<TargetName>,
    /// Failed targets with the failing command's exit status.
    pub failed: Vec<(TargetName, i32)>,
    pub skipped: Vec<TargetName>,
    /// The run was stopped by a shutdown request.
    pub interrupted: bool,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty() && !self.interrupted
    }
}
