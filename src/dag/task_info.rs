// src/dag/task_info.rs

//! Target metadata and per-run state.

use crate::config::model::{ConfigFile, TargetConfig};
use crate::engine::TargetName;
use crate::exec::command::CommandLine;

/// Per-run state of a target (internal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Part of the plan, waiting for its turn or its prerequisites.
    Pending,
    /// Dispatched to the executor.
    Running,
    /// Every command finished successfully.
    DoneSuccess,
    /// A command failed.
    DoneFailed,
    /// Never ran: a prerequisite failed or the run was aborted.
    Skipped,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::DoneSuccess | RunState::DoneFailed | RunState::Skipped
        )
    }
}

/// Public, read-only view of a target's per-run state.
///
/// This is exposed for tests and diagnostics without leaking the internal
/// `RunState` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRunState {
    /// The target is not part of this run's plan.
    NotInRun,
    Pending,
    Running,
    DoneSuccess,
    DoneFailed,
    Skipped,
}

impl From<Option<RunState>> for TargetRunState {
    fn from(state: Option<RunState>) -> Self {
        match state {
            None => TargetRunState::NotInRun,
            Some(RunState::Pending) => TargetRunState::Pending,
            Some(RunState::Running) => TargetRunState::Running,
            Some(RunState::DoneSuccess) => TargetRunState::DoneSuccess,
            Some(RunState::DoneFailed) => TargetRunState::DoneFailed,
            Some(RunState::Skipped) => TargetRunState::Skipped,
        }
    }
}

/// What running a target actually does, with `$(VAR)`s already expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetBody {
    /// Message printed instead of doing any work.
    pub placeholder: Option<String>,
    /// Paths / globs deleted before `commands`.
    pub remove: Vec<String>,
    pub commands: Vec<CommandLine>,
}

impl TargetBody {
    pub fn from_config(cfg: &ConfigFile, target: &TargetConfig) -> Self {
        Self {
            placeholder: target
                .placeholder
                .as_deref()
                .map(|msg| cfg.expand_vars(msg).into_owned()),
            remove: target
                .remove
                .iter()
                .map(|entry| cfg.expand_vars(entry).into_owned())
                .collect(),
            commands: target
                .cmds
                .iter()
                .map(|raw| CommandLine::parse(&cfg.expand_vars(raw)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.placeholder.is_none() && self.remove.is_empty() && self.commands.is_empty()
    }
}

/// Static step information from the plan, plus per-run state.
#[derive(Debug, Clone)]
pub struct TargetInfo {
    pub name: TargetName,
    pub body: TargetBody,
    /// Direct prerequisites that are part of the plan.
    pub deps: Vec<TargetName>,
    /// Position in the plan; scheduling follows this order.
    pub position: usize,

    /// Per-run state (None if not part of the plan).
    pub run_state: Option<RunState>,

    /// Exit status of the failing command, if this target failed.
    pub exit_code: Option<i32>,
}

/// Description of a target that the scheduler wants the executor to run now.
#[derive(Debug, Clone)]
pub struct ScheduledTarget {
    pub name: TargetName,
    pub body: TargetBody,
    /// Identifies the invocation this dispatch belongs to.
    pub run_id: u64,
    /// 1-based position in the plan, for progress logging.
    pub position: usize,
    pub total: usize,
}

impl ScheduledTarget {
    pub fn from_target_info(info: &TargetInfo, run_id: u64, total: usize) -> Self {
        Self {
            name: info.name.clone(),
            body: info.body.clone(),
            run_id,
            position: info.position + 1,
            total,
        }
    }
}
