// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use tracing::{debug, info};

use crate::dag::{ScheduledTarget, Scheduler, SchedulerStep};
use crate::engine::{TargetName, TargetOutcome};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Send this target to the executor.
    Dispatch(ScheduledTarget),
    /// Kill whatever the executor is currently running.
    CancelRunning,
    /// The run is over; the shell should stop its loop.
    RequestExit,
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

/// Start the scheduler's run.
pub fn start_run(scheduler: &mut Scheduler) -> CoreStep {
    let step = scheduler.start();
    commands_for(step)
}

/// Handle a target completion event.
pub fn handle_target_completion(
    scheduler: &mut Scheduler,
    target: TargetName,
    outcome: TargetOutcome,
) -> CoreStep {
    let step = scheduler.handle_completion(&target, outcome);
    if !step.newly_skipped.is_empty() {
        info!(
            failed = %target,
            skipped = ?step.newly_skipped,
            "skipping targets after failure"
        );
    }
    commands_for(step)
}

/// Handle a shutdown request: abort the plan and kill the running target.
pub fn handle_shutdown(scheduler: &mut Scheduler) -> CoreStep {
    let step = scheduler.abort();
    debug!(skipped = ?step.newly_skipped, "shutdown requested");
    CoreStep {
        commands: vec![CoreCommand::CancelRunning, CoreCommand::RequestExit],
        keep_running: false,
    }
}

fn commands_for(step: SchedulerStep) -> CoreStep {
    let mut commands = Vec::new();

    if let Some(target) = step.newly_scheduled {
        commands.push(CoreCommand::Dispatch(target));
    }

    if step.run_just_finished {
        commands.push(CoreCommand::RequestExit);
    }

    CoreStep {
        keep_running: !step.run_just_finished,
        commands,
    }
}
