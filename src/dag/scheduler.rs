use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::dag::graph::DagGraph;
use crate::dag::plan::Plan;
use crate::dag::scheduler_step::{RunSummary, SchedulerStep};
use crate::dag::state_manager::{ReadOnlyStateManager, StateManager};
use crate::dag::task_info::{RunState, TargetInfo, TargetRunState};
use crate::engine::{TargetName, TargetOutcome};

/// Scheduler holds a resolved plan plus mutable per-run state.
///
/// It is responsible for:
/// - handing out exactly one ready target at a time, in plan order
/// - marking targets as succeeded/failed
/// - skipping whatever can no longer run after a failure (all remaining
///   targets, or only dependents of the failed one with `keep_going`)
/// - aborting the run on request
#[derive(Debug)]
pub struct Scheduler {
    graph: DagGraph,
    /// Target names in plan order.
    order: Vec<TargetName>,
    targets: HashMap<TargetName, TargetInfo>,
    keep_going: bool,
    /// Monotonically increasing run ID.
    run_counter: u64,
    /// Currently active run ID, or `None` if there is no active run.
    current_run_id: Option<u64>,
    interrupted: bool,
}

impl Scheduler {
    /// Construct a scheduler for a resolved [`Plan`].
    pub fn new(plan: &Plan, keep_going: bool) -> Self {
        let graph = DagGraph::from_plan(plan);

        let mut order = Vec::with_capacity(plan.len());
        let mut targets = HashMap::new();

        for (position, step) in plan.steps().iter().enumerate() {
            order.push(step.name.clone());
            targets.insert(
                step.name.clone(),
                TargetInfo {
                    name: step.name.clone(),
                    body: step.body.clone(),
                    deps: step.deps.clone(),
                    position,
                    run_state: None,
                    exit_code: None,
                },
            );
        }

        Self {
            graph,
            order,
            targets,
            keep_going,
            run_counter: 0,
            current_run_id: None,
            interrupted: false,
        }
    }

    /// Returns `true` if there is currently no active run.
    pub fn is_idle(&self) -> bool {
        self.current_run_id.is_none()
    }

    /// Read-only view of the given target's run state.
    ///
    /// Returns `None` for targets that are not in the plan.
    pub fn run_state_of(&self, target: &str) -> Option<TargetRunState> {
        let info = self.targets.get(target)?;
        Some(info.run_state.into())
    }

    /// Whether the prerequisites of `target` all succeeded in this run.
    ///
    /// Returns `None` if the target is not in the plan.
    pub fn deps_satisfied(&self, target: &str) -> Option<bool> {
        let info = self.targets.get(target)?;
        let mgr = ReadOnlyStateManager::new(&self.targets);
        Some(mgr.deps_satisfied_for_info(info))
    }

    /// Start a run: every planned target becomes `Pending` and the first one
    /// is scheduled.
    pub fn start(&mut self) -> SchedulerStep {
        self.run_counter += 1;
        self.current_run_id = Some(self.run_counter);
        self.interrupted = false;

        let mut manager = self.manager();
        manager.mark_all_pending();
        let newly_scheduled = manager.next_ready_target();

        debug!(run_id = self.run_counter, steps = self.order.len(), "scheduler: starting run");

        let run_just_finished = self.maybe_finish_run();
        SchedulerStep {
            newly_scheduled,
            newly_skipped: Vec::new(),
            run_just_finished,
        }
    }

    /// Handle completion of a target with a concrete outcome.
    pub fn handle_completion(&mut self, target: &str, outcome: TargetOutcome) -> SchedulerStep {
        let Some(run_id) = self.current_run_id else {
            warn!(target_name = %target, "completion with no active run; ignoring");
            return SchedulerStep::default();
        };

        let Some(info) = self.targets.get_mut(target) else {
            warn!(target_name = %target, "completion for target outside the plan; ignoring");
            return SchedulerStep::default();
        };

        if info.run_state != Some(RunState::Running) {
            warn!(
                target_name = %target,
                state = ?info.run_state,
                "completion for target that is not running; ignoring"
            );
            return SchedulerStep::default();
        }

        let keep_going = self.keep_going;
        let mut newly_skipped = Vec::new();

        match outcome {
            TargetOutcome::Success => {
                info.run_state = Some(RunState::DoneSuccess);
                debug!(target_name = %info.name, run_id, "target completed successfully");
            }
            TargetOutcome::Failed(code) => {
                info.run_state = Some(RunState::DoneFailed);
                info.exit_code = Some(code);
                warn!(
                    target_name = %info.name,
                    run_id,
                    exit_code = code,
                    keep_going,
                    "target failed"
                );
                let mut manager = self.manager();
                newly_skipped = if keep_going {
                    manager.skip_dependents_of(target)
                } else {
                    manager.skip_remaining()
                };
            }
        }

        let newly_scheduled = self.manager().next_ready_target();
        let run_just_finished = self.maybe_finish_run();

        SchedulerStep {
            newly_scheduled,
            newly_skipped,
            run_just_finished,
        }
    }

    /// Stop the run: every target that has not finished, including the one
    /// currently running, is marked `Skipped`.
    pub fn abort(&mut self) -> SchedulerStep {
        if self.current_run_id.is_none() {
            return SchedulerStep::default();
        }

        self.interrupted = true;
        let newly_skipped = self.manager().skip_remaining();
        info!(skipped = newly_skipped.len(), "scheduler: run aborted");
        let run_just_finished = self.maybe_finish_run();

        SchedulerStep {
            newly_scheduled: None,
            newly_skipped,
            run_just_finished,
        }
    }

    /// Outcome of every planned target, in plan order.
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            interrupted: self.interrupted,
            ..RunSummary::default()
        };

        for info in self.order.iter().filter_map(|name| self.targets.get(name)) {
            match info.run_state {
                Some(RunState::DoneSuccess) => summary.succeeded.push(info.name.clone()),
                Some(RunState::DoneFailed) => summary
                    .failed
                    .push((info.name.clone(), info.exit_code.unwrap_or(-1))),
                Some(RunState::Skipped) => summary.skipped.push(info.name.clone()),
                Some(RunState::Pending) | Some(RunState::Running) | None => {}
            }
        }

        summary
    }

    fn manager(&mut self) -> StateManager<'_> {
        StateManager::new(
            &self.graph,
            &self.order,
            &mut self.targets,
            self.current_run_id.unwrap_or(0),
        )
    }

    /// Clear `current_run_id` once every target is terminal.
    ///
    /// Returns `true` if this call transitioned the scheduler from running
    /// to idle.
    fn maybe_finish_run(&mut self) -> bool {
        if self.current_run_id.is_none() {
            return false;
        }

        if self.manager().all_targets_terminal() {
            info!(
                run_id = self.current_run_id,
                "scheduler: all targets terminal; run finished"
            );
            self.current_run_id = None;
            true
        } else {
            false
        }
    }
}
