// src/dag/state_manager.rs

//! Per-run state management for targets in the scheduler.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::dag::task_info::{RunState, ScheduledTarget, TargetInfo};
use crate::dag::DagGraph;
use crate::engine::TargetName;

/// Manages per-run state transitions for targets.
pub struct StateManager<'a> {
    graph: &'a DagGraph,
    order: &'a [TargetName],
    targets: &'a mut HashMap<TargetName, TargetInfo>,
    run_id: u64,
}

impl<'a> StateManager<'a> {
    pub fn new(
        graph: &'a DagGraph,
        order: &'a [TargetName],
        targets: &'a mut HashMap<TargetName, TargetInfo>,
        run_id: u64,
    ) -> Self {
        Self {
            graph,
            order,
            targets,
            run_id,
        }
    }

    /// Put every planned target into `Pending`.
    pub fn mark_all_pending(&mut self) {
        for info in self.targets.values_mut() {
            info.run_state = Some(RunState::Pending);
            info.exit_code = None;
        }
    }

    /// Mark every `Pending` target that (transitively) depends on
    /// `failed_target` as `Skipped`.
    ///
    /// Returns the newly skipped targets in plan order.
    pub fn skip_dependents_of(&mut self, failed_target: &str) -> Vec<TargetName> {
        let mut stack: Vec<TargetName> = self.graph.dependents_of(failed_target).to_vec();
        let mut visited: HashSet<TargetName> = HashSet::new();
        let mut newly_skipped: HashSet<TargetName> = HashSet::new();

        while let Some(name) = stack.pop() {
            if !visited.insert(name.clone()) {
                continue;
            }
            if let Some(info) = self.targets.get_mut(&name) {
                if info.run_state == Some(RunState::Pending) {
                    info.run_state = Some(RunState::Skipped);
                    newly_skipped.insert(name.clone());
                    debug!(
                        target_name = %info.name,
                        upstream = %failed_target,
                        "skipping dependent of failed target"
                    );
                }
            }
            stack.extend(self.graph.dependents_of(&name).iter().cloned());
        }

        self.in_plan_order(|info| newly_skipped.contains(&info.name))
    }

    /// Mark every non-terminal target as `Skipped` (abort the run).
    ///
    /// Returns the newly skipped targets in plan order.
    pub fn skip_remaining(&mut self) -> Vec<TargetName> {
        let mut skipped = Vec::new();
        for name in self.order {
            if let Some(info) = self.targets.get_mut(name) {
                if matches!(info.run_state, Some(RunState::Pending) | Some(RunState::Running)) {
                    info.run_state = Some(RunState::Skipped);
                    skipped.push(name.clone());
                }
            }
        }
        skipped
    }

    /// Pick the next target to run, if any.
    ///
    /// Nothing is scheduled while a target is `Running`. Otherwise the first
    /// `Pending` target in plan order whose prerequisites all succeeded is
    /// marked `Running` and returned.
    pub fn next_ready_target(&mut self) -> Option<ScheduledTarget> {
        if self
            .targets
            .values()
            .any(|info| info.run_state == Some(RunState::Running))
        {
            return None;
        }

        let candidate = {
            let ro = ReadOnlyStateManager::new(self.targets);
            self.order
                .iter()
                .filter_map(|name| self.targets.get(name))
                .find(|info| {
                    info.run_state == Some(RunState::Pending) && ro.deps_satisfied_for_info(info)
                })
                .map(|info| info.name.clone())
        }?;

        let total = self.order.len();
        let info = self.targets.get_mut(&candidate)?;
        info!(
            target_name = %info.name,
            run_id = self.run_id,
            step = info.position + 1,
            total,
            "scheduling target"
        );
        info.run_state = Some(RunState::Running);
        Some(ScheduledTarget::from_target_info(info, self.run_id, total))
    }

    /// Check if all targets are in a terminal state.
    pub fn all_targets_terminal(&self) -> bool {
        self.targets
            .values()
            .all(|info| info.run_state.is_some_and(RunState::is_terminal))
    }

    fn in_plan_order(&self, keep: impl Fn(&TargetInfo) -> bool) -> Vec<TargetName> {
        self.order
            .iter()
            .filter_map(|name| self.targets.get(name))
            .filter(|info| keep(info))
            .map(|info| info.name.clone())
            .collect()
    }
}

/// A read-only view of the state manager for checking dependency satisfaction.
pub struct ReadOnlyStateManager<'a> {
    targets: &'a HashMap<TargetName, TargetInfo>,
}

impl<'a> ReadOnlyStateManager<'a> {
    pub fn new(targets: &'a HashMap<TargetName, TargetInfo>) -> Self {
        Self { targets }
    }

    /// Whether every prerequisite of `info` finished successfully in this run.
    pub fn deps_satisfied_for_info(&self, info: &TargetInfo) -> bool {
        info.deps.iter().all(|dep_name| match self.targets.get(dep_name) {
            Some(dep) => dep.run_state == Some(RunState::DoneSuccess),
            None => {
                warn!(
                    target_name = %info.name,
                    dep = %dep_name,
                    "prerequisite missing from plan"
                );
                false
            }
        })
    }
}
