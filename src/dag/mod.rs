// src/dag/mod.rs

//! Target graph, plan resolution and scheduling.
//!
//! - [`graph`] holds the adjacency between targets.
//! - [`plan`] turns requested targets into an ordered, de-duplicated list of
//!   steps (prerequisites first, declaration order preserved).
//! - [`scheduler`] contains the per-run state machine that hands out one
//!   step at a time and reacts to completions.
//! - [`task_info`] provides per-target metadata and the scheduled target type.
//! - [`scheduler_step`] defines the result types for scheduler steps.
//! - [`state_manager`] manages per-run state transitions.

pub mod graph;
pub mod plan;
pub mod scheduler;
pub mod scheduler_step;
pub mod state_manager;
pub mod task_info;

pub use graph::DagGraph;
pub use plan::{Plan, PlanStep};
pub use scheduler::Scheduler;
pub use scheduler_step::{RunSummary, SchedulerStep};
pub use task_info::{ScheduledTarget, TargetBody, TargetRunState};
