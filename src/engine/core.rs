// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - sending `ScheduledTarget`s to the executor
//! - handling Ctrl+C / shutdown
//!
//! The core is unit-testable without any Tokio, channels, filesystem, or
//! processes.

use crate::dag::{RunSummary, Scheduler};
use crate::engine::event_handlers::{
    handle_shutdown, handle_target_completion, start_run, CoreStep,
};
use crate::engine::RuntimeEvent;

/// Pure core runtime state.
///
/// Owns the scheduler. It has **no** channels, no Tokio types, and does not
/// perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    scheduler: Scheduler,
}

impl CoreRuntime {
    pub fn new(scheduler: Scheduler) -> Self {
        Self { scheduler }
    }

    /// Whether the scheduler has no active run (not started or finished).
    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    /// Start the run and return the commands that kick it off.
    pub fn start(&mut self) -> CoreStep {
        start_run(&mut self.scheduler)
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::TargetCompleted { target, outcome } => {
                handle_target_completion(&mut self.scheduler, target, outcome)
            }
            RuntimeEvent::ShutdownRequested => handle_shutdown(&mut self.scheduler),
        }
    }

    pub fn summary(&self) -> RunSummary {
        self.scheduler.summary()
    }
}
