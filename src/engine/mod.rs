// src/engine/mod.rs

//! Orchestration engine for dagmake.
//!
//! This module ties together the scheduler and the executor through a
//! runtime event loop that reacts to:
//! - target completion events
//! - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

/// Canonical target name type used throughout the engine.
pub type TargetName = String;

/// Outcome of a target for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
    Success,
    /// Exit status of the failing command (`-1` if it could not be spawned
    /// or was killed by a signal).
    Failed(i32),
}

/// Events flowing into the runtime from the executor and signal handlers.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A target finished running all of its commands (or the first failing one).
    TargetCompleted {
        target: TargetName,
        outcome: TargetOutcome,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;

pub use core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
