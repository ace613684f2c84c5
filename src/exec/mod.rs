// src/exec/mod.rs

//! Target execution layer.
//!
//! This module is responsible for actually running a target's body, using
//! `tokio::process::Command` for shell lines, and reporting back to the
//! orchestration runtime via `RuntimeEvent`s.
//!
//! - [`command`] decodes `@`/`-` prefixes and builds the shell invocation.
//! - [`executor_loop`] owns the background loop that runs one target at a time.
//! - [`task_runner`] runs a single target: placeholder, removals, commands.
//! - [`backend`] provides the `ExecutorBackend` trait and the
//!   `RealExecutorBackend` that the runtime uses in production, and which
//!   tests can replace with a fake implementation.
//! - [`dry_run`] renders what a plan would do without doing it.

pub mod backend;
pub mod command;
pub mod dry_run;
pub mod executor_loop;
pub mod task_runner;

pub use backend::{ExecutorBackend, RealExecutorBackend};
pub use executor_loop::ExecRequest;
pub use task_runner::ExecContext;
