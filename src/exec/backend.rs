// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime talks to an `ExecutorBackend` instead of a raw mpsc sender.
//! This makes it easy to swap in a fake executor in tests while keeping the
//! production executor implementation in [`executor_loop`](super::executor_loop).
//!
//! - `RealExecutorBackend` wraps the background executor loop and forwards
//!   requests over an mpsc channel.
//! - Tests can provide their own `ExecutorBackend` that, for example, records
//!   which targets were dispatched and directly emits `TargetCompleted` events.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::{mpsc, oneshot};

use crate::dag::ScheduledTarget;
use crate::engine::RuntimeEvent;
use crate::errors::{Error, Result};

use super::executor_loop::{spawn_executor, ExecRequest};
use super::task_runner::ExecContext;

/// Trait abstracting how scheduled targets are executed.
///
/// Implementations report back by sending `RuntimeEvent::TargetCompleted`
/// on the runtime's event channel.
pub trait ExecutorBackend: Send {
    /// Start running `target`.
    fn dispatch(
        &mut self,
        target: ScheduledTarget,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Stop the running target, if any. No completion is reported for it.
    fn cancel(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real executor backend used in production.
pub struct RealExecutorBackend {
    tx: mpsc::Sender<ExecRequest>,
}

impl RealExecutorBackend {
    /// Create a new real executor backend, wiring it to the given runtime
    /// event sender.
    ///
    /// This spawns the background executor loop immediately.
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>, ctx: ExecContext) -> Self {
        let tx = spawn_executor(runtime_tx, ctx);
        Self { tx }
    }

    fn send(&self, request: ExecRequest) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        // Clone the sender so the future doesn't borrow `self` across `await`.
        let tx = self.tx.clone();
        Box::pin(async move {
            tx.send(request).await.map_err(Error::from)?;
            Ok(())
        })
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn dispatch(
        &mut self,
        target: ScheduledTarget,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        self.send(ExecRequest::Run(target))
    }

    fn cancel(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.tx.clone();
        Box::pin(async move {
            let (done_tx, done_rx) = oneshot::channel();
            tx.send(ExecRequest::Cancel(done_tx))
                .await
                .map_err(Error::from)?;
            // The loop drops `done_tx` without sending only if it is gone
            // already, in which case there is nothing left to wait for.
            let _ = done_rx.await;
            Ok(())
        })
    }
}
