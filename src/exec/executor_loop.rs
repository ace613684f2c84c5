// src/exec/executor_loop.rs

//! Background executor loop that owns the running target.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::dag::ScheduledTarget;
use crate::engine::RuntimeEvent;
use crate::exec::task_runner::{run_target, ExecContext};

/// Requests the runtime sends to the executor loop.
#[derive(Debug)]
pub enum ExecRequest {
    Run(ScheduledTarget),
    /// Kill the running target without reporting a completion. The sender
    /// fires once the target's child process is gone.
    Cancel(oneshot::Sender<()>),
}

/// Internal handle for the currently-running target.
///
/// - `cancel` asks the runner to kill its child process.
/// - `handle` is the Tokio task that is actually running the target.
struct ActiveTarget {
    name: String,
    cancel: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

/// Spawn the background executor loop.
///
/// The returned sender is what `RealExecutorBackend` uses. Targets run one
/// at a time: the scheduler never dispatches a new target before the
/// previous one completed, and a `Run` that arrives while another target is
/// still running cancels the older one first.
pub fn spawn_executor(
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    ctx: ExecContext,
) -> mpsc::Sender<ExecRequest> {
    let (tx, mut rx) = mpsc::channel::<ExecRequest>(32);

    tokio::spawn(async move {
        debug!(working_dir = %ctx.working_dir.display(), "executor loop started");

        let mut active: Option<ActiveTarget> = None;

        while let Some(request) = rx.recv().await {
            match request {
                ExecRequest::Run(target) => {
                    if let Some(previous) = active.as_mut() {
                        if !previous.handle.is_finished() {
                            warn!(
                                running = %previous.name,
                                next = %target.name,
                                "new target dispatched while another is running; cancelling the older one"
                            );
                            cancel_active(previous);
                        }
                    }
                    active = Some(start_target(target, &ctx, &runtime_tx));
                }
                ExecRequest::Cancel(done) => {
                    if let Some(mut previous) = active.take() {
                        cancel_active(&mut previous);
                        let _ = previous.handle.await;
                    } else {
                        debug!("cancel requested with nothing running");
                    }
                    let _ = done.send(());
                }
            }
        }

        // Channel closed: give a cancelled runner the chance to kill its child.
        if let Some(previous) = active.take() {
            let _ = previous.handle.await;
        }

        debug!("executor loop finished (channel closed)");
    });

    tx
}

fn start_target(
    target: ScheduledTarget,
    ctx: &ExecContext,
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) -> ActiveTarget {
    let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
    let rt_tx = runtime_tx.clone();
    let ctx = ctx.clone();
    let name = target.name.clone();
    let spawn_name = name.clone();

    let handle = tokio::spawn(async move {
        run_target(target, ctx, rt_tx, cancel_rx).await;
        debug!(target_name = %spawn_name, "target runner future finished");
    });

    ActiveTarget {
        name,
        cancel: Some(cancel_tx),
        handle,
    }
}

fn cancel_active(active: &mut ActiveTarget) {
    info!(target_name = %active.name, "cancelling running target");

    if let Some(cancel) = active.cancel.take() {
        if cancel.send(()).is_err() {
            debug!(
                target_name = %active.name,
                "target already finished while cancelling"
            );
        }
    } else {
        debug!(
            target_name = %active.name,
            "no cancel sender present; target may already have been cancelled"
        );
    }
}
