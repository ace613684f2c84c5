// src/exec/task_runner.rs

//! Individual target runner.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::dag::ScheduledTarget;
use crate::engine::{RuntimeEvent, TargetOutcome};
use crate::exec::command::{shell_command, CommandLine};
use crate::fs::{remove_paths, FileSystem};

/// Everything a target needs from its surroundings.
#[derive(Debug, Clone)]
pub struct ExecContext {
    /// Directory commands run in and `remove` entries are relative to.
    pub working_dir: PathBuf,
    pub fs: Arc<dyn FileSystem>,
}

/// How one target's body ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyResult {
    Finished(TargetOutcome),
    Cancelled,
}

/// Run a single target and emit a `TargetCompleted` event.
///
/// - If the cancel channel fires, the running child process is killed and
///   **no** `TargetCompleted` event is sent.
/// - Errors (spawn failures, removal failures) are logged and reported as
///   `Failed(-1)`.
pub async fn run_target(
    target: ScheduledTarget,
    ctx: ExecContext,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    cancel_rx: oneshot::Receiver<()>,
) {
    let name = target.name.clone();
    let run_id = target.run_id;

    let outcome = match run_target_inner(&target, &ctx, cancel_rx).await {
        Ok(BodyResult::Finished(outcome)) => outcome,
        Ok(BodyResult::Cancelled) => return,
        Err(err) => {
            error!(
                target_name = %name,
                run_id,
                error = %format!("{err:#}"),
                "target execution error"
            );
            TargetOutcome::Failed(-1)
        }
    };

    if let TargetOutcome::Failed(code) = outcome {
        error!(target_name = %name, exit_code = code, "*** [{}] Error {}", name, code);
    }

    if runtime_tx
        .send(RuntimeEvent::TargetCompleted {
            target: name.clone(),
            outcome,
        })
        .await
        .is_err()
    {
        debug!(target_name = %name, "runtime gone before completion could be reported");
    }
}

async fn run_target_inner(
    target: &ScheduledTarget,
    ctx: &ExecContext,
    mut cancel_rx: oneshot::Receiver<()>,
) -> Result<BodyResult> {
    info!(
        target_name = %target.name,
        run_id = target.run_id,
        step = target.position,
        total = target.total,
        "running target"
    );

    let body = &target.body;

    if let Some(message) = &body.placeholder {
        println!("{message}");
        warn!(target_name = %target.name, "placeholder target; no checks were run");
        return Ok(BodyResult::Finished(TargetOutcome::Success));
    }

    if !body.remove.is_empty() {
        let report = remove_paths(ctx.fs.as_ref(), &ctx.working_dir, &body.remove)
            .with_context(|| format!("removing paths for target '{}'", target.name))?;
        info!(
            target_name = %target.name,
            removed = report.removed.len(),
            "removed paths"
        );
    }

    let mut cancel_open = true;
    for line in body.commands.iter() {
        match run_command(target, ctx, line, &mut cancel_rx, &mut cancel_open).await? {
            BodyResult::Finished(TargetOutcome::Success) => {}
            BodyResult::Finished(TargetOutcome::Failed(code)) if line.ignore_errors => {
                warn!(
                    target_name = %target.name,
                    exit_code = code,
                    cmd = %line,
                    "command failed (ignored)"
                );
            }
            other => return Ok(other),
        }
    }

    Ok(BodyResult::Finished(TargetOutcome::Success))
}

/// Run one command line to completion, or until the cancel channel fires.
async fn run_command(
    target: &ScheduledTarget,
    ctx: &ExecContext,
    line: &CommandLine,
    cancel_rx: &mut oneshot::Receiver<()>,
    cancel_open: &mut bool,
) -> Result<BodyResult> {
    if !line.silent {
        println!("{line}");
    }
    debug!(target_name = %target.name, cmd = %line, "spawning command");

    let mut child = shell_command(line, &ctx.working_dir)
        .spawn()
        .with_context(|| format!("spawning `{}` for target '{}'", line, target.name))?;

    let status = loop {
        tokio::select! {
            status_res = child.wait() => {
                break status_res.with_context(|| {
                    format!("waiting for `{}` of target '{}'", line, target.name)
                })?;
            }

            cancel = &mut *cancel_rx, if *cancel_open => {
                match cancel {
                    Ok(()) => {
                        info!(
                            target_name = %target.name,
                            cmd = %line,
                            "cancellation requested; killing process"
                        );
                        if let Err(e) = child.kill().await {
                            warn!(
                                target_name = %target.name,
                                error = %e,
                                "failed to kill child process on cancellation"
                            );
                        }
                        return Ok(BodyResult::Cancelled);
                    }
                    Err(_) => {
                        // Sender dropped without cancelling; keep waiting.
                        *cancel_open = false;
                    }
                }
            }
        }
    };

    let code = status.code().unwrap_or(-1);
    debug!(
        target_name = %target.name,
        cmd = %line,
        exit_code = code,
        success = status.success(),
        "command exited"
    );

    if status.success() {
        Ok(BodyResult::Finished(TargetOutcome::Success))
    } else {
        Ok(BodyResult::Finished(TargetOutcome::Failed(code)))
    }
}
