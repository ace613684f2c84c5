// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;

use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::config::preset::write_preset;
use crate::dag::{Plan, RunSummary, Scheduler};
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent, TargetName};
use crate::errors::{DagmakeError, Result};
use crate::exec::dry_run::render_plan;
use crate::exec::{ExecContext, RealExecutorBackend};
use crate::fs::RealFileSystem;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - plan resolution
/// - scheduler / core / runtime
/// - executor
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    if args.init {
        write_preset(&RealFileSystem, &args.config)?;
        println!("wrote {}", args.config.display());
        return Ok(());
    }

    let cfg = load_and_validate(&args.config)?;

    if args.list {
        print!("{}", render_target_list(&cfg));
        return Ok(());
    }

    let requested = requested_targets(&args, &cfg)?;
    let policy = args.missing.unwrap_or(cfg.settings().missing_target);
    let plan = Plan::resolve(&cfg, &requested, policy)?;

    if args.dry_run {
        print!("{}", render_plan(&plan));
        debug!("dry-run complete (no execution)");
        return Ok(());
    }

    let working_dir = resolve_working_dir(&args, &cfg);
    if !working_dir.is_dir() {
        return Err(DagmakeError::ConfigError(format!(
            "working directory {} does not exist",
            working_dir.display()
        )));
    }

    let keep_going = args.keep_going || cfg.settings().keep_going;
    info!(
        plan = ?plan.names(),
        working_dir = %working_dir.display(),
        keep_going,
        "starting run"
    );

    let ctx = ExecContext {
        working_dir,
        fs: Arc::new(RealFileSystem),
    };
    let summary = execute_plan(&plan, keep_going, ctx).await?;
    summary_to_result(&summary)
}

/// Run `plan` with the real executor and return its summary.
pub async fn execute_plan(plan: &Plan, keep_going: bool, ctx: ExecContext) -> Result<RunSummary> {
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let executor = RealExecutorBackend::new(rt_tx.clone(), ctx);

    // Ctrl-C → abort the plan.
    let signal_task = {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        })
    };
    drop(rt_tx);

    let core = CoreRuntime::new(Scheduler::new(plan, keep_going));
    let summary = Runtime::new(core, rt_rx, executor).run().await;
    signal_task.abort();
    summary
}

/// Turn a finished run into the error the binary reports, if any.
pub fn summary_to_result(summary: &RunSummary) -> Result<()> {
    if summary.interrupted {
        return Err(DagmakeError::Interrupted);
    }

    for (target, code) in summary.failed.iter() {
        error!(target_name = %target, exit_code = code, "target failed");
    }
    if !summary.skipped.is_empty() {
        info!(skipped = ?summary.skipped, "targets not run");
    }

    match summary.failed.first() {
        Some((target, code)) => Err(DagmakeError::TargetFailed {
            target: target.clone(),
            code: *code,
        }),
        None => Ok(()),
    }
}

fn requested_targets(args: &CliArgs, cfg: &ConfigFile) -> Result<Vec<TargetName>> {
    if !args.targets.is_empty() {
        return Ok(args.targets.clone());
    }
    match &cfg.settings().default_target {
        Some(default) => Ok(vec![default.clone()]),
        None => Err(DagmakeError::ConfigError(
            "no targets given and [config].default_target is not set".to_string(),
        )),
    }
}

/// `--dir` if given, else `[config].working_dir` relative to the config
/// file's directory.
fn resolve_working_dir(args: &CliArgs, cfg: &ConfigFile) -> PathBuf {
    if let Some(dir) = &args.dir {
        return dir.clone();
    }
    let configured = &cfg.settings().working_dir;
    if configured.is_absolute() {
        return configured.clone();
    }
    config_root_dir(&args.config).join(configured)
}

/// Directory holding the config file.
///
/// - If the config path has a non-empty parent (e.g. "ci/Dagmake.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Dagmake.toml" (parent = ""),
///   we fall back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// `--list` output: one line per target, with description and prerequisites.
pub fn render_target_list(cfg: &ConfigFile) -> String {
    let mut out = String::new();
    let width = cfg.targets().keys().map(|k| k.len()).max().unwrap_or(0);
    let default = cfg.settings().default_target.as_deref();

    for (name, target) in cfg.targets().iter() {
        let marker = if Some(name.as_str()) == default { "*" } else { " " };
        let description = target.description.as_deref().unwrap_or("");
        let _ = write!(out, "{marker} {name:<width$}  {description}");
        if !target.after.is_empty() {
            let _ = write!(out, " [after: {}]", target.after.join(", "));
        }
        if target.is_placeholder() {
            let _ = write!(out, " (placeholder)");
        }
        let _ = writeln!(out);
    }

    out
}
