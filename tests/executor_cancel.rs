// tests/executor_cancel.rs

#![cfg(unix)]

mod common;
use crate::common::builders::{ConfigFileBuilder, TargetConfigBuilder};
use crate::common::{init_tracing, with_timeout, TestResult};

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use dagmake::dag::{Plan, Scheduler, ScheduledTarget, TargetBody};
use dagmake::engine::{CoreRuntime, Runtime, RuntimeEvent};
use dagmake::exec::command::CommandLine;
use dagmake::exec::{ExecContext, ExecutorBackend, RealExecutorBackend};
use dagmake::fs::RealFileSystem;
use dagmake::types::MissingTargetPolicy;

fn context(dir: &Path) -> ExecContext {
    ExecContext {
        working_dir: dir.to_path_buf(),
        fs: Arc::new(RealFileSystem),
    }
}

fn slow_target(name: &str) -> ScheduledTarget {
    ScheduledTarget {
        name: name.to_string(),
        body: TargetBody {
            commands: vec![CommandLine::parse("@sleep 2; touch done")],
            ..TargetBody::default()
        },
        run_id: 1,
        position: 1,
        total: 1,
    }
}

#[tokio::test]
async fn cancel_kills_the_running_command_without_completion() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let (tx, mut rx) = mpsc::channel::<RuntimeEvent>(8);
    let mut backend = RealExecutorBackend::new(tx, context(dir.path()));

    backend.dispatch(slow_target("slow")).await?;
    // Let the shell start.
    sleep(Duration::from_millis(300)).await;

    let started = Instant::now();
    timeout(Duration::from_secs(1), backend.cancel()).await??;
    assert!(started.elapsed() < Duration::from_secs(1));

    // The executor loop still holds a sender, so silence means no event.
    assert!(
        timeout(Duration::from_millis(2500), rx.recv()).await.is_err(),
        "cancelled target must not report a completion"
    );
    assert!(!dir.path().join("done").exists());
    Ok(())
}

#[tokio::test]
async fn cancel_with_nothing_running_is_acknowledged() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let (tx, _rx) = mpsc::channel::<RuntimeEvent>(8);
    let mut backend = RealExecutorBackend::new(tx, context(dir.path()));

    with_timeout(backend.cancel()).await?;
    Ok(())
}

#[tokio::test]
async fn shutdown_during_a_real_run_stops_the_plan() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;

    let cfg = ConfigFileBuilder::new()
        .with_target("slow", TargetConfigBuilder::cmd("sleep 2; touch done").build())
        .with_target(
            "next",
            TargetConfigBuilder::cmd("touch next-ran").after("slow").build(),
        )
        .build();
    let plan = Plan::resolve(&cfg, &["next".to_string()], MissingTargetPolicy::Error)?;

    let (tx, rx) = mpsc::channel::<RuntimeEvent>(8);
    let backend = RealExecutorBackend::new(tx.clone(), context(dir.path()));
    let runtime = Runtime::new(CoreRuntime::new(Scheduler::new(&plan, false)), rx, backend);

    tokio::spawn(async move {
        sleep(Duration::from_millis(300)).await;
        let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
    });

    let summary = with_timeout(runtime.run()).await?;

    assert!(summary.interrupted);
    assert!(summary.succeeded.is_empty());
    assert_eq!(summary.skipped, vec!["slow", "next"]);

    sleep(Duration::from_millis(2200)).await;
    assert!(!dir.path().join("done").exists());
    assert!(!dir.path().join("next-ran").exists());
    Ok(())
}
