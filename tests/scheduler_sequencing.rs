// tests/scheduler_sequencing.rs

mod common;
use crate::common::builders::{ConfigFileBuilder, TargetConfigBuilder};
use crate::common::init_tracing;

use dagmake::config::ConfigFile;
use dagmake::dag::{Plan, Scheduler, TargetRunState};
use dagmake::engine::TargetOutcome;
use dagmake::types::MissingTargetPolicy;

/// `build` after `check` and `test`, with `clean` independent of both.
fn workflow() -> ConfigFile {
    ConfigFileBuilder::new()
        .with_target("clean", TargetConfigBuilder::new().remove("dist").build())
        .with_target("check", TargetConfigBuilder::cmd("echo check").build())
        .with_target("test", TargetConfigBuilder::cmd("echo test").build())
        .with_target(
            "build",
            TargetConfigBuilder::cmd("echo build").after("check").after("test").build(),
        )
        .with_target(
            "all",
            TargetConfigBuilder::new().after("clean").after("build").build(),
        )
        .build()
}

fn plan(cfg: &ConfigFile, target: &str) -> Plan {
    Plan::resolve(cfg, &[target.to_string()], MissingTargetPolicy::Error).unwrap()
}

/// Complete every scheduled target with `outcome_for`, returning the
/// dispatch order.
fn drive(
    scheduler: &mut Scheduler,
    outcome_for: impl Fn(&str) -> TargetOutcome,
) -> Vec<String> {
    let mut order = Vec::new();
    let mut step = scheduler.start();
    while let Some(target) = step.newly_scheduled.take() {
        assert_eq!(
            scheduler.run_state_of(&target.name),
            Some(TargetRunState::Running)
        );
        order.push(target.name.clone());
        step = scheduler.handle_completion(&target.name, outcome_for(&target.name));
    }
    order
}

#[test]
fn one_target_at_a_time_in_plan_order() {
    init_tracing();

    let cfg = workflow();
    let plan = plan(&cfg, "all");
    let mut scheduler = Scheduler::new(&plan, false);

    let step = scheduler.start();
    let first = step.newly_scheduled.expect("first target scheduled");
    assert_eq!(first.name, "clean");
    assert_eq!(first.position, 1);
    assert_eq!(first.total, 5);

    // Nothing else is handed out until `clean` completes.
    assert_eq!(scheduler.run_state_of("check"), Some(TargetRunState::Pending));
    assert!(!scheduler.is_idle());

    let step = scheduler.handle_completion("clean", TargetOutcome::Success);
    assert_eq!(step.newly_scheduled.map(|t| t.name).as_deref(), Some("check"));
}

#[test]
fn successful_run_finishes_and_goes_idle() {
    init_tracing();

    let cfg = workflow();
    let plan = plan(&cfg, "all");
    let mut scheduler = Scheduler::new(&plan, false);

    let order = drive(&mut scheduler, |_| TargetOutcome::Success);

    assert_eq!(order, vec!["clean", "check", "test", "build", "all"]);
    assert!(scheduler.is_idle());
    let summary = scheduler.summary();
    assert!(summary.is_success());
    assert_eq!(summary.succeeded, order);
}

#[test]
fn failure_aborts_the_rest_of_the_run() {
    init_tracing();

    let cfg = workflow();
    let plan = plan(&cfg, "all");
    let mut scheduler = Scheduler::new(&plan, false);

    let order = drive(&mut scheduler, |name| match name {
        "check" => TargetOutcome::Failed(2),
        _ => TargetOutcome::Success,
    });

    // `test` does not depend on `check`, but make stops at the first error.
    assert_eq!(order, vec!["clean", "check"]);
    let summary = scheduler.summary();
    assert_eq!(summary.failed, vec![("check".to_string(), 2)]);
    assert_eq!(summary.skipped, vec!["test", "build", "all"]);
    assert!(scheduler.is_idle());
}

#[test]
fn keep_going_only_skips_dependents() {
    init_tracing();

    let cfg = workflow();
    let plan = plan(&cfg, "all");
    let mut scheduler = Scheduler::new(&plan, true);

    let order = drive(&mut scheduler, |name| match name {
        "check" => TargetOutcome::Failed(1),
        _ => TargetOutcome::Success,
    });

    assert_eq!(order, vec!["clean", "check", "test"]);
    let summary = scheduler.summary();
    assert_eq!(summary.succeeded, vec!["clean", "test"]);
    assert_eq!(summary.skipped, vec!["build", "all"]);
    assert_eq!(scheduler.deps_satisfied("build"), Some(false));
}

#[test]
fn build_is_never_dispatched_after_a_failed_test() {
    init_tracing();

    let cfg = workflow();
    let plan = plan(&cfg, "build");

    for keep_going in [false, true] {
        let mut scheduler = Scheduler::new(&plan, keep_going);
        let order = drive(&mut scheduler, |name| match name {
            "test" => TargetOutcome::Failed(3),
            _ => TargetOutcome::Success,
        });
        assert!(!order.contains(&"build".to_string()), "keep_going={keep_going}");
        assert_eq!(
            scheduler.run_state_of("build"),
            Some(TargetRunState::Skipped)
        );
    }
}

#[test]
fn stray_completions_are_ignored() {
    init_tracing();

    let cfg = workflow();
    let plan = plan(&cfg, "build");
    let mut scheduler = Scheduler::new(&plan, false);
    scheduler.start();

    // `test` is still pending; a completion for it changes nothing.
    let step = scheduler.handle_completion("test", TargetOutcome::Success);
    assert!(step.newly_scheduled.is_none());
    assert_eq!(scheduler.run_state_of("test"), Some(TargetRunState::Pending));

    let step = scheduler.handle_completion("clean", TargetOutcome::Success);
    assert!(step.newly_scheduled.is_none());
    assert_eq!(scheduler.run_state_of("clean"), None);
}

#[test]
fn abort_skips_running_and_pending_targets() {
    init_tracing();

    let cfg = workflow();
    let plan = plan(&cfg, "all");
    let mut scheduler = Scheduler::new(&plan, false);
    scheduler.start();
    scheduler.handle_completion("clean", TargetOutcome::Success);

    let step = scheduler.abort();
    assert!(step.run_just_finished);
    assert_eq!(step.newly_skipped, vec!["check", "test", "build", "all"]);

    let summary = scheduler.summary();
    assert!(summary.interrupted);
    assert_eq!(summary.succeeded, vec!["clean"]);
    assert!(scheduler.is_idle());
}
