// tests/config_errors.rs

mod common;
use crate::common::builders::{ConfigFileBuilder, TargetConfigBuilder};
use crate::common::{init_tracing, TestResult};

use std::io::Write;

use tempfile::NamedTempFile;

use dagmake::config::{load_and_validate, parse_and_validate, ConfigFile};
use dagmake::errors::DagmakeError;
use dagmake::types::MissingTargetPolicy;

fn validate(builder: ConfigFileBuilder) -> Result<ConfigFile, DagmakeError> {
    ConfigFile::try_from(builder.raw())
}

#[test]
fn cycle_is_rejected() {
    init_tracing();

    let builder = ConfigFileBuilder::new()
        .with_target("a", TargetConfigBuilder::cmd("echo a").after("c").build())
        .with_target("b", TargetConfigBuilder::cmd("echo b").after("a").build())
        .with_target("c", TargetConfigBuilder::cmd("echo c").after("b").build());

    let err = validate(builder).unwrap_err();
    assert!(matches!(err, DagmakeError::DagCycle(_)));
    assert_eq!(err.exit_code(), 1);

    let message = err.to_string();
    assert!(message.starts_with("Cycle detected in target graph: involving target '"));
    assert_eq!(message.matches("ycle detected").count(), 1);
}

#[test]
fn self_dependency_is_rejected() {
    init_tracing();

    let builder = ConfigFileBuilder::new()
        .with_target("a", TargetConfigBuilder::cmd("echo a").after("a").build());

    assert!(matches!(
        validate(builder),
        Err(DagmakeError::ConfigError(msg)) if msg.contains("itself")
    ));
}

#[test]
fn undefined_prerequisite_is_left_to_the_planner() {
    init_tracing();

    let builder = ConfigFileBuilder::new()
        .with_target("check", TargetConfigBuilder::new().after("verify-imports").build());

    assert!(validate(builder).is_ok());
}

#[test]
fn placeholder_cannot_have_commands() {
    init_tracing();

    let builder = ConfigFileBuilder::new().with_target(
        "lint",
        TargetConfigBuilder::cmd("flake8").placeholder("disabled").build(),
    );

    assert!(matches!(validate(builder), Err(DagmakeError::ConfigError(_))));
}

#[test]
fn blank_command_is_rejected() {
    init_tracing();

    let builder =
        ConfigFileBuilder::new().with_target("t", TargetConfigBuilder::cmd("   ").build());

    assert!(matches!(validate(builder), Err(DagmakeError::ConfigError(_))));
}

#[test]
fn default_target_must_exist() {
    init_tracing();

    let builder = ConfigFileBuilder::new()
        .with_target("build", TargetConfigBuilder::cmd("poetry build").build())
        .default_target("all");

    assert!(matches!(
        validate(builder),
        Err(DagmakeError::ConfigError(msg)) if msg.contains("default_target")
    ));
}

#[test]
fn config_without_targets_is_rejected() {
    init_tracing();

    assert!(matches!(
        validate(ConfigFileBuilder::new()),
        Err(DagmakeError::ConfigError(_))
    ));
}

#[test]
fn unknown_target_keys_are_a_parse_error() {
    init_tracing();

    let err = parse_and_validate(
        r#"
        [target.build]
        command = "poetry build"
        "#,
    )
    .unwrap_err();

    assert!(matches!(err, DagmakeError::TomlError(_)));
}

#[test]
fn sections_are_optional_apart_from_targets() -> TestResult {
    init_tracing();

    let cfg = parse_and_validate(
        r#"
        [target.hello]
        cmds = ["echo hello"]
        "#,
    )?;

    let settings = cfg.settings();
    assert_eq!(settings.default_target, None);
    assert_eq!(settings.missing_target, MissingTargetPolicy::Error);
    assert!(!settings.keep_going);
    assert!(cfg.vars().is_empty());
    Ok(())
}

#[test]
fn missing_target_policy_is_read_from_config() -> TestResult {
    init_tracing();

    let cfg = parse_and_validate(
        r#"
        [config]
        missing_target = "skip"
        keep_going = true

        [target.check]
        after = ["verify-imports"]
        "#,
    )?;

    assert_eq!(cfg.settings().missing_target, MissingTargetPolicy::Skip);
    assert!(cfg.settings().keep_going);
    Ok(())
}

#[test]
fn loads_from_disk() -> TestResult {
    init_tracing();

    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        r#"
        [vars]
        PKG = "recipe_crypt"

        [target.show]
        cmds = ["echo $(PKG)"]
        "#
    )?;

    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg.expand_vars("echo $(PKG)"), "echo recipe_crypt");
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    init_tracing();

    let err = load_and_validate("/definitely/not/here/Dagmake.toml").unwrap_err();
    assert!(matches!(err, DagmakeError::IoError(_)));
    assert_eq!(err.exit_code(), 1);
}
