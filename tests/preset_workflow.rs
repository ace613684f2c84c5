// tests/preset_workflow.rs

mod common;
use crate::common::{init_tracing, TestResult};

use std::path::{Path, PathBuf};

use dagmake::config::parse_and_validate;
use dagmake::config::preset::RECIPE_CRYPT;
use dagmake::dag::Plan;
use dagmake::exec::dry_run::render_plan;
use dagmake::fs::mock::MockFileSystem;
use dagmake::fs::{remove_paths, FileSystem};
use dagmake::render_target_list;
use dagmake::types::MissingTargetPolicy;

/// A checkout after a full development cycle.
fn dirty_checkout() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_dir("./.pytest_cache");
    fs.add_dir("./.mypy_cache");
    fs.add_file("./build/lib/recipe_crypt/__init__.py", "");
    fs.add_file("./dist/recipe_crypt-0.1.0.tar.gz", "");
    fs.add_dir("./src/recipe_crypt.egg-info");
    fs.add_file("./.coverage", "");
    fs.add_file("./coverage.xml", "<coverage/>");
    fs.add_dir("./htmlcov");
    fs.add_file("./src/recipe_crypt/__init__.py", "");
    fs.add_file("./src/recipe_crypt/__pycache__/__init__.cpython-311.pyc", "");
    fs.add_file("./tests/__pycache__/test_scraper.cpython-311.pyc", "");
    fs.add_file("./tests/test_scraper.py", "");
    fs.add_file("./tests/stale.pyc", "");
    fs.add_file("./pyproject.toml", "[tool.poetry]");
    fs
}

#[test]
fn clean_leaves_only_sources() -> TestResult {
    init_tracing();

    let cfg = parse_and_validate(RECIPE_CRYPT)?;
    let plan = Plan::resolve(&cfg, &["clean".to_string()], MissingTargetPolicy::Error)?;
    let clean = &plan.steps()[0].body;

    let fs = dirty_checkout();
    let report = remove_paths(&fs, Path::new("."), &clean.remove)?;
    assert!(!report.removed.is_empty());

    let files: Vec<PathBuf> = fs
        .paths()
        .into_iter()
        .filter(|p| fs.is_file(p))
        .collect();
    assert_eq!(
        files,
        vec![
            PathBuf::from("./pyproject.toml"),
            PathBuf::from("./src/recipe_crypt/__init__.py"),
            PathBuf::from("./tests/test_scraper.py"),
        ]
    );

    // Running it again finds nothing and does not fail.
    let again = remove_paths(&fs, Path::new("."), &clean.remove)?;
    assert!(again.removed.is_empty());
    Ok(())
}

#[test]
fn list_marks_default_and_placeholders() -> TestResult {
    init_tracing();

    let cfg = parse_and_validate(RECIPE_CRYPT)?;
    let listing = render_target_list(&cfg);

    let all = listing
        .lines()
        .find(|l| l.trim_start_matches(['*', ' ']).starts_with("all "))
        .expect("all is listed");
    assert!(all.starts_with('*'));
    assert!(all.contains("[after: clean, setup, check, test]"));

    let lint = listing
        .lines()
        .find(|l| l.trim_start().starts_with("lint "))
        .expect("lint is listed");
    assert!(lint.ends_with("(placeholder)"));

    assert_eq!(listing.lines().count(), cfg.targets().len());
    Ok(())
}

#[test]
fn dry_run_shows_every_step_without_running() -> TestResult {
    init_tracing();

    let cfg = parse_and_validate(RECIPE_CRYPT)?;
    let plan = Plan::resolve(&cfg, &["all".to_string()], MissingTargetPolicy::Skip)?;
    let out = render_plan(&plan);

    assert!(out.starts_with("# plan for all: clean -> lock -> setup"));
    assert!(out.contains("# [verify-imports]\n#   not defined; nothing to do\n"));
    assert!(out.contains("#   placeholder: lint: flake8 checks are currently disabled\n"));
    assert!(out.contains("#   remove src/*.egg-info\n"));
    assert!(out.contains("poetry run pytest --cov=src/recipe_crypt tests\n"));

    let lock = out.find("poetry lock").expect("lock command shown");
    let install = out.find("poetry install --no-root").expect("setup command shown");
    assert!(lock < install);
    Ok(())
}
