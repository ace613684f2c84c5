// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::warn;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{DagmakeError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::DagmakeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.vars, raw.target))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_targets(cfg)?;
    validate_target_names(cfg)?;
    validate_global_config(cfg)?;
    validate_target_bodies(cfg)?;
    validate_target_dependencies(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_targets(cfg: &RawConfigFile) -> Result<()> {
    if cfg.target.is_empty() {
        return Err(DagmakeError::ConfigError(
            "config must contain at least one [target.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_target_names(cfg: &RawConfigFile) -> Result<()> {
    for name in cfg.target.keys() {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(DagmakeError::ConfigError(format!(
                "invalid target name '{name}': must be non-empty and contain no whitespace"
            )));
        }
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if let Some(default) = &cfg.config.default_target {
        if !cfg.target.contains_key(default) {
            return Err(DagmakeError::ConfigError(format!(
                "[config].default_target names unknown target '{default}'"
            )));
        }
    }
    Ok(())
}

fn validate_target_bodies(cfg: &RawConfigFile) -> Result<()> {
    for (name, target) in cfg.target.iter() {
        if target.is_placeholder() && !(target.cmds.is_empty() && target.remove.is_empty()) {
            return Err(DagmakeError::ConfigError(format!(
                "target '{name}' is a placeholder and cannot also define `cmds` or `remove`"
            )));
        }
        if target.cmds.iter().any(|c| c.trim().is_empty()) {
            return Err(DagmakeError::ConfigError(format!(
                "target '{name}' has an empty entry in `cmds`"
            )));
        }
        if target.remove.iter().any(|r| r.trim().is_empty()) {
            return Err(DagmakeError::ConfigError(format!(
                "target '{name}' has an empty entry in `remove`"
            )));
        }
    }
    Ok(())
}

fn validate_target_dependencies(cfg: &RawConfigFile) -> Result<()> {
    for (name, target) in cfg.target.iter() {
        for dep in target.after.iter() {
            if dep == name {
                return Err(DagmakeError::ConfigError(format!(
                    "target '{}' cannot depend on itself in `after`",
                    name
                )));
            }
            if !cfg.target.contains_key(dep) {
                // Left to the planner: `missing_target` decides whether this
                // fails the run or becomes a no-op.
                warn!(
                    target_name = %name,
                    dep = %dep,
                    "prerequisite is not defined as a target"
                );
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawConfigFile) -> Result<()> {
    // Edge direction: dep -> target
    // For:
    //   [target.B]
    //   after = ["A"]
    // we add edge A -> B.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.target.keys() {
        graph.add_node(name.as_str());
    }

    for (name, target) in cfg.target.iter() {
        for dep in target.after.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(DagmakeError::DagCycle(format!("involving target '{node}'")))
        }
    }
}
