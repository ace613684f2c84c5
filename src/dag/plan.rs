// src/dag/plan.rs

//! Resolution of requested targets into an ordered execution plan.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::model::ConfigFile;
use crate::dag::graph::DagGraph;
use crate::dag::task_info::TargetBody;
use crate::engine::TargetName;
use crate::errors::{DagmakeError, Result};
use crate::types::MissingTargetPolicy;

/// One target in a resolved plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    pub name: TargetName,
    pub body: TargetBody,
    /// Direct prerequisites, in declaration order. Each appears earlier in
    /// the plan.
    pub deps: Vec<TargetName>,
    /// The target is not defined and was planned as a no-op
    /// (`missing_target = "skip"`).
    pub missing: bool,
}

/// Ordered list of steps a single invocation runs.
///
/// Every reachable target appears exactly once, always after all of its
/// prerequisites. Prerequisites are visited left to right and requested
/// targets in the order given, so `after = ["clean", "setup"]` cleans
/// before it sets up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    requested: Vec<TargetName>,
    steps: Vec<PlanStep>,
}

struct Resolver<'a> {
    cfg: &'a ConfigFile,
    graph: DagGraph,
    policy: MissingTargetPolicy,
    done: HashSet<TargetName>,
    visiting: Vec<TargetName>,
    steps: Vec<PlanStep>,
}

impl Plan {
    /// Resolve `requested` against `cfg`.
    ///
    /// Fails with [`DagmakeError::UnknownTarget`] when a requested target is
    /// undefined, or when a prerequisite is undefined and `policy` is
    /// [`MissingTargetPolicy::Error`]. Nothing is planned in that case.
    ///
    /// Unlike make, which only notices a missing prerequisite when it gets
    /// there, this fails before any target has run.
    pub fn resolve(
        cfg: &ConfigFile,
        requested: &[TargetName],
        policy: MissingTargetPolicy,
    ) -> Result<Self> {
        let mut resolver = Resolver {
            cfg,
            graph: DagGraph::from_config(cfg),
            policy,
            done: HashSet::new(),
            visiting: Vec::new(),
            steps: Vec::new(),
        };

        for name in requested {
            if !cfg.has_target(name) {
                return Err(DagmakeError::UnknownTarget {
                    target: name.clone(),
                    needed_by: None,
                });
            }
            resolver.visit(name, None)?;
        }

        let names: Vec<&str> = resolver.steps.iter().map(|s| s.name.as_str()).collect();
        debug!(?requested, plan = ?names, "resolved execution plan");

        Ok(Self {
            requested: requested.to_vec(),
            steps: resolver.steps,
        })
    }

    pub fn requested(&self) -> &[TargetName] {
        &self.requested
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Resolver<'_> {
    fn visit(&mut self, name: &str, needed_by: Option<&str>) -> Result<()> {
        if self.done.contains(name) {
            return Ok(());
        }
        if self.visiting.iter().any(|v| v == name) {
            return Err(DagmakeError::DagCycle(format!(
                "target '{}' depends on itself via {}",
                name,
                self.visiting.join(" -> ")
            )));
        }

        let cfg = self.cfg;
        let Some(target) = cfg.target(name) else {
            return self.plan_missing(name, needed_by);
        };

        self.visiting.push(name.to_string());
        let deps = self.graph.dependencies_of(name).to_vec();
        for dep in deps.iter() {
            self.visit(dep, Some(name))?;
        }
        self.visiting.pop();

        self.done.insert(name.to_string());
        self.steps.push(PlanStep {
            name: name.to_string(),
            body: TargetBody::from_config(cfg, target),
            deps,
            missing: false,
        });
        Ok(())
    }

    fn plan_missing(&mut self, name: &str, needed_by: Option<&str>) -> Result<()> {
        match self.policy {
            MissingTargetPolicy::Error => Err(DagmakeError::UnknownTarget {
                target: name.to_string(),
                needed_by: needed_by.map(str::to_string),
            }),
            MissingTargetPolicy::Skip => {
                warn!(
                    target_name = %name,
                    needed_by = needed_by.unwrap_or("-"),
                    "prerequisite is not defined; treating it as an empty target"
                );
                self.done.insert(name.to_string());
                self.steps.push(PlanStep {
                    name: name.to_string(),
                    body: TargetBody::default(),
                    deps: Vec::new(),
                    missing: true,
                });
                Ok(())
            }
        }
    }
}
