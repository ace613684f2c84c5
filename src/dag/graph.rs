// src/dag/graph.rs

use std::collections::HashMap;

use crate::config::model::ConfigFile;
use crate::dag::plan::Plan;
use crate::engine::TargetName;

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone, Default)]
struct DagNode {
    /// Direct prerequisites, in declaration order.
    deps: Vec<TargetName>,
    /// Direct dependents: targets that list this one in `after`.
    dependents: Vec<TargetName>,
}

/// In-memory target graph keyed by target name.
///
/// Acyclicity is checked in `config::validate`; this only keeps adjacency
/// for planning and scheduling. Prerequisites that name undefined targets
/// still get a node (with no deps of their own) so callers can see them.
#[derive(Debug, Clone)]
pub struct DagGraph {
    nodes: HashMap<TargetName, DagNode>,
}

impl DagGraph {
    /// Build the graph of every target in a validated [`ConfigFile`].
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::from_edges(
            cfg.targets()
                .iter()
                .map(|(name, target)| (name.clone(), target.after.clone())),
        )
    }

    /// Build the graph restricted to the steps of a resolved [`Plan`].
    pub fn from_plan(plan: &Plan) -> Self {
        Self::from_edges(
            plan.steps()
                .iter()
                .map(|step| (step.name.clone(), step.deps.clone())),
        )
    }

    fn from_edges(edges: impl Iterator<Item = (TargetName, Vec<TargetName>)>) -> Self {
        let mut nodes: HashMap<TargetName, DagNode> = HashMap::new();
        let edges: Vec<_> = edges.collect();

        // First pass: create nodes with their dependency lists.
        for (name, deps) in edges.iter() {
            nodes.entry(name.clone()).or_default().deps = deps.clone();
        }

        // Second pass: populate dependents based on deps.
        for (name, deps) in edges {
            for dep in deps {
                let dep_node = nodes.entry(dep).or_default();
                if !dep_node.dependents.contains(&name) {
                    dep_node.dependents.push(name.clone());
                }
            }
        }

        Self { nodes }
    }

    /// Immediate prerequisites of a target (its `after` list).
    pub fn dependencies_of(&self, name: &str) -> &[TargetName] {
        self.nodes
            .get(name)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a target (targets that list this one in `after`).
    pub fn dependents_of(&self, name: &str) -> &[TargetName] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }
}
