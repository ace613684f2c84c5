// src/config/model.rs

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Deserialize;

use crate::types::MissingTargetPolicy;

/// `$(NAME)` references inside commands, `remove` entries and messages.
static VAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\(([A-Za-z_][A-Za-z0-9_]*)\)").expect("static regex is valid")
});

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// default_target = "all"
///
/// [vars]
/// PACKAGE = "recipe_crypt"
///
/// [target.test]
/// after = ["test-standard", "test-coverage"]
///
/// [target.test-standard]
/// cmds = ["poetry run pytest --cov=src/$(PACKAGE) tests/"]
/// ```
///
/// All sections are optional at the serde level; validation rejects a file
/// without targets.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Substitution variables from `[vars]`.
    #[serde(default)]
    pub vars: BTreeMap<String, String>,

    /// All targets from `[target.<name>]`, keyed by target name.
    #[serde(default)]
    pub target: BTreeMap<String, TargetConfig>,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`),
/// so holders can rely on the graph among *defined* targets being acyclic.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    config: ConfigSection,
    vars: BTreeMap<String, String>,
    target: BTreeMap<String, TargetConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        vars: BTreeMap<String, String>,
        target: BTreeMap<String, TargetConfig>,
    ) -> Self {
        Self {
            config,
            vars,
            target,
        }
    }

    pub fn settings(&self) -> &ConfigSection {
        &self.config
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    pub fn targets(&self) -> &BTreeMap<String, TargetConfig> {
        &self.target
    }

    pub fn target(&self, name: &str) -> Option<&TargetConfig> {
        self.target.get(name)
    }

    pub fn has_target(&self, name: &str) -> bool {
        self.target.contains_key(name)
    }

    /// Replace every `$(NAME)` whose `NAME` is defined in `[vars]`.
    ///
    /// Unknown references are left as they are, so `$(pwd)` still reaches
    /// the shell as command substitution.
    pub fn expand_vars<'a>(&self, text: &'a str) -> Cow<'a, str> {
        expand_with(&self.vars, text)
    }
}

pub(crate) fn expand_with<'a>(vars: &BTreeMap<String, String>, text: &'a str) -> Cow<'a, str> {
    if vars.is_empty() {
        return Cow::Borrowed(text);
    }
    VAR_REF.replace_all(text, |caps: &Captures<'_>| match vars.get(&caps[1]) {
        Some(value) => value.clone(),
        None => caps[0].to_string(),
    })
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Target run when none is given on the command line.
    #[serde(default)]
    pub default_target: Option<String>,

    /// Directory commands run in, relative to the config file's directory.
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// `"error"` (default) or `"skip"`.
    #[serde(default)]
    pub missing_target: MissingTargetPolicy,

    /// Keep running targets that do not depend on a failed one.
    #[serde(default)]
    pub keep_going: bool,
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            default_target: None,
            working_dir: default_working_dir(),
            missing_target: MissingTargetPolicy::default(),
            keep_going: false,
        }
    }
}

/// `[target.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// One-line summary shown by `--list`.
    #[serde(default)]
    pub description: Option<String>,

    /// Prerequisites, run left to right before this target.
    #[serde(default)]
    pub after: Vec<String>,

    /// Shell command lines, one process each.
    ///
    /// A leading `@` suppresses echoing the line, a leading `-` ignores a
    /// non-zero exit status.
    #[serde(default)]
    pub cmds: Vec<String>,

    /// Paths or glob patterns (relative to the working dir) deleted before
    /// `cmds` run. Missing paths are not an error.
    #[serde(default)]
    pub remove: Vec<String>,

    /// Marks a target whose work is deliberately disabled: the message is
    /// printed and the target succeeds.
    #[serde(default)]
    pub placeholder: Option<String>,
}

impl TargetConfig {
    pub fn is_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    /// True when running this target does nothing beyond its prerequisites.
    pub fn has_empty_body(&self) -> bool {
        self.cmds.is_empty() && self.remove.is_empty() && self.placeholder.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        vars.insert("PACKAGE".to_string(), "recipe_crypt".to_string());
        vars.insert("TESTS".to_string(), "tests/".to_string());
        vars
    }

    #[test]
    fn expands_defined_vars() {
        let out = expand_with(&vars(), "pytest --cov=src/$(PACKAGE) $(TESTS)");
        assert_eq!(out, "pytest --cov=src/recipe_crypt tests/");
    }

    #[test]
    fn leaves_unknown_references_for_the_shell() {
        let out = expand_with(&vars(), "echo $(pwd) ${HOME}");
        assert_eq!(out, "echo $(pwd) ${HOME}");
    }

    #[test]
    fn no_vars_borrows_input() {
        let out = expand_with(&BTreeMap::new(), "echo $(PACKAGE)");
        assert!(matches!(out, Cow::Borrowed(_)));
    }
}
