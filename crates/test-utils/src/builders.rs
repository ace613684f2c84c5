#![allow(dead_code)]

use std::collections::BTreeMap;
use dagmake::config::{ConfigFile, ConfigSection, RawConfigFile, TargetConfig};
use dagmake::types::MissingTargetPolicy;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                vars: BTreeMap::new(),
                target: BTreeMap::new(),
            },
        }
    }

    pub fn with_target(mut self, name: &str, target: TargetConfig) -> Self {
        self.config.target.insert(name.to_string(), target);
        self
    }

    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.config.vars.insert(name.to_string(), value.to_string());
        self
    }

    pub fn default_target(mut self, name: &str) -> Self {
        self.config.config.default_target = Some(name.to_string());
        self
    }

    pub fn missing_target(mut self, policy: MissingTargetPolicy) -> Self {
        self.config.config.missing_target = policy;
        self
    }

    pub fn keep_going(mut self, val: bool) -> Self {
        self.config.config.keep_going = val;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TargetConfig`.
pub struct TargetConfigBuilder {
    target: TargetConfig,
}

impl TargetConfigBuilder {
    pub fn new() -> Self {
        Self {
            target: TargetConfig::default(),
        }
    }

    /// Target with a single command line.
    pub fn cmd(cmd: &str) -> Self {
        Self::new().then(cmd)
    }

    /// Append another command line.
    pub fn then(mut self, cmd: &str) -> Self {
        self.target.cmds.push(cmd.to_string());
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.target.after.push(dep.to_string());
        self
    }

    pub fn remove(mut self, entry: &str) -> Self {
        self.target.remove.push(entry.to_string());
        self
    }

    pub fn placeholder(mut self, message: &str) -> Self {
        self.target.placeholder = Some(message.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.target.description = Some(text.to_string());
        self
    }

    pub fn build(self) -> TargetConfig {
        self.target
    }
}

impl Default for TargetConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
