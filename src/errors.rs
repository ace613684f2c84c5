// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DagmakeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("No rule to make target '{target}'{}", needed_by_suffix(.needed_by))]
    UnknownTarget {
        target: String,
        needed_by: Option<String>,
    },

    #[error("Cycle detected in target graph: {0}")]
    DagCycle(String),

    #[error("Target '{target}' failed with exit status {code}")]
    TargetFailed { target: String, code: i32 },

    #[error("Interrupted")]
    Interrupted,

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn needed_by_suffix(needed_by: &Option<String>) -> String {
    match needed_by {
        Some(parent) => format!(", needed by '{parent}'"),
        None => String::new(),
    }
}

impl DagmakeError {
    /// Process exit status the binary should use for this error.
    ///
    /// Target failures propagate the failing command's status; Ctrl-C maps
    /// to the conventional 130; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            DagmakeError::TargetFailed { code, .. } if *code > 0 => *code,
            DagmakeError::Interrupted => 130,
            _ => 1,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DagmakeError>;
