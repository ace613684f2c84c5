use clap::ValueEnum;
use serde::Deserialize;

/// What to do when a prerequisite names a target that is not defined.
///
/// - `Error`: planning fails before anything runs (default).
/// - `Skip`: the missing prerequisite is treated as an empty target that
///   always succeeds; a warning is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingTargetPolicy {
    #[default]
    Error,
    Skip,
}
