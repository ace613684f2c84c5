// src/config/mod.rs

//! Configuration loading and validation for dagmake.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants like target names and acyclicity (`validate.rs`).
//! - Ship the embedded `recipe_crypt` workflow (`preset.rs`).

pub mod loader;
pub mod model;
pub mod preset;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, parse_and_validate};
pub use model::{ConfigFile, ConfigSection, RawConfigFile, TargetConfig};
