// src/config/preset.rs

//! Built-in workflow written by `dagmake --init`.

use std::path::Path;

use tracing::info;

use crate::errors::{DagmakeError, Result};
use crate::fs::FileSystem;

/// Lock/setup/check/test/build/clean workflow for the `recipe_crypt` project.
pub const RECIPE_CRYPT: &str = include_str!("../../presets/recipe_crypt.toml");

/// Write [`RECIPE_CRYPT`] to `path`, refusing to replace an existing file.
pub fn write_preset(fs: &dyn FileSystem, path: &Path) -> Result<()> {
    if fs.exists(path) {
        return Err(DagmakeError::ConfigError(format!(
            "{} already exists; not overwriting",
            path.display()
        )));
    }
    fs.write(path, RECIPE_CRYPT.as_bytes())?;
    info!(path = %path.display(), "wrote recipe_crypt preset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_and_validate;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn preset_is_a_valid_config() {
        let cfg = parse_and_validate(RECIPE_CRYPT).unwrap();
        assert_eq!(cfg.settings().default_target.as_deref(), Some("all"));
        assert!(cfg.target("lint").unwrap().is_placeholder());
        assert!(!cfg.has_target("verify-imports"));
    }

    #[test]
    fn write_preset_refuses_to_overwrite() {
        let fs = MockFileSystem::new();
        let path = Path::new("Dagmake.toml");

        write_preset(&fs, path).unwrap();
        assert_eq!(fs.read_to_string(path).unwrap(), RECIPE_CRYPT);

        let err = write_preset(&fs, path).unwrap_err();
        assert!(matches!(err, DagmakeError::ConfigError(_)));
    }
}
