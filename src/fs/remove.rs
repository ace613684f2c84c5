// src/fs/remove.rs

//! Built-in, idempotent removal used by cleanup targets.

use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;

use super::FileSystem;

/// What a call to [`remove_paths`] actually deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveReport {
    pub removed: Vec<PathBuf>,
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

fn ensure_inside_root(pattern: &str) -> Result<()> {
    let path = Path::new(pattern);
    if path.is_absolute() || path.components().any(|c| matches!(c, Component::ParentDir)) {
        bail!("refusing to remove '{pattern}': entries must stay inside the working directory");
    }
    Ok(())
}

fn build_globset(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        // `*` must not cross directories, so `*.egg-info` only matches at
        // the top level while `**/*.pyc` matches everywhere.
        let glob = GlobBuilder::new(pat)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Delete every path under `root` named by `entries`.
///
/// Entries without glob metacharacters are joined to `root` and removed if
/// they exist. Glob entries are matched against paths relative to `root`
/// (forward slashes); a matched directory is removed as a whole and not
/// descended into. Nothing existing is not an error.
pub fn remove_paths(fs: &dyn FileSystem, root: &Path, entries: &[String]) -> Result<RemoveReport> {
    let mut report = RemoveReport::default();
    let mut globs = Vec::new();

    for entry in entries {
        ensure_inside_root(entry)?;
        if is_glob(entry) {
            globs.push(entry.trim_start_matches("./"));
            continue;
        }
        let path = root.join(entry);
        if remove_one(fs, &path)? {
            report.removed.push(path);
        }
    }

    if globs.is_empty() {
        return Ok(report);
    }

    let set = build_globset(&globs)?;
    for path in collect_matching_paths(fs, root, &set)? {
        if remove_one(fs, &path)? {
            report.removed.push(path);
        }
    }

    Ok(report)
}

fn remove_one(fs: &dyn FileSystem, path: &Path) -> Result<bool> {
    // A link is removed itself; whatever it points at is left alone.
    if fs.is_symlink(path) {
        fs.remove_file(path)?;
    } else if fs.is_dir(path) {
        fs.remove_dir_all(path)?;
    } else if fs.exists(path) {
        fs.remove_file(path)?;
    } else {
        debug!(path = %path.display(), "nothing to remove");
        return Ok(false);
    }
    debug!(path = %path.display(), "removed");
    Ok(true)
}

/// Walk `root` and collect every file or directory whose relative path
/// matches `set`. Matched directories are not descended into, and
/// symlinked directories are never followed.
fn collect_matching_paths(fs: &dyn FileSystem, root: &Path, set: &GlobSet) -> Result<Vec<PathBuf>> {
    let mut matched = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let mut entries = fs.read_dir(&dir)?;
        entries.sort();
        for path in entries {
            let Ok(rel) = path.strip_prefix(root) else {
                continue;
            };
            let rel_str = rel.to_string_lossy().replace('\\', "/");
            if set.is_match(&rel_str) {
                matched.push(path);
            } else if fs.is_dir(&path) && !fs.is_symlink(&path) {
                stack.push(path);
            }
        }
    }

    Ok(matched)
}
