//! Discovery of sibling version variants already checked out on disk.

use std::fs;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::package::VersionTag;
use crate::io::layout::Workspace;

/// List version subdirectories (`v<digits>`) of the unversioned package dir.
///
/// A missing package directory yields an empty list. Files and directories with
/// other names are ignored; symlinks to directories are listed. Results are
/// sorted so runs are reproducible.
pub fn find_versions(workspace: &Workspace, name: &str) -> Result<Vec<VersionTag>> {
    let dir = workspace.package_dir(name);
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "package dir missing, no versions");
        return Ok(Vec::new());
    }

    let mut versions = Vec::new();
    for entry in fs::read_dir(&dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        // Follows symlinks, so a linked version directory still counts.
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(version) = entry.file_name().to_str().and_then(VersionTag::parse) {
            versions.push(version);
        }
    }
    versions.sort();
    debug!(name, count = versions.len(), "found sibling versions");
    Ok(versions)
}
