//! On-disk layout of the package workspace.

use std::path::{Path, PathBuf};

use crate::core::package::PackageRef;

/// Workspace root plus the package directory beneath it.
///
/// Fixed once at process start; every path and working directory the resolver
/// uses is derived from here instead of from the process working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
    types_dir: String,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, types_dir: &str) -> Self {
        Self {
            root: root.into(),
            types_dir: types_dir.trim_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<types_dir>/<name>`.
    pub fn package_dir(&self, name: &str) -> PathBuf {
        self.root.join(&self.types_dir).join(name)
    }

    /// Directory holding the unit: the package dir, or its version subdirectory.
    pub fn unit_dir(&self, package: &PackageRef) -> PathBuf {
        let dir = self.package_dir(&package.name);
        match &package.version {
            Some(version) => dir.join(version.as_str()),
            None => dir,
        }
    }

    /// Root-relative path handed to the checkout tool, always `/`-separated.
    pub fn checkout_path(&self, name: &str) -> String {
        format!("{}/{}", self.types_dir, name)
    }
}
