//! Package identifiers for units of resolution work.
//!
//! A [`PackageRef`] names one unit: a package plus an optional version tag.
//! Two refs are the same unit iff both name and version are equal.

use std::fmt;
use std::sync::LazyLock;

use anyhow::{Result, anyhow};
use regex::Regex;

static VERSION_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v\d+$").expect("version tag regex"));

/// Version directory name such as `v2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionTag(String);

impl VersionTag {
    /// Parse a version tag; only `v` followed by one or more digits is accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        VERSION_TAG_RE
            .is_match(raw)
            .then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One unit of dependency work.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRef {
    pub name: String,
    pub version: Option<VersionTag>,
}

impl PackageRef {
    /// Unversioned ref for `name` (the package's default location).
    pub fn new(name: &str) -> Result<Self> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            version: None,
        })
    }

    /// Versioned ref for a sibling version variant of an existing package.
    pub fn versioned(&self, version: VersionTag) -> Self {
        Self {
            name: self.name.clone(),
            version: Some(version),
        }
    }

    /// Test unit passed to the validation tool: `name` or `name/version`.
    pub fn unit(&self) -> String {
        match &self.version {
            Some(version) => format!("{}/{}", self.name, version),
            None => self.name.clone(),
        }
    }

    /// Version label used in banners; unversioned refs read as `latest`.
    pub fn version_label(&self) -> &str {
        self.version.as_ref().map_or("latest", VersionTag::as_str)
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unit())
    }
}

/// Validate that a package name is safe to join under the types directory.
///
/// Names are passed through verbatim; `/` is only allowed in the scoped
/// `@scope/name` form.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(anyhow!("package name must not be empty"));
    }
    if name.chars().any(|c| c.is_whitespace() || c == '\\') {
        return Err(anyhow!(
            "package name must not contain whitespace or '\\' (got '{name}')"
        ));
    }
    if name.starts_with('.') {
        return Err(anyhow!("package name must not start with '.' (got '{name}')"));
    }
    let separators = name.matches('/').count();
    if separators == 0 {
        return Ok(());
    }
    let scoped = name
        .strip_prefix('@')
        .and_then(|rest| rest.split_once('/'))
        .is_some_and(|(scope, pkg)| {
            separators == 1 && !scope.is_empty() && !pkg.is_empty() && !pkg.starts_with('.')
        });
    if !scoped {
        return Err(anyhow!(
            "package name may only contain '/' as '@scope/name' (got '{name}')"
        ));
    }
    Ok(())
}
