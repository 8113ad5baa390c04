//! Resolver configuration stored in `<workspace root>/.typefix.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::package::validate_name;
use crate::core::repair::RepairPolicy;
use crate::core::retry::RetryPolicy;

/// File name of the optional config file in the workspace root.
pub const CONFIG_FILE_NAME: &str = ".typefix.toml";

/// Resolver configuration (TOML).
///
/// Every field has a default, so a missing file or a partial file is valid.
/// The defaults drive a DefinitelyTyped-style checkout with git and npm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TypefixConfig {
    /// Directory under the workspace root that holds one folder per package.
    pub types_dir: String,

    /// Package installed (without validation) before the target. Empty disables.
    pub bootstrap_package: String,

    /// Run the installer in the workspace root before any package work.
    pub install_workspace_root: bool,

    pub checkout: CommandConfig,
    pub install: CommandConfig,
    pub validate: CommandConfig,
    pub retry: RetryConfig,
    pub repair: RepairConfig,
}

/// External command, as program followed by leading arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct CommandConfig {
    pub command: Vec<String>,
}

impl CommandConfig {
    fn from_parts(parts: &[&str]) -> Self {
        Self {
            command: parts.iter().map(|part| part.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per checkout/install command; `0` retries forever.
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RepairConfig {
    /// Consecutive validation failures without progress before giving up.
    pub stall_limit: u32,
    /// Validation runs allowed per unit; `0` means unbounded.
    pub max_validations: u32,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            stall_limit: RepairPolicy::default().stall_limit,
            max_validations: 0,
        }
    }
}

impl Default for TypefixConfig {
    fn default() -> Self {
        Self {
            types_dir: "types".to_string(),
            bootstrap_package: "node".to_string(),
            install_workspace_root: true,
            checkout: CommandConfig::from_parts(&["git", "sparse-checkout", "add"]),
            install: CommandConfig::from_parts(&["npm", "install"]),
            validate: CommandConfig::from_parts(&["npm", "run", "test"]),
            retry: RetryConfig::default(),
            repair: RepairConfig::default(),
        }
    }
}

impl TypefixConfig {
    pub fn validate(&self) -> Result<()> {
        let types_dir = self.types_dir.trim();
        if types_dir.is_empty() {
            return Err(anyhow!("types_dir must not be empty"));
        }
        if Path::new(types_dir).is_absolute() {
            return Err(anyhow!("types_dir must be relative to the workspace root"));
        }
        if !self.bootstrap_package.is_empty() {
            validate_name(&self.bootstrap_package).context("bootstrap_package")?;
        }
        for (label, cmd) in [
            ("checkout", &self.checkout),
            ("install", &self.install),
            ("validate", &self.validate),
        ] {
            if cmd.command.is_empty() || cmd.command[0].trim().is_empty() {
                return Err(anyhow!("{label}.command must be a non-empty array"));
            }
        }
        if self.repair.stall_limit == 0 {
            return Err(anyhow!("repair.stall_limit must be > 0"));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_config(self.retry.max_attempts)
    }

    pub fn repair_policy(&self) -> RepairPolicy {
        RepairPolicy {
            stall_limit: self.repair.stall_limit,
            max_validations: (self.repair.max_validations > 0)
                .then_some(self.repair.max_validations),
        }
    }

    /// Bootstrap package name, if bootstrapping is enabled.
    pub fn bootstrap(&self) -> Option<&str> {
        (!self.bootstrap_package.is_empty()).then_some(self.bootstrap_package.as_str())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `TypefixConfig::default()`.
pub fn load_config(path: &Path) -> Result<TypefixConfig> {
    if !path.exists() {
        let cfg = TypefixConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TypefixConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Write config to disk (temp file + rename).
///
/// The CLI only reads config; this exists for scripted setups that generate
/// `.typefix.toml` before invoking `typefix`.
pub fn write_config(path: &Path, cfg: &TypefixConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, buf)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
