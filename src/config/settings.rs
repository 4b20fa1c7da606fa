use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::DebugError;
use crate::util::paths::{config_path, debug_dir};

/// Enables the debug archive when set to anything but empty, `0`, or `false`.
pub const ENV_DEBUG: &str = "DEBUG_ARCHIVE";
/// Overrides the directory new archives are written to.
pub const ENV_DEBUG_DIR: &str = "DEBUG_ARCHIVE_DIR";

/// Debug archive configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugConfig {
    /// Write an archive for this run
    pub enabled: bool,
    /// Directory the session archive is created in
    pub output_dir: PathBuf,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output_dir: debug_dir(),
        }
    }
}

/// TOML representation of the `[debug]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlDebugConfig {
    pub enabled: Option<bool>,
    pub output_dir: Option<PathBuf>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Debug archive configuration
    pub debug: Option<TomlDebugConfig>,
}

impl DebugConfig {
    pub fn enabled_in(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            output_dir: output_dir.into(),
        }
    }

    /// Defaults overlaid with `DEBUG_ARCHIVE` / `DEBUG_ARCHIVE_DIR`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(
            std::env::var(ENV_DEBUG).ok().as_deref(),
            std::env::var_os(ENV_DEBUG_DIR).map(PathBuf::from),
        );
        config
    }

    fn apply_env(&mut self, flag: Option<&str>, dir: Option<PathBuf>) {
        if let Some(flag) = flag {
            let flag = flag.trim();
            self.enabled = !(flag.is_empty() || flag == "0" || flag.eq_ignore_ascii_case("false"));
        }
        if let Some(dir) = dir.filter(|d| !d.as_os_str().is_empty()) {
            self.output_dir = dir;
        }
    }

    /// Defaults overlaid with the `[debug]` table of a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, DebugError> {
        let toml_config: TomlConfig =
            toml::from_str(contents).map_err(|e| DebugError::Config(e.to_string()))?;

        let mut config = Self::default();
        if let Some(debug) = toml_config.debug {
            if let Some(enabled) = debug.enabled {
                config.enabled = enabled;
            }
            if let Some(output_dir) = debug.output_dir {
                config.output_dir = output_dir;
            }
        }
        Ok(config)
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, DebugError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No debug config file, using defaults");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .map_err(|e| DebugError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }

    /// The config file under the data directory, then the environment on top.
    pub fn discover() -> Result<Self, DebugError> {
        Self::discover_at(&config_path())
    }

    fn discover_at(path: &Path) -> Result<Self, DebugError> {
        let mut config = Self::load(path)?;
        config.apply_env(
            std::env::var(ENV_DEBUG).ok().as_deref(),
            std::env::var_os(ENV_DEBUG_DIR).map(PathBuf::from),
        );
        Ok(config)
    }
}
