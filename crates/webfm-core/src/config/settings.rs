//! Core configuration loaded from a TOML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::exec::CommandPolicy;
use crate::fs::archive::TarGzArchiver;

/// Top-level core configuration.
///
/// All fields have defaults so webfm works without a config file.
/// Call [`Config::load`] to read from a TOML path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub exec: ExecConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::from_io(path, e))?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }
}

/// Where the known-locations list lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    #[serde(default = "default_places_file")]
    pub file: PathBuf,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            file: default_places_file(),
        }
    }
}

/// Command execution. Disabled unless explicitly turned on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Programs that may be run, matched literally against the first word.
    #[serde(default)]
    pub allowed_programs: Vec<String>,
    #[serde(default = "default_exec_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
}

impl ExecConfig {
    pub fn policy(&self) -> CommandPolicy {
        CommandPolicy::new(self.enabled, self.allowed_programs.clone())
    }
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_programs: Vec::new(),
            timeout_secs: default_exec_timeout_secs(),
            max_output_bytes: default_max_output_bytes(),
        }
    }
}

/// Tarball settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

impl ArchiveConfig {
    pub fn archiver(&self) -> TarGzArchiver {
        TarGzArchiver::new(self.compression_level)
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            compression_level: default_compression_level(),
        }
    }
}

fn default_places_file() -> PathBuf {
    PathBuf::from("folders.txt")
}

fn default_exec_timeout_secs() -> u64 {
    30
}

fn default_max_output_bytes() -> usize {
    32 * 1024
}

fn default_compression_level() -> u32 {
    6
}
