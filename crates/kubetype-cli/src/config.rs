//! CLI configuration
//!
//! Read from `~/.config/kubetype/config.yaml` unless `--config` names
//! another file. Command-line flags override what the file sets.

use kubetype_core::{CandidatePattern, Codec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Schema catalog file; the bundled catalog when unset
    #[serde(default)]
    pub registry: Option<PathBuf>,

    /// Candidate type name patterns, tried in order
    #[serde(default = "CandidatePattern::defaults")]
    pub candidates: Vec<CandidatePattern>,

    /// Default output format for `convert`
    #[serde(default)]
    pub output: Codec,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: None,
            candidates: CandidatePattern::defaults(),
            output: Codec::default(),
        }
    }
}

impl Config {
    /// Load an explicit config file, or the default one when it exists
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path
    ///
    /// A relative `registry` is taken relative to the config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        let mut config: Self = serde_yaml::from_str(&content).map_err(|e| {
            CliError::config(
                format!("{}: {}", path.display(), e),
                "Expected keys: registry, candidates, output",
            )
        })?;

        if let (Some(registry), Some(base)) = (config.registry.as_mut(), path.parent())
            && registry.is_relative()
        {
            *registry = base.join(&*registry);
        }

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Default configuration path, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kubetype").join("config.yaml"))
    }
}
