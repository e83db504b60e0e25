//! File-based registry configuration.
//!
//! Servers usually keep their template locations in a config file rather than
//! in code. [`TemplateConfig`] is the serde model for that file:
//!
//! ```yaml
//! partials: templates/partials/*.html
//! pages: templates/pages/*.html
//! layout: templates/layout.html
//! reload: always
//! ```
//!
//! `reload` is optional and defaults to `never`. Functions cannot be described
//! in YAML; they are supplied in code when turning the config into
//! [`CompileInputs`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::functions::FunctionSet;
use crate::template::CompileInputs;

/// When the reload trigger should recompile the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReloadMode {
    /// Recompile before every request (development).
    Always,
    /// Never recompile after startup.
    #[default]
    Never,
}

impl ReloadMode {
    pub fn is_enabled(self) -> bool {
        matches!(self, ReloadMode::Always)
    }
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Template locations and reload policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    /// Glob pattern selecting partial files
    pub partials: String,
    /// Glob pattern selecting page files
    pub pages: String,
    /// Path of the layout file
    pub layout: String,
    #[serde(default)]
    pub reload: ReloadMode,
}

impl TemplateConfig {
    /// Parses a configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Combines the configured locations with a function set.
    pub fn inputs(&self, functions: FunctionSet) -> CompileInputs {
        CompileInputs::new(functions, &self.partials, &self.pages, &self.layout)
    }
}
