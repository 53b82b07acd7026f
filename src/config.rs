//! # Bundle Configuration
//!
//! Settings a bundle process receives from its pipeline host, read from
//! `COG_`-prefixed environment variables:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `COG_COMMAND` | `command` | required |
//! | `COG_BASE_DIR` | `base_dir` | directory of the running executable |
//! | `COG_ENV` | `environment` | `development` |
//! | `COG_LOG_FORMAT` | `log_format` | `pretty` |

use crate::error::{BundleError, BundleResult};
use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "COG";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Command identifier to dispatch
    pub command: String,

    /// Root that implementation units are located under
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Read from `COG_ENV`
    #[serde(default = "default_environment", alias = "env")]
    pub environment: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_environment() -> String {
    "development".to_string()
}

impl BundleConfig {
    /// Configuration for `command` with every other setting at its default.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            base_dir: default_base_dir(),
            environment: default_environment(),
            log_format: LogFormat::default(),
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Load from the process environment.
    pub fn from_env() -> BundleResult<Self> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    /// Load from an explicit variable map instead of the process environment.
    ///
    /// Keys are full variable names, e.g. `COG_COMMAND`.
    pub fn from_map(vars: config::Map<String, String>) -> BundleResult<Self> {
        Self::load(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn load(source: Environment) -> BundleResult<Self> {
        let settings = Config::builder().add_source(source).build()?;

        let config: BundleConfig = settings.try_deserialize().map_err(|e| {
            BundleError::Configuration(format!("Invalid {ENV_PREFIX}_* environment: {e}"))
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BundleResult<()> {
        if self.command.trim().is_empty() {
            return Err(BundleError::Configuration(format!(
                "{ENV_PREFIX}_COMMAND must not be empty"
            )));
        }
        Ok(())
    }
}
