//! Error types for bundle resolution and command dispatch.
//!
//! Abort and stop are not errors: they are [`CommandOutcome`](crate::command::CommandOutcome)
//! variants handled by the execution wrapper. Everything here is fatal to the
//! current invocation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BundleError {
    /// No implementation unit is available at the computed path
    #[error("Cannot load command unit: no implementation found at {}", path.display())]
    UnitNotFound { path: PathBuf },

    /// The unit was loaded but did not define the expected class
    #[error("Command class {class_name} is not defined in namespace {namespace}")]
    CommandNotDefined {
        class_name: String,
        namespace: String,
    },

    /// The command failed with something other than abort or stop
    #[error("Command '{command}' failed: {source}")]
    CommandFailed {
        command: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BundleError {
    /// Whether this error came from resolving the command rather than running it.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            BundleError::UnitNotFound { .. } | BundleError::CommandNotDefined { .. }
        )
    }
}

impl From<config::ConfigError> for BundleError {
    fn from(error: config::ConfigError) -> Self {
        BundleError::Configuration(error.to_string())
    }
}

impl From<std::io::Error> for BundleError {
    fn from(error: std::io::Error) -> Self {
        BundleError::Transport(error.to_string())
    }
}

impl From<serde_json::Error> for BundleError {
    fn from(error: serde_json::Error) -> Self {
        BundleError::Serialization(format!("JSON serialization error: {error}"))
    }
}

pub type BundleResult<T> = std::result::Result<T, BundleError>;
