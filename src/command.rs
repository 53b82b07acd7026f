//! # Commands
//!
//! The single entry point every command implementation provides, and the
//! outcome type the execution wrapper inspects after it returns.
//!
//! A command finishes in one of three ways:
//!
//! - [`CommandOutcome::Completed`]: normal return. Any response is the
//!   command's own business.
//! - [`CommandOutcome::Aborted`]: the whole pipeline must terminate.
//! - [`CommandOutcome::Stopped`]: this command is done early, downstream
//!   stages still run.
//!
//! Any other failure is returned as an `Err` and is fatal to the invocation.
//!
//! ```rust
//! use cog_bundle::command::{Command, CommandOutcome};
//!
//! struct Deploy {
//!     approved: bool,
//! }
//!
//! impl Command for Deploy {
//!     fn execute(&mut self) -> anyhow::Result<CommandOutcome> {
//!         if !self.approved {
//!             return Ok(CommandOutcome::abort("deploy requires approval"));
//!         }
//!         Ok(CommandOutcome::Completed)
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How a command's execution ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum CommandOutcome {
    Completed,
    Aborted(String),
    Stopped(String),
}

impl CommandOutcome {
    /// End the command and terminate the pipeline.
    pub fn abort(message: impl Into<String>) -> Self {
        CommandOutcome::Aborted(message.into())
    }

    /// End the command early and let the pipeline continue.
    pub fn stop(message: impl Into<String>) -> Self {
        CommandOutcome::Stopped(message.into())
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            CommandOutcome::Completed => None,
            CommandOutcome::Aborted(message) | CommandOutcome::Stopped(message) => Some(message),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandOutcome::Completed => "completed",
            CommandOutcome::Aborted(_) => "aborted",
            CommandOutcome::Stopped(_) => "stopped",
        }
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "{}: {}", self.as_str(), message),
            None => f.write_str(self.as_str()),
        }
    }
}

/// A dispatchable command implementation.
pub trait Command: Send {
    fn execute(&mut self) -> anyhow::Result<CommandOutcome>;
}

/// Constructor registered for a command class; called with no arguments.
pub type CommandFactory = Arc<dyn Fn() -> Box<dyn Command> + Send + Sync>;

/// Wrap a constructor function as a [`CommandFactory`].
pub fn factory<F, C>(constructor: F) -> CommandFactory
where
    F: Fn() -> C + Send + Sync + 'static,
    C: Command + 'static,
{
    Arc::new(move || Box::new(constructor()) as Box<dyn Command>)
}
