#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Cog Bundle
//!
//! Command dispatch for bundle processes running inside a command pipeline.
//!
//! ## Overview
//!
//! The pipeline host starts a bundle process with the command to run in
//! `COG_COMMAND`. The bundle resolves that identifier to a registered command
//! implementation, executes it once, and reports two kinds of early exit back
//! to the host:
//!
//! - **abort**: the command failed in a way that must end the whole pipeline
//! - **stop**: the command finished early, later pipeline stages still run
//!
//! ## Module Organization
//!
//! - [`classify`] - Identifier to namespace path conversion
//! - [`namespace`] - Process-wide registry of per-bundle command namespaces
//! - [`loader`] - Implementation unit loading
//! - [`command`] - Command trait and execution outcomes
//! - [`response`] - Pipeline responses and their transport
//! - [`bundle`] - Command resolution and the execution wrapper
//! - [`config`] - Environment configuration
//! - [`error`] - Error types
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cog_bundle::command::{factory, Command, CommandOutcome};
//! use cog_bundle::loader::UnitCatalog;
//!
//! struct Status;
//!
//! impl Command for Status {
//!     fn execute(&mut self) -> anyhow::Result<CommandOutcome> {
//!         Ok(CommandOutcome::stop("all systems nominal"))
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = UnitCatalog::new();
//! catalog.register_command("ops", "status", factory(|| Status));
//!
//! // Reads COG_COMMAND from the environment and dispatches it
//! cog_bundle::run("ops", catalog)?;
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod classify;
pub mod command;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod namespace;
pub mod response;

pub use bundle::Bundle;
pub use classify::classify;
pub use command::{Command, CommandFactory, CommandOutcome};
pub use config::{BundleConfig, LogFormat};
pub use error::{BundleError, BundleResult};
pub use loader::{UnitCatalog, UnitLoader, UnitPath};
pub use namespace::{Namespace, NamespaceRegistry};
pub use response::{Disposition, Response, ResponseTransport, StdoutTransport};

use std::sync::Arc;

/// Dispatch the command named in the process environment.
///
/// Loads configuration from `COG_*` variables, initializes logging, resolves
/// the command through the global namespace registry, and writes any abort or
/// stop response to stdout.
pub fn run<L>(bundle_name: &str, loader: L) -> BundleResult<()>
where
    L: UnitLoader + 'static,
{
    let config = BundleConfig::from_env()?;
    logging::init_structured_logging(&config);

    let mut bundle = Bundle::from_config(
        bundle_name,
        &config,
        NamespaceRegistry::global(),
        Arc::new(loader),
        Arc::new(StdoutTransport::new()),
    );

    bundle.run_command().inspect_err(|error| {
        crate::log_bundle!(error, "FAILED",
            bundle: bundle_name,
            invocation_id: bundle.invocation_id(),
            command: config.command,
            resolution_failure: error.is_resolution_failure(),
            error: error.to_string()
        );
    })
}
