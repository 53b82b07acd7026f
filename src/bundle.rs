//! # Bundle
//!
//! Resolves one command identifier to a command instance and runs it,
//! turning abort and stop outcomes into pipeline responses.
//!
//! ## Resolution
//!
//! ```text
//! "sub-cmd" ──split on '-'──► lib/cog_cmd/<bundle>/sub/cmd ──► UnitLoader::load
//!           └─classify──────► Sub::Cmd ──────────────────────► Namespace::instantiate
//! ```
//!
//! The path and the class name are derived independently: the path splits on
//! `-` only, while the class name classifies the whole identifier.
//!
//! ## Execution
//!
//! | Outcome | Response |
//! |---------|----------|
//! | `Completed` | none |
//! | `Aborted(m)` | `content = m`, disposition `abort` |
//! | `Stopped(m)` | `body = m`, disposition `normal` |
//! | `Err(e)` | none, `BundleError::CommandFailed` returned |

use crate::classify::classify;
use crate::command::{Command, CommandOutcome};
use crate::config::BundleConfig;
use crate::error::{BundleError, BundleResult};
use crate::loader::{UnitLoader, UnitPath};
use crate::namespace::{Namespace, NamespaceRegistry};
use crate::response::{Response, ResponseTransport, BODY_FIELD};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

pub struct Bundle {
    name: String,
    base_dir: PathBuf,
    command_name: String,
    namespace: Arc<Namespace>,
    command: Option<Box<dyn Command>>,
    loader: Arc<dyn UnitLoader>,
    transport: Arc<dyn ResponseTransport>,
    invocation_id: Uuid,
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("name", &self.name)
            .field("base_dir", &self.base_dir)
            .field("command_name", &self.command_name)
            .field("namespace", &self.namespace.qualified_name())
            .field("resolved", &self.command.is_some())
            .field("invocation_id", &self.invocation_id)
            .finish()
    }
}

impl Bundle {
    /// Create a bundle bound to one command identifier.
    ///
    /// The bundle's namespace is fetched from `registry`, creating it on first
    /// use. The base directory defaults to the running executable's directory.
    pub fn new(
        name: impl Into<String>,
        command_name: impl Into<String>,
        registry: &NamespaceRegistry,
        loader: Arc<dyn UnitLoader>,
        transport: Arc<dyn ResponseTransport>,
    ) -> Self {
        let config = BundleConfig::new(command_name);
        Self::from_config(name, &config, registry, loader, transport)
    }

    /// Create a bundle from loaded configuration.
    pub fn from_config(
        name: impl Into<String>,
        config: &BundleConfig,
        registry: &NamespaceRegistry,
        loader: Arc<dyn UnitLoader>,
        transport: Arc<dyn ResponseTransport>,
    ) -> Self {
        let name = name.into();
        let namespace = registry.get_or_create(&name);
        let invocation_id = Uuid::new_v4();

        crate::log_bundle!(debug, "CREATED",
            bundle: name,
            invocation_id: invocation_id,
            command: config.command,
            base_dir: config.base_dir,
            namespace: namespace.qualified_name()
        );

        Self {
            name,
            base_dir: config.base_dir.clone(),
            command_name: config.command.clone(),
            namespace,
            command: None,
            loader,
            transport,
            invocation_id,
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub fn namespace(&self) -> &Arc<Namespace> {
        &self.namespace
    }

    pub fn invocation_id(&self) -> Uuid {
        self.invocation_id
    }

    /// Location of the implementation unit for `command_name`.
    pub fn unit_path(&self, command_name: &str) -> UnitPath {
        UnitPath::for_command(&self.base_dir, &self.name, command_name)
    }

    /// Class name `command_name` must be defined under.
    pub fn class_name(&self, command_name: &str) -> String {
        classify(command_name)
    }

    /// The resolved command, loading and instantiating it on first use.
    pub fn command(&mut self) -> BundleResult<&mut dyn Command> {
        let command = match self.command.take() {
            Some(command) => command,
            None => self.command_instance(&self.command_name)?,
        };

        Ok(&mut **self.command.insert(command))
    }

    /// Resolve `command_name` to a fresh instance without memoizing it.
    #[instrument(skip(self), fields(bundle = %self.name, invocation_id = %self.invocation_id))]
    pub fn command_instance(&self, command_name: &str) -> BundleResult<Box<dyn Command>> {
        let unit = self.unit_path(command_name);
        self.loader.load(&unit, &self.namespace)?;

        let class_name = self.class_name(command_name);
        let command = self.namespace.instantiate(&class_name)?;

        crate::log_bundle!(debug, "RESOLVED",
            bundle: self.name,
            invocation_id: self.invocation_id,
            command: command_name,
            unit: unit.relative,
            class_name: class_name
        );

        Ok(command)
    }

    /// Run the command, converting abort and stop outcomes into responses.
    ///
    /// Resolution failures and command errors are returned without sending
    /// anything.
    #[instrument(skip(self), fields(bundle = %self.name, command = %self.command_name, invocation_id = %self.invocation_id))]
    pub fn run_command(&mut self) -> BundleResult<()> {
        let command_name = self.command_name.clone();
        let outcome = self
            .command()?
            .execute()
            .map_err(|source| BundleError::CommandFailed {
                command: command_name.clone(),
                source,
            })?;

        crate::log_bundle!(info, "EXECUTED",
            bundle: self.name,
            invocation_id: self.invocation_id,
            command: command_name,
            outcome: outcome.as_str()
        );

        match outcome {
            CommandOutcome::Completed => Ok(()),
            CommandOutcome::Aborted(message) => {
                let mut response = Response::new();
                response.set_content(message);
                response.abort();
                response.send(self.transport.as_ref())
            }
            CommandOutcome::Stopped(message) => {
                let mut response = Response::new();
                response.insert(BODY_FIELD, message);
                response.send(self.transport.as_ref())
            }
        }
    }
}
