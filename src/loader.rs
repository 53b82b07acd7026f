//! # Implementation Unit Loading
//!
//! First phase of command resolution: make the code for a command identifier
//! available by loading its implementation unit into the bundle's namespace.
//! The second phase (class lookup and instantiation) happens in
//! [`Bundle`](crate::bundle::Bundle) against whatever the unit defined.
//!
//! Units live at `<base_dir>/lib/cog_cmd/<bundle_name>/<segments...>`, where
//! the segments are the command identifier split on `-`.
//!
//! [`UnitCatalog`] is the in-process loader: each unit is registered up front
//! under its relative path together with a function that defines its classes.
//!
//! ```rust
//! use cog_bundle::command::{factory, Command, CommandOutcome};
//! use cog_bundle::loader::UnitCatalog;
//!
//! struct Echo;
//!
//! impl Command for Echo {
//!     fn execute(&mut self) -> anyhow::Result<CommandOutcome> {
//!         Ok(CommandOutcome::Completed)
//!     }
//! }
//!
//! let catalog = UnitCatalog::new();
//! catalog.register_command("mybundle", "echo", factory(|| Echo));
//! assert!(catalog.contains("lib/cog_cmd/mybundle/echo"));
//! ```

use crate::classify::classify;
use crate::command::CommandFactory;
use crate::error::{BundleError, BundleResult};
use crate::namespace::Namespace;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Directory under the base directory that holds all bundle units
pub const UNIT_ROOT: [&str; 2] = ["lib", "cog_cmd"];

/// Location of an implementation unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitPath {
    pub base_dir: PathBuf,
    /// `lib/cog_cmd/<bundle>/<segments...>`
    pub relative: PathBuf,
}

impl UnitPath {
    /// Compute the unit path for `command_name` in `bundle_name`.
    ///
    /// Segments are split on `-`; a `/` inside a segment nests directories.
    /// Empty segments are skipped.
    pub fn for_command(base_dir: impl Into<PathBuf>, bundle_name: &str, command_name: &str) -> Self {
        Self {
            base_dir: base_dir.into(),
            relative: relative_unit_path(bundle_name, command_name),
        }
    }

    pub fn full_path(&self) -> PathBuf {
        self.base_dir.join(&self.relative)
    }
}

impl fmt::Display for UnitPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_path().display())
    }
}

fn relative_unit_path(bundle_name: &str, command_name: &str) -> PathBuf {
    let mut path: PathBuf = UNIT_ROOT.iter().collect();
    // a leading '/' would make push() replace the whole path
    let bundle_parts = bundle_name.split('/');
    let command_parts = command_name.split('-').flat_map(|segment| segment.split('/'));
    for part in bundle_parts.chain(command_parts).filter(|part| !part.is_empty()) {
        path.push(part);
    }
    path
}

/// Loads implementation units so their classes become defined in a namespace.
pub trait UnitLoader: Send + Sync {
    /// Load the unit at `unit`, defining its classes into `namespace`.
    ///
    /// Fails with [`BundleError::UnitNotFound`] when no unit exists there.
    fn load(&self, unit: &UnitPath, namespace: &Namespace) -> BundleResult<()>;
}

/// Function run when a unit is loaded; defines the unit's classes.
pub type UnitDefinition = Arc<dyn Fn(&Namespace) + Send + Sync>;

/// In-process unit loader keyed by relative unit path.
///
/// Loading a unit runs its definition at most once per namespace; later loads
/// of the same unit into the same namespace succeed without re-running it.
#[derive(Default)]
pub struct UnitCatalog {
    units: RwLock<HashMap<PathBuf, UnitDefinition>>,
    loaded: Mutex<HashSet<(String, PathBuf)>>,
}

impl fmt::Debug for UnitCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitCatalog")
            .field("units", &self.unit_paths())
            .field("loaded", &self.loaded.lock().len())
            .finish()
    }
}

impl UnitCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit under its relative path (e.g. `lib/cog_cmd/ops/deploy`).
    pub fn register_unit<F>(&self, relative: impl AsRef<Path>, definition: F)
    where
        F: Fn(&Namespace) + Send + Sync + 'static,
    {
        let relative = relative.as_ref().to_path_buf();
        debug!(unit = %relative.display(), "Registering implementation unit");
        self.units.write().insert(relative, Arc::new(definition));
    }

    /// Register a unit that defines a single command class.
    ///
    /// The unit path and class name are derived from `command_name` exactly
    /// as the resolver derives them.
    pub fn register_command(&self, bundle_name: &str, command_name: &str, factory: CommandFactory) {
        let class_name = classify(command_name);
        self.register_unit(relative_unit_path(bundle_name, command_name), move |namespace| {
            namespace.register(class_name.clone(), factory.clone());
        });
    }

    pub fn contains(&self, relative: impl AsRef<Path>) -> bool {
        self.units.read().contains_key(relative.as_ref())
    }

    /// Registered relative unit paths, sorted.
    pub fn unit_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.units.read().keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Whether `relative` has already been loaded into `namespace`.
    pub fn is_loaded(&self, relative: impl AsRef<Path>, namespace: &Namespace) -> bool {
        self.loaded
            .lock()
            .contains(&(namespace.qualified_name(), relative.as_ref().to_path_buf()))
    }
}

impl UnitLoader for UnitCatalog {
    fn load(&self, unit: &UnitPath, namespace: &Namespace) -> BundleResult<()> {
        let definition = self
            .units
            .read()
            .get(&unit.relative)
            .cloned()
            .ok_or_else(|| BundleError::UnitNotFound {
                path: unit.full_path(),
            })?;

        let key = (namespace.qualified_name(), unit.relative.clone());
        if !self.loaded.lock().insert(key) {
            debug!(unit = %unit, "Implementation unit already loaded");
            return Ok(());
        }

        definition(namespace);
        debug!(
            unit = %unit,
            namespace = %namespace.qualified_name(),
            "Loaded implementation unit"
        );
        Ok(())
    }
}
