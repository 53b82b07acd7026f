//! # Command Namespaces
//!
//! Process-wide registry of per-bundle namespaces that command classes are
//! defined into.
//!
//! ## Architecture
//!
//! ```text
//! NamespaceRegistry (CogCmd)
//! ├── Namespace CogCmd::Mybundle
//! │   ├── Echo            -> CommandFactory
//! │   └── Sub::Cmd        -> CommandFactory
//! └── Namespace CogCmd::Ops
//!     └── Deploy          -> CommandFactory
//! ```
//!
//! Namespaces are keyed by the classified bundle name and created at most once.
//! Every [`Bundle`](crate::bundle::Bundle) built for the same bundle name gets
//! the same `Arc<Namespace>`, which is what lets a unit loaded by one bundle be
//! looked up by another.
//!
//! ## Usage
//!
//! ```rust
//! use cog_bundle::namespace::NamespaceRegistry;
//! use std::sync::Arc;
//!
//! let registry = NamespaceRegistry::new();
//! let first = registry.get_or_create("my_bundle");
//! let second = registry.get_or_create("my_bundle");
//!
//! assert!(Arc::ptr_eq(&first, &second));
//! assert_eq!(first.qualified_name(), "CogCmd::MyBundle");
//! ```

use crate::classify::{classify, NAMESPACE_SEPARATOR};
use crate::command::{Command, CommandFactory};
use crate::error::{BundleError, BundleResult};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Name of the root container all bundle namespaces live under
pub const ROOT_NAMESPACE: &str = "CogCmd";

static GLOBAL_REGISTRY: OnceLock<NamespaceRegistry> = OnceLock::new();

/// Class table for a single bundle.
pub struct Namespace {
    /// Classified bundle name (e.g. `MyBundle`)
    name: String,
    classes: RwLock<HashMap<String, CommandFactory>>,
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.qualified_name())
            .field("classes", &self.class_names())
            .finish()
    }
}

impl Namespace {
    fn new(name: String) -> Self {
        Self {
            name,
            classes: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified name, including the root container.
    pub fn qualified_name(&self) -> String {
        format!("{ROOT_NAMESPACE}{NAMESPACE_SEPARATOR}{}", self.name)
    }

    /// Define a command class in this namespace.
    ///
    /// Defining an existing class name replaces its factory.
    pub fn register(&self, class_name: impl Into<String>, factory: CommandFactory) {
        let class_name = class_name.into();
        let replaced = self
            .classes
            .write()
            .insert(class_name.clone(), factory)
            .is_some();

        crate::log_registry!(debug, "Command class defined",
            namespace: self.qualified_name(),
            name: class_name,
            replaced: replaced
        );
    }

    pub fn is_defined(&self, class_name: &str) -> bool {
        self.classes.read().contains_key(class_name)
    }

    /// Construct a new instance of a defined command class.
    pub fn instantiate(&self, class_name: &str) -> BundleResult<Box<dyn Command>> {
        let factory = self
            .classes
            .read()
            .get(class_name)
            .cloned()
            .ok_or_else(|| BundleError::CommandNotDefined {
                class_name: class_name.to_string(),
                namespace: self.qualified_name(),
            })?;

        Ok(factory())
    }

    /// Defined class names, sorted.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Root container mapping classified bundle names to their namespaces.
#[derive(Debug, Default)]
pub struct NamespaceRegistry {
    namespaces: DashMap<String, Arc<Namespace>>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry, created on first use.
    pub fn global() -> &'static NamespaceRegistry {
        GLOBAL_REGISTRY.get_or_init(NamespaceRegistry::new)
    }

    /// Return the namespace for `bundle_name`, creating it if absent.
    pub fn get_or_create(&self, bundle_name: &str) -> Arc<Namespace> {
        let module_name = classify(bundle_name);

        self.namespaces
            .entry(module_name.clone())
            .or_insert_with(|| {
                debug!(
                    bundle = bundle_name,
                    namespace = %module_name,
                    "Creating bundle namespace"
                );
                Arc::new(Namespace::new(module_name))
            })
            .value()
            .clone()
    }

    /// Look up an existing namespace without creating it.
    pub fn get(&self, bundle_name: &str) -> Option<Arc<Namespace>> {
        self.namespaces
            .get(&classify(bundle_name))
            .map(|entry| entry.value().clone())
    }

    /// Classified names of all namespaces, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .namespaces
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}
