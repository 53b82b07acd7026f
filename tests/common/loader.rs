use cog_bundle::{BundleResult, Namespace, UnitCatalog, UnitLoader, UnitPath};
use parking_lot::Mutex;
use std::path::PathBuf;

/// Loader that records each requested unit before delegating to a catalog.
#[derive(Debug, Default)]
pub struct RecordingLoader {
    pub catalog: UnitCatalog,
    requests: Mutex<Vec<UnitPath>>,
}

impl RecordingLoader {
    pub fn new(catalog: UnitCatalog) -> Self {
        Self {
            catalog,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requested_paths(&self) -> Vec<PathBuf> {
        self.requests
            .lock()
            .iter()
            .map(|unit| unit.relative.clone())
            .collect()
    }
}

impl UnitLoader for RecordingLoader {
    fn load(&self, unit: &UnitPath, namespace: &Namespace) -> BundleResult<()> {
        self.requests.lock().push(unit.clone());
        self.catalog.load(unit, namespace)
    }
}
