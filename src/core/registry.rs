use crate::models::error::Error;
use crate::models::mod_def::{Mod, ModId, MOD_MANIFEST_NAME};
use camino::Utf8Path;
use semver::Version;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Registry of every mod available for installation, keyed by name and
/// version.
///
/// Read-only from the resolver's perspective: a resolution in flight
/// over a registry that is being mutated elsewhere sees a
/// stale-but-consistent snapshot, which is acceptable because
/// recomputation is always safe. Callers hold the store's read lock for
/// the duration of a single resolution.
#[derive(Default)]
pub struct ModRegistry {
    mods: BTreeMap<String, BTreeMap<Version, Arc<Mod>>>,
}

impl ModRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a mod, replacing any previous entry with the same
    /// identity, and returns the shared handle.
    pub fn insert(&mut self, definition: Mod) -> Arc<Mod> {
        let shared = Arc::new(definition);
        self.mods
            .entry(shared.id.name.clone())
            .or_default()
            .insert(shared.id.version.clone(), shared.clone());
        shared
    }

    pub fn get(&self, id: &ModId) -> Option<Arc<Mod>> {
        self.mods.get(&id.name)?.get(&id.version).cloned()
    }

    pub fn contains(&self, id: &ModId) -> bool {
        self.get(id).is_some()
    }

    /// Every available version of `name`, newest first.
    pub fn versions_of(&self, name: &str) -> Vec<Arc<Mod>> {
        self.mods
            .get(name)
            .map(|versions| versions.values().rev().cloned().collect())
            .unwrap_or_default()
    }

    /// Total number of registered mod versions.
    pub fn len(&self) -> usize {
        self.mods.values().map(|versions| versions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    /// Scans `root` for mods: every immediate subdirectory holding a
    /// `mod.json` manifest is loaded. Malformed mods are logged and
    /// skipped, never fatal to the scan. Returns how many mods were
    /// registered.
    pub fn scan_dir(&mut self, root: &Utf8Path) -> Result<usize, Error> {
        let mut loaded = 0;

        for entry in root.read_dir_utf8()? {
            let entry = entry?;
            let path = entry.path();
            if !path.join(MOD_MANIFEST_NAME).is_file() {
                continue;
            }
            match Mod::load(path) {
                Ok(definition) => {
                    debug!("registered mod {}", definition.id);
                    self.insert(definition);
                    loaded += 1;
                }
                Err(e) => warn!("skipping mod at {path}: {e}"),
            }
        }

        Ok(loaded)
    }
}
