use crate::core::registry::ModRegistry;
use crate::models::error::Error;
use crate::models::modpack::Modpack;
use crate::utils::events::Listeners;
use crate::utils::file;
use camino::Utf8PathBuf;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{info, warn};

/// Change notifications for the observed pack set.
#[derive(Clone, Debug)]
pub enum StoreEvent {
    PackAdded(String),
    PackRemoved(String),
}

/// Owner of the observable pack set and the registry of available mods.
///
/// Constructed explicitly and shared via `Arc` (dependency injection);
/// there is deliberately no global instance, which keeps the resolver
/// and installer testable in isolation. How packs and mods are
/// persisted is the business of an external collaborator; it feeds
/// loaded state in through [`Datastore::adopt_pack`] and the registry
/// handle.
pub struct Datastore {
    packs_root: Utf8PathBuf,
    registry: RwLock<ModRegistry>,
    packs: Mutex<Vec<Arc<Modpack>>>,
    listeners: Listeners<StoreEvent>,
}

impl Datastore {
    pub fn new(packs_root: Utf8PathBuf) -> Self {
        Self {
            packs_root,
            registry: RwLock::new(ModRegistry::new()),
            packs: Mutex::new(Vec::new()),
            listeners: Listeners::new(),
        }
    }

    pub fn registry(&self) -> &RwLock<ModRegistry> {
        &self.registry
    }

    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(callback);
    }

    /// Snapshot of the current pack set.
    pub fn packs(&self) -> Vec<Arc<Modpack>> {
        self.packs.lock().clone()
    }

    pub fn find_pack(&self, name: &str) -> Option<Arc<Modpack>> {
        self.packs.lock().iter().find(|p| p.name() == name).cloned()
    }

    /// Creates the backing directory and the pack, and returns the pack
    /// synchronously, after the `PackAdded` event has fired. Callers
    /// can therefore select the new pack right away; there is no
    /// asynchronous rebuild to wait for.
    pub fn create_pack(&self, name: &str) -> Result<Arc<Modpack>, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::ParseError("pack name must not be empty".to_string()));
        }
        if self.find_pack(name).is_some() {
            return Err(Error::PackExists(name.to_string()));
        }

        let dir = self.packs_root.join(name);
        std::fs::create_dir_all(&dir)?;
        let pack = Arc::new(Modpack::new(name, dir));
        self.packs.lock().push(pack.clone());
        info!("created pack '{name}'");
        self.listeners.emit(&StoreEvent::PackAdded(name.to_string()));
        Ok(pack)
    }

    /// Attaches a pack materialized elsewhere (the persistence
    /// collaborator loading saved state).
    pub fn adopt_pack(&self, pack: Modpack) -> Result<Arc<Modpack>, Error> {
        let name = pack.name();
        if self.find_pack(&name).is_some() {
            return Err(Error::PackExists(name));
        }
        let pack = Arc::new(pack);
        self.packs.lock().push(pack.clone());
        self.listeners.emit(&StoreEvent::PackAdded(name));
        Ok(pack)
    }

    /// Removes the pack from the observed set synchronously, then
    /// deletes its directory tree best-effort: individual file errors
    /// are logged and counted, never aborting the removal. Returns the
    /// number of entries that could not be deleted.
    pub fn remove_pack(&self, name: &str) -> Result<usize, Error> {
        let pack = {
            let mut packs = self.packs.lock();
            let index = packs
                .iter()
                .position(|p| p.name() == name)
                .ok_or_else(|| Error::PackNotFound(name.to_string()))?;
            packs.remove(index)
        };
        self.listeners
            .emit(&StoreEvent::PackRemoved(name.to_string()));

        let failed = if pack.dir().exists() {
            file::remove_tree_best_effort(pack.dir())
        } else {
            0
        };
        if failed > 0 {
            warn!("removed pack '{name}', but {failed} entries could not be deleted");
        } else {
            info!("removed pack '{name}'");
        }
        Ok(failed)
    }
}
