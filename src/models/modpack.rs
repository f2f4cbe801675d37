use crate::models::mod_def::ModId;
use crate::utils::events::Listeners;
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// A mod as used inside one specific pack, with an independent
/// enabled/disabled flag. References live only inside their pack's set
/// and all mutation goes through pack methods, which is what makes
/// every change observable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModReference {
    pub id: ModId,
    pub enabled: bool,
}

impl ModReference {
    pub fn enabled(id: ModId) -> Self {
        Self { id, enabled: true }
    }

    pub fn disabled(id: ModId) -> Self {
        Self { id, enabled: false }
    }
}

/// Change notifications emitted by a [`Modpack`].
#[derive(Clone, Debug)]
pub enum PackEvent {
    RefAdded(ModId),
    RefRemoved(ModId),
    EnabledChanged { id: ModId, enabled: bool },
    Renamed { from: String, to: String },
}

/// A named collection of mod references plus the directory it
/// materializes into. Identity-based set semantics: at most one
/// reference per mod id, insertion order irrelevant.
pub struct Modpack {
    name: Mutex<String>,
    dir: Utf8PathBuf,
    refs: Mutex<BTreeMap<ModId, ModReference>>,
    listeners: Listeners<PackEvent>,
}

impl Modpack {
    pub fn new(name: impl Into<String>, dir: Utf8PathBuf) -> Self {
        Self {
            name: Mutex::new(name.into()),
            dir,
            refs: Mutex::new(BTreeMap::new()),
            listeners: Listeners::new(),
        }
    }

    pub fn name(&self) -> String {
        self.name.lock().clone()
    }

    pub fn rename(&self, to: impl Into<String>) {
        let to = to.into();
        let from = std::mem::replace(&mut *self.name.lock(), to.clone());
        self.listeners.emit(&PackEvent::Renamed { from, to });
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&PackEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(callback);
    }

    /// Inserts a reference, replacing any existing reference to the
    /// same mod.
    pub fn insert_ref(&self, reference: ModReference) {
        let id = reference.id.clone();
        self.refs.lock().insert(id.clone(), reference);
        self.listeners.emit(&PackEvent::RefAdded(id));
    }

    /// Removes the reference to `id`; returns whether it was present.
    pub fn remove_ref(&self, id: &ModId) -> bool {
        let removed = self.refs.lock().remove(id).is_some();
        if removed {
            self.listeners.emit(&PackEvent::RefRemoved(id.clone()));
        }
        removed
    }

    /// Flips the enabled flag on the reference to `id`. No side effect
    /// beyond notifying observers; returns whether the reference
    /// exists.
    pub fn set_enabled(&self, id: &ModId, enabled: bool) -> bool {
        let changed = {
            let mut refs = self.refs.lock();
            match refs.get_mut(id) {
                Some(reference) if reference.enabled != enabled => {
                    reference.enabled = enabled;
                    true
                }
                Some(_) => return true,
                None => return false,
            }
        };
        if changed {
            self.listeners.emit(&PackEvent::EnabledChanged {
                id: id.clone(),
                enabled,
            });
        }
        true
    }

    pub fn contains(&self, id: &ModId) -> bool {
        self.refs.lock().contains_key(id)
    }

    /// Snapshot of every reference in the pack.
    pub fn refs(&self) -> Vec<ModReference> {
        self.refs.lock().values().cloned().collect()
    }

    /// Snapshot of the enabled references, the resolver's seed set.
    pub fn enabled_refs(&self) -> Vec<ModReference> {
        self.refs
            .lock()
            .values()
            .filter(|r| r.enabled)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.refs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex as PlMutex;
    use semver::Version;
    use std::sync::Arc;

    fn id(name: &str) -> ModId {
        ModId::new(name, Version::new(1, 0, 0))
    }

    #[test]
    fn set_semantics_replace_same_mod() {
        let pack = Modpack::new("p", Utf8PathBuf::from("/tmp/p"));
        pack.insert_ref(ModReference::enabled(id("a")));
        pack.insert_ref(ModReference::disabled(id("a")));
        assert_eq!(pack.len(), 1);
        assert!(pack.enabled_refs().is_empty());
    }

    #[test]
    fn mutations_are_observable() {
        let pack = Modpack::new("p", Utf8PathBuf::from("/tmp/p"));
        let seen: Arc<PlMutex<Vec<String>>> = Arc::new(PlMutex::new(Vec::new()));
        let sink = seen.clone();
        pack.on_change(move |event| {
            sink.lock().push(format!("{event:?}"));
        });

        pack.insert_ref(ModReference::enabled(id("a")));
        pack.set_enabled(&id("a"), false);
        // same value again: no event
        pack.set_enabled(&id("a"), false);
        pack.remove_ref(&id("a"));

        let seen = seen.lock();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].contains("RefAdded"));
        assert!(seen[1].contains("EnabledChanged"));
        assert!(seen[2].contains("RefRemoved"));
    }

    #[test]
    fn set_enabled_on_unknown_ref_reports_absence() {
        let pack = Modpack::new("p", Utf8PathBuf::from("/tmp/p"));
        assert!(!pack.set_enabled(&id("ghost"), true));
    }
}
