#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use packbound::core::registry::ModRegistry;
use packbound::models::mod_def::{Mod, ModId};
use packbound::models::modpack::{ModReference, Modpack};
use std::fs;
use tempfile::TempDir;

/// Creates a temp environment with a mod source root and a packs root.
pub fn setup_test_env() -> (TempDir, Utf8PathBuf, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8Path::from_path(tmp.path())
        .expect("utf-8 tempdir")
        .to_path_buf();
    let mods_root = root.join("mods");
    let packs_root = root.join("packs");
    fs::create_dir_all(&mods_root).unwrap();
    fs::create_dir_all(&packs_root).unwrap();
    (tmp, mods_root, packs_root)
}

/// Writes a mod source directory with a manifest and one payload file,
/// and returns the parsed Mod.
pub fn create_test_mod(mods_root: &Utf8Path, name: &str, version: &str, deps: &[&str]) -> Mod {
    let dir = mods_root.join(format!("{name}_{version}"));
    fs::create_dir_all(&dir).unwrap();
    let deps_json = deps
        .iter()
        .map(|d| format!("\"{d}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let manifest = format!(
        r#"{{"name": "{name}", "version": "{version}", "dependencies": [{deps_json}]}}"#
    );
    fs::write(dir.join("mod.json"), manifest).unwrap();
    fs::write(dir.join("payload.txt"), format!("{name} {version}")).unwrap();
    Mod::load(&dir).expect("valid test mod")
}

/// Builds a registry from `(name, version, dependencies)` triples,
/// creating each mod's source directory under `mods_root`.
pub fn registry_with(mods_root: &Utf8Path, specs: &[(&str, &str, &[&str])]) -> ModRegistry {
    let mut registry = ModRegistry::new();
    for (name, version, deps) in specs {
        registry.insert(create_test_mod(mods_root, name, version, deps));
    }
    registry
}

/// Creates a pack directory and a pack with the given mods enabled.
pub fn pack_with(packs_root: &Utf8Path, name: &str, enabled: &[ModId]) -> Modpack {
    let dir = packs_root.join(name);
    fs::create_dir_all(&dir).unwrap();
    let pack = Modpack::new(name, dir);
    for id in enabled {
        pack.insert_ref(ModReference::enabled(id.clone()));
    }
    pack
}

/// Sorted names of the entries currently in a directory.
pub fn dir_entries(dir: &Utf8Path) -> Vec<String> {
    let mut names: Vec<String> = dir
        .read_dir_utf8()
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string())
        .collect();
    names.sort();
    names
}
