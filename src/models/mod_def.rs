use crate::models::error::Error;
use crate::utils::version::parse_version;
use camino::{Utf8Path, Utf8PathBuf};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// File name of the manifest expected at the root of every mod source.
pub const MOD_MANIFEST_NAME: &str = "mod.json";

/// Identity of one concrete mod version.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModId {
    pub name: String,
    pub version: Version,
}

impl ModId {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// Stem used when the mod is materialized into a pack directory,
    /// e.g. `some-mod_1.2.0`. Archive mods append their file extension.
    pub fn dir_name(&self) -> String {
        format!("{}_{}", self.name, self.version)
    }

    /// Inverse of [`ModId::dir_name`]: parses `name_1.2.0` (with an
    /// optional archive extension) back into an id. Returns `None` for
    /// entries this crate does not manage, which reconciliation must
    /// leave alone.
    pub fn from_dir_name(entry: &str) -> Option<ModId> {
        let (name, rest) = entry.rsplit_once('_')?;
        if name.is_empty() {
            return None;
        }
        let version = Version::parse(rest).ok().or_else(|| {
            let (stem, _ext) = rest.rsplit_once('.')?;
            Version::parse(stem).ok()
        })?;
        Some(ModId {
            name: name.to_string(),
            version,
        })
    }
}

impl fmt::Display for ModId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyKind {
    Required,
    Conflicts,
}

/// A single dependency constraint declared by a mod: the target mod
/// name, an inclusive version range, and whether the target is required
/// or must NOT be present. Owned by the declaring [`Mod`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dependency {
    pub target: String,
    pub min: Option<Version>,
    pub max: Option<Version>,
    pub kind: DependencyKind,
}

impl Dependency {
    pub fn new(
        target: impl Into<String>,
        min: Option<Version>,
        max: Option<Version>,
        kind: DependencyKind,
    ) -> Result<Self, Error> {
        let target = target.into();
        if target.trim().is_empty() {
            return Err(Error::InvalidModDefinition(
                "dependency target must not be empty".to_string(),
            ));
        }
        if let (Some(min), Some(max)) = (&min, &max) {
            if min > max {
                return Err(Error::InvalidModDefinition(format!(
                    "dependency on '{target}' has an empty version range ({min} > {max})"
                )));
            }
        }
        Ok(Self {
            target,
            min,
            max,
            kind,
        })
    }

    /// Whether `version` falls inside the inclusive range.
    pub fn matches(&self, version: &Version) -> bool {
        self.min.as_ref().map_or(true, |min| version >= min)
            && self.max.as_ref().map_or(true, |max| version <= max)
    }

    /// Parses the textual dependency form used in mod manifests:
    /// `name`, `name >= 1.0.0`, `name >= 1.0.0 <= 2.0.0`,
    /// `name = 1.5.0`, and a leading `!` for a conflict constraint.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let mut rest = input.trim();

        let kind = match rest.strip_prefix('!') {
            Some(stripped) => {
                rest = stripped.trim_start();
                DependencyKind::Conflicts
            }
            None => DependencyKind::Required,
        };

        let mut tokens = rest.split_whitespace();
        let target = tokens
            .next()
            .ok_or_else(|| {
                Error::InvalidModDefinition(format!("empty dependency target in '{input}'"))
            })?
            .to_string();

        let mut min = None;
        let mut max = None;
        while let Some(op) = tokens.next() {
            let version = tokens.next().ok_or_else(|| {
                Error::InvalidModDefinition(format!("dangling operator '{op}' in '{input}'"))
            })?;
            let version =
                parse_version(version).map_err(|e| Error::InvalidModDefinition(e.to_string()))?;
            match op {
                ">=" => min = Some(version),
                "<=" => max = Some(version),
                "=" => {
                    min = Some(version.clone());
                    max = Some(version);
                }
                other => {
                    return Err(Error::InvalidModDefinition(format!(
                        "unknown operator '{other}' in '{input}'"
                    )))
                }
            }
        }

        Self::new(target, min, max, kind)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == DependencyKind::Conflicts {
            write!(f, "! ")?;
        }
        write!(f, "{}", self.target)?;
        if let Some(min) = &self.min {
            write!(f, " >= {min}")?;
        }
        if let Some(max) = &self.max {
            write!(f, " <= {max}")?;
        }
        Ok(())
    }
}

/// Serialized manifest at the root of a mod source directory.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ModManifest {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// A versioned unit of content with its declared constraints. Immutable
/// once loaded; the registry hands out shared `Arc<Mod>`s.
#[derive(Clone, Debug)]
pub struct Mod {
    pub id: ModId,
    /// Where the mod's content lives: a directory, or a single archive
    /// file.
    pub source: Utf8PathBuf,
    pub dependencies: Vec<Dependency>,
}

impl Mod {
    /// Validating constructor. No other component re-checks these
    /// fields, so every loading path must come through here.
    pub fn new(
        name: &str,
        version: &str,
        source: Utf8PathBuf,
        dependencies: Vec<Dependency>,
    ) -> Result<Self, Error> {
        if name.trim().is_empty() {
            return Err(Error::InvalidModDefinition(
                "mod name must not be empty".to_string(),
            ));
        }
        let version =
            parse_version(version).map_err(|e| Error::InvalidModDefinition(e.to_string()))?;
        Ok(Self {
            id: ModId::new(name.trim(), version),
            source,
            dependencies,
        })
    }

    /// Loads a mod from its source directory by reading the `mod.json`
    /// manifest at its root.
    pub fn load(source: &Utf8Path) -> Result<Self, Error> {
        let manifest_path = source.join(MOD_MANIFEST_NAME);
        let file = std::fs::File::open(&manifest_path)?;
        let manifest: ModManifest = serde_json::from_reader(file)
            .map_err(|e| Error::InvalidModDefinition(format!("{manifest_path}: {e}")))?;
        Self::from_manifest(manifest, source.to_path_buf())
    }

    pub fn from_manifest(manifest: ModManifest, source: Utf8PathBuf) -> Result<Self, Error> {
        let dependencies = manifest
            .dependencies
            .iter()
            .map(|raw| Dependency::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&manifest.name, &manifest.version, source, dependencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_required_dependency() {
        let dep = Dependency::parse("base-lib").unwrap();
        assert_eq!(dep.target, "base-lib");
        assert_eq!(dep.kind, DependencyKind::Required);
        assert!(dep.matches(&Version::new(0, 1, 0)));
    }

    #[test]
    fn parses_bounds_and_exact_pins() {
        let dep = Dependency::parse("core >= 1.2.0 <= 2.0.0").unwrap();
        assert!(!dep.matches(&Version::new(1, 1, 9)));
        assert!(dep.matches(&Version::new(1, 2, 0)));
        assert!(dep.matches(&Version::new(2, 0, 0)));
        assert!(!dep.matches(&Version::new(2, 0, 1)));

        let pinned = Dependency::parse("core = 1.5.0").unwrap();
        assert!(pinned.matches(&Version::new(1, 5, 0)));
        assert!(!pinned.matches(&Version::new(1, 5, 1)));
    }

    #[test]
    fn parses_conflict_marker() {
        let dep = Dependency::parse("! rival-mod >= 2.0.0").unwrap();
        assert_eq!(dep.kind, DependencyKind::Conflicts);
        assert!(dep.matches(&Version::new(2, 1, 0)));
        assert!(!dep.matches(&Version::new(1, 9, 0)));
    }

    #[test]
    fn rejects_malformed_dependencies() {
        assert!(matches!(
            Dependency::parse("core >="),
            Err(Error::InvalidModDefinition(_))
        ));
        assert!(matches!(
            Dependency::parse("core ~> 1.0.0"),
            Err(Error::InvalidModDefinition(_))
        ));
        assert!(matches!(
            Dependency::parse("core >= 2.0.0 <= 1.0.0"),
            Err(Error::InvalidModDefinition(_))
        ));
        assert!(matches!(
            Dependency::parse("!"),
            Err(Error::InvalidModDefinition(_))
        ));
    }

    #[test]
    fn mod_construction_validates_identity() {
        assert!(matches!(
            Mod::new("", "1.0.0", Utf8PathBuf::from("/tmp/x"), vec![]),
            Err(Error::InvalidModDefinition(_))
        ));
        assert!(matches!(
            Mod::new("thing", "not-a-version", Utf8PathBuf::from("/tmp/x"), vec![]),
            Err(Error::InvalidModDefinition(_))
        ));
    }

    #[test]
    fn dir_name_round_trips() {
        let id = ModId::new("some-mod", Version::new(1, 2, 0));
        assert_eq!(id.dir_name(), "some-mod_1.2.0");
        assert_eq!(ModId::from_dir_name("some-mod_1.2.0"), Some(id.clone()));
        assert_eq!(ModId::from_dir_name("some-mod_1.2.0.zip"), Some(id));
        assert_eq!(
            ModId::from_dir_name("under_scored_2.0.0").unwrap().name,
            "under_scored"
        );
        assert_eq!(ModId::from_dir_name("notes.txt"), None);
        assert_eq!(ModId::from_dir_name("_1.0.0"), None);
    }
}
