use crate::core::registry::ModRegistry;
use crate::models::mod_def::{DependencyKind, Mod, ModId};
use crate::models::modpack::Modpack;
use crate::models::solution::Solution;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

/// Computes every set of available mods that satisfies the dependency
/// constraints of `pack`'s enabled references.
///
/// The search is exhaustive and deterministic: unmet requirements are
/// processed in target-name order, and candidate versions are tried
/// newest first, so the first returned solution prefers the highest
/// versions. Identical candidate sets reached through different
/// branches are deduplicated. Zero solutions is a normal empty result
/// the caller must branch on, never an error.
///
/// Pure and read-only over pack and registry: safe to call repeatedly
/// and concurrently, and calling twice against an unchanged registry
/// yields identical ordered results.
pub fn resolve(pack: &Modpack, registry: &ModRegistry) -> Vec<Solution> {
    // Seeds are pinned to the exact version the pack references; a
    // missing seed cannot be substituted, so every branch dies.
    let mut chosen: BTreeMap<String, Arc<Mod>> = BTreeMap::new();
    for reference in pack.enabled_refs() {
        let Some(seed) = registry.get(&reference.id) else {
            return Vec::new();
        };
        if !compatible(&chosen, &seed) {
            return Vec::new();
        }
        chosen.insert(seed.id.name.clone(), seed);
    }

    let mut search = Search {
        registry,
        solutions: Vec::new(),
        seen: HashSet::new(),
    };
    search.explore(&mut chosen);
    search.solutions
}

struct Search<'a> {
    registry: &'a ModRegistry,
    solutions: Vec<Solution>,
    seen: HashSet<BTreeSet<ModId>>,
}

impl Search<'_> {
    /// Depth-first over branch points. `chosen` maps mod name to the
    /// version fixed in the current branch; at most one version per
    /// name can ever be selected.
    fn explore(&mut self, chosen: &mut BTreeMap<String, Arc<Mod>>) {
        // First unmet requirement, smallest target name first. Iterating
        // a BTreeMap keeps this deterministic.
        let next = chosen
            .values()
            .flat_map(|m| m.dependencies.iter())
            .filter(|d| d.kind == DependencyKind::Required)
            .filter(|d| !chosen.contains_key(&d.target))
            .map(|d| d.target.clone())
            .min();

        let Some(target) = next else {
            let candidate: BTreeSet<ModId> = chosen.values().map(|m| m.id.clone()).collect();
            if self.seen.insert(candidate.clone()) {
                self.solutions.push(Solution::new(candidate));
            }
            return;
        };

        // versions_of is newest-first, which gives the highest-version
        // preference of the first solution found.
        for candidate in self.registry.versions_of(&target) {
            if !compatible(chosen, &candidate) {
                continue;
            }
            chosen.insert(target.clone(), candidate);
            self.explore(chosen);
            chosen.remove(&target);
        }
        // No satisfying version: this branch is discarded, not reported
        // as a partial solution.
    }
}

/// Whether `candidate` can join the current branch without violating
/// any constraint, in either direction.
fn compatible(chosen: &BTreeMap<String, Arc<Mod>>, candidate: &Mod) -> bool {
    if let Some(existing) = chosen.get(&candidate.id.name) {
        // Same mod already fixed: only the identical version is
        // admissible (its constraints were checked on insertion).
        return existing.id.version == candidate.id.version;
    }

    for dep in &candidate.dependencies {
        if let Some(existing) = chosen.get(&dep.target) {
            let in_range = dep.matches(&existing.id.version);
            match dep.kind {
                DependencyKind::Required if !in_range => return false,
                DependencyKind::Conflicts if in_range => return false,
                _ => {}
            }
        }
    }

    for fixed in chosen.values() {
        for dep in &fixed.dependencies {
            if dep.target != candidate.id.name {
                continue;
            }
            let in_range = dep.matches(&candidate.id.version);
            match dep.kind {
                DependencyKind::Required if !in_range => return false,
                DependencyKind::Conflicts if in_range => return false,
                _ => {}
            }
        }
    }

    true
}
