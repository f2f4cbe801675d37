use crate::models::mod_def::ModId;
use std::collections::BTreeSet;
use std::fmt;

/// A concrete set of mod versions satisfying every constraint reachable
/// from a pack's enabled mods. Immutable value object, produced fresh by
/// each resolver call; never cached, since the registry may change
/// between calls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    mods: BTreeSet<ModId>,
}

impl Solution {
    pub fn new(mods: BTreeSet<ModId>) -> Self {
        Self { mods }
    }

    pub fn mods(&self) -> impl Iterator<Item = &ModId> {
        self.mods.iter()
    }

    pub fn contains(&self, id: &ModId) -> bool {
        self.mods.contains(id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.mods.iter().any(|id| id.name == name)
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    pub fn into_mods(self) -> BTreeSet<ModId> {
        self.mods
    }
}

impl FromIterator<ModId> for Solution {
    fn from_iter<T: IntoIterator<Item = ModId>>(iter: T) -> Self {
        Self {
            mods: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for id in &self.mods {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{id}")?;
            first = false;
        }
        Ok(())
    }
}

/// Outcome of asking the user to pick between several valid solutions.
#[derive(Clone, Debug)]
pub enum SolutionChoice {
    Chosen(Solution),
    Cancelled,
}

/// Disambiguation collaborator, e.g. a choice dialog in the
/// presentation layer. Called only when a resolution yields more than
/// one solution.
pub trait SolutionPicker {
    fn pick(&self, solutions: &[Solution]) -> SolutionChoice;
}
