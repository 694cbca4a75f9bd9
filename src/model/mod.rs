//! Named and anonymous models: each owns its own permutation index and its
//! own lock, entirely independent of every other model's lock. The
//! `models_mutex` analogue (see [`registry::ModelRegistry`]) is only ever
//! held to look up, insert or remove a model from the name table — never
//! while a model's own index lock is held.

mod index;
mod registry;

pub use index::ModelIndex;
pub use registry::ModelRegistry;

use crate::error::Result;
use crate::nid::{Nid, Triple};
use crate::sync::Mutex;

/// A single model: a named or anonymous collection of triples, queryable
/// by wildcard pattern.
pub struct Model {
    name: Option<Vec<u8>>,
    index: Mutex<ModelIndex>,
}

impl Model {
    fn new(name: Option<Vec<u8>>, index: ModelIndex) -> Self {
        Model {
            name,
            index: Mutex::new(index),
        }
    }

    /// The model's name, if any. `None` for anonymous models.
    #[must_use]
    pub fn name(&self) -> Option<&[u8]> {
        self.name.as_deref()
    }

    /// Adds `triple` (already interned as `index`) to this model.
    ///
    /// Returns `true` if the triple was already present.
    pub fn add_triple(&self, index: u32, triple: Triple) -> Result<bool> {
        self.index.lock().add(index, triple)
    }

    /// Removes `triple` (interned as `index`) from this model.
    ///
    /// Returns `true` if the triple was present.
    pub fn remove_triple(&self, index: u32, triple: Triple) -> Result<bool> {
        self.index.lock().remove(index, triple)
    }

    /// Finds the next triple matching `pattern` with index strictly
    /// greater than `after`.
    #[must_use]
    pub fn find_triple(&self, pattern: &Triple, after: u32) -> Option<Nid> {
        self.index.lock().find(pattern, after)
    }

    /// Removes every triple from this model, returning how many were
    /// removed.
    pub fn empty(&self) -> Result<usize> {
        self.index.lock().empty()
    }

    /// Number of distinct triples currently stored in this model.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.lock().len()
    }

    /// True if this model currently holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.lock().is_empty()
    }

    pub(crate) fn maybe_compact(&self, threshold: usize) -> Result<()> {
        let mut index = self.index.lock();
        if index.needs_compaction(threshold) {
            index.compact()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
