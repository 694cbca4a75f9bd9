//! The public API facade: wires together the node store, the triple
//! store, and the model registry into one handle.

use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::model::{Model, ModelRegistry};
use crate::nid::{Nid, Triple};
use crate::node_store::NodeStore;
use crate::sync::Arc;
use crate::triple_store::TripleStore;

/// A handle onto one triple store: node/triple interning plus any number
/// of named or anonymous models.
///
/// Every method here matches one operation of the underlying store;
/// concurrent calls from multiple threads are safe, subject to the lock
/// ordering documented on [`crate::node_store`], [`crate::triple_store`]
/// and [`crate::model`].
pub struct TripleDb {
    nodes: NodeStore,
    triples: TripleStore,
    models: ModelRegistry,
}

impl TripleDb {
    /// Opens a store configured by `config`. `config.storage.in_memory_only`
    /// opens every component purely in memory, ignoring `data_dir`.
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        let dir = if config.storage.in_memory_only {
            None
        } else {
            std::fs::create_dir_all(&config.storage.data_dir)?;
            Some(config.storage.data_dir.as_path())
        };
        Self::open_at(dir, config.storage.model_log_compaction_threshold)
    }

    /// Opens a store rooted at `dir` directly, bypassing [`Config`].
    /// `dir == None` opens a purely in-memory store.
    pub fn open_at(dir: Option<&Path>, model_log_compaction_threshold: usize) -> Result<Self> {
        let db = TripleDb {
            nodes: NodeStore::open(dir)?,
            triples: TripleStore::open(dir)?,
            models: ModelRegistry::new(
                dir.map(Path::to_path_buf),
                model_log_compaction_threshold,
            ),
        };
        tracing::debug!(
            dir = ?dir,
            nodes = db.node_count(),
            triples = db.triple_count(),
            "opened store"
        );
        Ok(db)
    }

    /// Interns a byte-string node, returning a stable NID.
    pub fn identify_node(&self, payload: &[u8]) -> Result<Nid> {
        self.nodes.identify(payload)
    }

    /// Resolves a node NID to its stored payload.
    pub fn resolve_node(&self, nid: Nid) -> Result<Vec<u8>> {
        self.nodes.resolve(nid)
    }

    /// Resolves a node NID into a caller-supplied buffer.
    pub fn resolve_node_into(&self, nid: Nid, buf: &mut [u8]) -> Result<usize> {
        self.nodes.resolve_into(nid, buf)
    }

    /// Interns a triple of (already-interned) node or triple NIDs,
    /// returning a stable NID for the triple itself.
    pub fn identify_triple(&self, triple: Triple) -> Result<Nid> {
        self.triples.identify(triple)
    }

    /// Resolves a triple NID to the triple it names.
    pub fn resolve_triple(&self, nid: Nid) -> Result<Triple> {
        self.triples.resolve(nid)
    }

    /// Opens the named model `name`, creating it if necessary.
    pub fn open_model(&self, name: &[u8]) -> Result<Arc<Model>> {
        self.models.open_named(name)
    }

    /// Opens a fresh anonymous model.
    pub fn open_anonymous_model(&self) -> Result<Arc<Model>> {
        self.models.open_anonymous()
    }

    /// Closes a handle to `model`.
    pub fn close_model(&self, model: Arc<Model>) -> Result<()> {
        self.models.close(model)
    }

    /// Interns `triple` and adds it to `model`.
    ///
    /// Returns `true` if the triple was already present in `model`.
    pub fn add_triple(&self, model: &Model, triple: Triple) -> Result<bool> {
        let nid = self.triples.identify(triple)?;
        let existed = model.add_triple(nid.index, triple)?;
        self.models.maybe_compact(model)?;
        Ok(existed)
    }

    /// Removes `triple` from `model`, if present. Does not un-intern the
    /// triple itself: other models may still reference it, and a removed
    /// triple's NID remains stable if it is ever re-added.
    ///
    /// Returns `true` if the triple was present.
    pub fn remove_triple(&self, model: &Model, triple: Triple) -> Result<bool> {
        let nid = self.triples.identify(triple)?;
        let removed = model.remove_triple(nid.index, triple)?;
        self.models.maybe_compact(model)?;
        Ok(removed)
    }

    /// Finds the next triple in `model` matching `pattern`, with index
    /// strictly greater than `previous` (pass `Nid::NULL` to start from
    /// the beginning).
    #[must_use]
    pub fn find_triple(&self, model: &Model, pattern: &Triple, previous: Nid) -> Option<Nid> {
        model.find_triple(pattern, previous.index)
    }

    /// Removes every triple from `model`, returning how many were
    /// removed.
    pub fn empty_model(&self, model: &Model) -> Result<usize> {
        model.empty()
    }

    /// Merges every triple of `src` into `dst`, leaving `src` untouched.
    pub fn absorb_model(&self, dst: &Arc<Model>, src: &Arc<Model>) -> Result<()> {
        self.models.absorb(dst, src)
    }

    /// Number of interned nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of interned triples.
    #[must_use]
    pub fn triple_count(&self) -> usize {
        self.triples.len()
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
