//! The model name table: the `models_mutex` analogue. Guards only the
//! `name -> Arc<Model>` map itself; a model's own index lock is always
//! acquired (if at all) after this lock has been released.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::model::{Model, ModelIndex};
use crate::sync::{Arc, Mutex};
use crate::urlencode::model_filename;

/// Owns every named model's backing file location and tracks live handles
/// so repeated opens of the same name share one [`Model`].
pub struct ModelRegistry {
    dir: Option<PathBuf>,
    compaction_threshold: usize,
    named: Mutex<HashMap<Vec<u8>, Arc<Model>>>,
}

impl ModelRegistry {
    /// Creates a registry rooted at `dir`. `dir == None` makes every model
    /// (named or anonymous) purely in-memory.
    #[must_use]
    pub fn new(dir: Option<PathBuf>, compaction_threshold: usize) -> Self {
        ModelRegistry {
            dir,
            compaction_threshold,
            named: Mutex::new(HashMap::new()),
        }
    }

    /// The compaction threshold new and reopened models are configured
    /// with.
    #[must_use]
    pub fn compaction_threshold(&self) -> usize {
        self.compaction_threshold
    }

    /// Opens the named model `name`, creating it if it doesn't exist yet.
    /// Concurrent opens of the same name return clones of the same
    /// `Arc<Model>`.
    pub fn open_named(&self, name: &[u8]) -> Result<Arc<Model>> {
        let mut named = self.named.lock();
        if let Some(existing) = named.get(name) {
            return Ok(Arc::clone(existing));
        }
        let path = self.dir.as_ref().map(|d| d.join(model_filename(name)));
        let index = ModelIndex::open(path.as_deref())?;
        let model = Arc::new(Model::new(Some(name.to_vec()), index));
        named.insert(name.to_vec(), Arc::clone(&model));
        tracing::debug!(name = %String::from_utf8_lossy(name), "opened named model");
        Ok(model)
    }

    /// Opens a fresh anonymous model, backed purely by memory. Anonymous
    /// models are never entered into the name table: nothing else can look
    /// one up by name, so there is nothing for this registry's lock to
    /// protect for them beyond their own creation.
    pub fn open_anonymous(&self) -> Result<Arc<Model>> {
        let index = ModelIndex::open(None)?;
        Ok(Arc::new(Model::new(None, index)))
    }

    /// Closes a handle to `model`. Named models are dropped from the name
    /// table once this was the last live handle; if the model is then
    /// empty, its backing file is deleted. Anonymous models have no
    /// shared state to clean up beyond the `Arc` itself.
    pub fn close(&self, model: Arc<Model>) -> Result<()> {
        let Some(name) = model.name().map(<[u8]>::to_vec) else {
            drop(model);
            return Ok(());
        };

        let mut named = self.named.lock();
        drop(model);

        let last_handle = named
            .get(&name)
            .is_some_and(|arc| Arc::strong_count(arc) == 1);
        if !last_handle {
            return Ok(());
        }
        if let Some(arc) = named.remove(&name) {
            let deleted_file = arc.is_empty();
            if deleted_file {
                arc.index.lock().delete()?;
            }
            tracing::debug!(
                name = %String::from_utf8_lossy(&name),
                deleted_file,
                "closed last handle to named model"
            );
        }
        Ok(())
    }

    /// Merges every triple of `src` into `dst`. A no-op if both names
    /// resolve to the same model. Locks are always acquired in ascending
    /// address order, so this can never deadlock against a concurrent
    /// `absorb` of the same two models in the opposite direction.
    pub fn absorb(&self, dst: &Arc<Model>, src: &Arc<Model>) -> Result<()> {
        if Arc::ptr_eq(dst, src) {
            return Ok(());
        }
        let dst_addr = Arc::as_ptr(dst) as usize;
        let src_addr = Arc::as_ptr(src) as usize;
        if dst_addr < src_addr {
            let mut d = dst.index.lock();
            let s = src.index.lock();
            d.absorb(&s)
        } else {
            let s = src.index.lock();
            let mut d = dst.index.lock();
            d.absorb(&s)
        }
    }

    /// Compacts `model`'s backing log if it has crossed this registry's
    /// configured threshold. Called after every mutating operation on a
    /// model.
    pub fn maybe_compact(&self, model: &Model) -> Result<()> {
        model.maybe_compact(self.compaction_threshold)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
