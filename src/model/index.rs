//! The permutation index backing a single model: an ordered set of
//! `(masked triple, triple index)` keys, eight entries per stored triple
//! (one per subset of "concrete" positions), letting any wildcard pattern
//! query be answered with a single ordered range scan.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::nid::{Nid, Triple};
use crate::storage::RecordLog;

/// All eight subsets of `{subject, predicate, object}`, smallest mask
/// (all-wildcard) first.
const SUBSETS: [u8; 8] = [0b000, 0b001, 0b010, 0b011, 0b100, 0b101, 0b110, 0b111];

/// One entry in the permutation index: the triple masked down to one
/// subset of concrete positions, paired with the triple's own index so
/// that entries for the same masked pattern are secondarily ordered by
/// insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PermKey {
    masked: Triple,
    index: u32,
}

impl PermKey {
    fn encode(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..12].copy_from_slice(&self.masked.pack());
        out[12..].copy_from_slice(&self.index.to_le_bytes());
        out
    }

    fn decode(bytes: &[u8; 16]) -> Self {
        let mut packed = [0u8; 12];
        packed.copy_from_slice(&bytes[..12]);
        let mut idx_buf = [0u8; 4];
        idx_buf.copy_from_slice(&bytes[12..]);
        PermKey {
            masked: Triple::unpack(&packed),
            index: u32::from_le_bytes(idx_buf),
        }
    }
}

const OP_REMOVE: u8 = 0;
const OP_INSERT: u8 = 1;

fn encode_op(op: u8, key: &PermKey) -> [u8; 17] {
    let mut out = [0u8; 17];
    out[0] = op;
    out[1..].copy_from_slice(&key.encode());
    out
}

/// An ordered permutation index over one model's triples.
pub struct ModelIndex {
    log: RecordLog,
    map: BTreeMap<PermKey, ()>,
    /// Number of insert/remove operations appended since the last
    /// compaction; drives the compaction threshold.
    ops_since_compaction: usize,
}

impl ModelIndex {
    /// Opens (or creates) the index file at `path`. `path == None` opens a
    /// purely in-memory index (anonymous models).
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let log = RecordLog::open(path)?;
        let mut map = BTreeMap::new();
        let mut ops = 0usize;
        for raw in log.replay()? {
            ops += 1;
            if raw.len() != 17 {
                continue;
            }
            let op = raw[0];
            let mut key_bytes = [0u8; 16];
            key_bytes.copy_from_slice(&raw[1..]);
            let key = PermKey::decode(&key_bytes);
            match op {
                OP_INSERT => {
                    map.insert(key, ());
                }
                OP_REMOVE => {
                    map.remove(&key);
                }
                _ => {}
            }
        }
        Ok(ModelIndex {
            log,
            map,
            ops_since_compaction: ops,
        })
    }

    /// Inserts `triple` (already interned as `index`) into this model.
    ///
    /// Returns `true` if the triple was already present in this model
    /// (determined from the *first* of the eight permutation-key
    /// insertions, matching every other one since a stored triple's
    /// identity is fixed once it is first inserted).
    pub fn add(&mut self, index: u32, triple: Triple) -> Result<bool> {
        let mut already_present = None;
        for &mask in &SUBSETS {
            let key = PermKey {
                masked: triple.masked(mask),
                index,
            };
            self.log.append(&encode_op(OP_INSERT, &key))?;
            let existed = self.map.insert(key, ()).is_some();
            if already_present.is_none() {
                already_present = Some(existed);
            }
        }
        self.ops_since_compaction += 8;
        Ok(already_present.unwrap_or(false))
    }

    /// Removes `triple` (interned as `index`) from this model, if present.
    ///
    /// Returns `true` if the triple was present (and is now removed).
    pub fn remove(&mut self, index: u32, triple: Triple) -> Result<bool> {
        let mut was_present = None;
        for &mask in &SUBSETS {
            let key = PermKey {
                masked: triple.masked(mask),
                index,
            };
            self.log.append(&encode_op(OP_REMOVE, &key))?;
            let existed = self.map.remove(&key).is_some();
            if was_present.is_none() {
                was_present = Some(existed);
            }
        }
        self.ops_since_compaction += 8;
        Ok(was_present.unwrap_or(false))
    }

    /// Finds the next triple matching `pattern` with index strictly
    /// greater than `after` (use `0` to start from the beginning).
    /// `pattern` may contain wildcard (null) positions.
    ///
    /// Returns the matching triple's NID, or `None` if exhausted.
    #[must_use]
    pub fn find(&self, pattern: &Triple, after: u32) -> Option<Nid> {
        let seek = PermKey {
            masked: *pattern,
            index: after.saturating_add(1),
        };
        let (key, ()) = self.map.range(seek..).next()?;
        if key.masked == *pattern {
            Some(Nid::triple(key.index))
        } else {
            None
        }
    }

    /// Removes every triple from this model, returning how many distinct
    /// triples were removed.
    pub fn empty(&mut self) -> Result<usize> {
        let count = self.map.len() / SUBSETS.len();
        self.map.clear();
        self.log.compact(std::iter::empty::<&[u8]>())?;
        self.ops_since_compaction = 0;
        Ok(count)
    }

    /// Merges every entry of `other` into `self`, leaving `other` intact.
    /// Used by `absorb_model`. Destination entries for the same key are
    /// left untouched (a triple already present in `self` stays present).
    pub fn absorb(&mut self, other: &ModelIndex) -> Result<()> {
        for key in other.map.keys() {
            self.log.append(&encode_op(OP_INSERT, key))?;
            self.map.insert(*key, ());
        }
        self.ops_since_compaction += other.map.len();
        Ok(())
    }

    /// Number of distinct triples currently stored (not permutation-key
    /// count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len() / SUBSETS.len()
    }

    /// True if this index holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Rewrites the backing log to exactly the live set, discarding
    /// history. Called automatically once `ops_since_compaction` exceeds
    /// the configured threshold.
    pub fn compact(&mut self) -> Result<()> {
        let records: Vec<[u8; 17]> = self.map.keys().map(|k| encode_op(OP_INSERT, k)).collect();
        self.log.compact(records.iter().map(|r| r.as_slice()))?;
        tracing::debug!(live_keys = records.len(), "compacted model index");
        self.ops_since_compaction = 0;
        Ok(())
    }

    /// True if the operation count since the last compaction has crossed
    /// `threshold`.
    #[must_use]
    pub fn needs_compaction(&self, threshold: usize) -> bool {
        self.ops_since_compaction >= threshold
    }

    /// Deletes the backing file, if any.
    pub fn delete(&mut self) -> Result<()> {
        self.log.delete()
    }
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
