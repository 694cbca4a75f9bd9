//! The triple store: a bidirectional persistent map between packed
//! `(subject, predicate, object)` triples and triple indices.
//!
//! Once interned, a triple's NID (with the `TRIPLE` flag set) can itself
//! appear as a node inside another triple — this is what lets models
//! express reification. Lock order mirrors [`crate::node_store::NodeStore`]:
//! `reverse` before `forward`.

use std::collections::BTreeMap;
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::nid::{Nid, Triple};
use crate::storage::RecordLog;
use crate::sync::Mutex;

struct Forward {
    log: RecordLog,
    records: BTreeMap<u32, Triple>,
    last_index: u32,
}

struct Reverse {
    log: RecordLog,
    map: FxHashMap<[u8; 12], u32>,
}

/// Bidirectional persistent map between packed triples and triple indices.
pub struct TripleStore {
    forward: Mutex<Forward>,
    reverse: Mutex<Reverse>,
}

fn encode_record(index: u32, packed: &[u8; 12]) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[..4].copy_from_slice(&index.to_le_bytes());
    out[4..].copy_from_slice(packed);
    out
}

fn decode_record(record: &[u8]) -> Result<(u32, [u8; 12])> {
    if record.len() != 16 {
        return Err(Error::Corrupted {
            path: "triples.db".to_string(),
            reason: format!("expected a 16-byte record, got {} bytes", record.len()),
        });
    }
    let mut idx_buf = [0u8; 4];
    idx_buf.copy_from_slice(&record[..4]);
    let mut packed = [0u8; 12];
    packed.copy_from_slice(&record[4..]);
    Ok((u32::from_le_bytes(idx_buf), packed))
}

impl TripleStore {
    /// Opens (or creates) the triple store rooted at `dir`. `dir == None`
    /// opens a purely in-memory store.
    pub fn open(dir: Option<&Path>) -> Result<Self> {
        let forward_path = dir.map(|d| d.join("triples.db"));
        let reverse_path = dir.map(|d| d.join("triples_index.db"));

        let forward_log = RecordLog::open(forward_path.as_deref())?;
        let reverse_log = RecordLog::open(reverse_path.as_deref())?;

        let mut records = BTreeMap::new();
        let mut last_index = 0u32;
        for raw in forward_log.replay()? {
            let (index, packed) = decode_record(&raw)?;
            records.insert(index, Triple::unpack(&packed));
            last_index = last_index.max(index);
        }

        let mut map = FxHashMap::default();
        let mut reverse_count = 0usize;
        for raw in reverse_log.replay()? {
            let (index, packed) = decode_record(&raw)?;
            map.insert(packed, index);
            reverse_count += 1;
        }

        let mut reverse_log = reverse_log;
        if reverse_count != records.len() {
            tracing::warn!(
                forward = records.len(),
                reverse = reverse_count,
                "triples_index.db out of sync with triples.db; rebuilding"
            );
            map.clear();
            let mut rebuilt = Vec::with_capacity(records.len());
            for (&index, triple) in &records {
                let packed = triple.pack();
                map.insert(packed, index);
                rebuilt.push(encode_record(index, &packed));
            }
            reverse_log.compact(rebuilt.iter().map(|r| r.as_slice()))?;
        }

        Ok(TripleStore {
            forward: Mutex::new(Forward {
                log: forward_log,
                records,
                last_index,
            }),
            reverse: Mutex::new(Reverse {
                log: reverse_log,
                map,
            }),
        })
    }

    /// Interns `triple`, returning a stable NID with the `TRIPLE` flag set.
    /// Two calls with equal triples always return the same NID.
    pub fn identify(&self, triple: Triple) -> Result<Nid> {
        let packed = triple.pack();
        let mut reverse = self.reverse.lock();
        if let Some(&index) = reverse.map.get(&packed) {
            return Ok(Nid::triple(index));
        }

        let index = {
            let mut forward = self.forward.lock();
            let index = forward.last_index + 1;
            forward.last_index = index;
            forward.log.append(&encode_record(index, &packed))?;
            forward.records.insert(index, triple);
            index
        };

        reverse.log.append(&encode_record(index, &packed))?;
        reverse.map.insert(packed, index);

        Ok(Nid::triple(index))
    }

    /// Resolves `nid` to the triple it names.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotATripleNid` if `nid` lacks the `TRIPLE` flag, or
    /// `Error::NoSuchTriple` if no triple with this index has been
    /// interned.
    pub fn resolve(&self, nid: Nid) -> Result<Triple> {
        if !nid.is_triple() {
            return Err(Error::NotATripleNid);
        }
        let forward = self.forward.lock();
        forward
            .records
            .get(&nid.index)
            .copied()
            .ok_or(Error::NoSuchTriple(nid))
    }

    /// Number of interned triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.lock().records.len()
    }

    /// True if no triples have been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "triple_store_tests.rs"]
mod tests;
