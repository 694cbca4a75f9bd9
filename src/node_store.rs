//! The node store: a bidirectional persistent map between byte-string node
//! payloads and node indices.
//!
//! Lock order (spec.md §4.1, §5): the reverse-map lock (`reverse`) is always
//! acquired before the forward-map lock (`forward`); `resolve_node` only
//! ever takes `forward`, so this order cannot deadlock against it.

use std::collections::BTreeMap;
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::nid::Nid;
use crate::storage::RecordLog;
use crate::sync::Mutex;

struct Forward {
    log: RecordLog,
    records: BTreeMap<u32, Vec<u8>>,
    last_index: u32,
}

struct Reverse {
    log: RecordLog,
    map: FxHashMap<Vec<u8>, u32>,
}

/// Bidirectional persistent map between node payloads and node indices.
pub struct NodeStore {
    forward: Mutex<Forward>,
    reverse: Mutex<Reverse>,
}

fn encode_record(index: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + payload.len());
    out.extend_from_slice(&index.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

fn decode_record(record: &[u8]) -> Result<(u32, &[u8])> {
    if record.len() < 4 {
        return Err(Error::Corrupted {
            path: "nodes.db".to_string(),
            reason: format!("record too short: {} bytes", record.len()),
        });
    }
    let mut idx_buf = [0u8; 4];
    idx_buf.copy_from_slice(&record[..4]);
    Ok((u32::from_le_bytes(idx_buf), &record[4..]))
}

impl NodeStore {
    /// Opens (or creates) the node store rooted at `dir`. `dir == None`
    /// opens a purely in-memory store.
    pub fn open(dir: Option<&Path>) -> Result<Self> {
        let forward_path = dir.map(|d| d.join("nodes.db"));
        let reverse_path = dir.map(|d| d.join("nodes_index.db"));

        let forward_log = RecordLog::open(forward_path.as_deref())?;
        let reverse_log = RecordLog::open(reverse_path.as_deref())?;

        let mut records = BTreeMap::new();
        let mut last_index = 0u32;
        for raw in forward_log.replay()? {
            let (index, payload) = decode_record(&raw)?;
            records.insert(index, payload.to_vec());
            last_index = last_index.max(index);
        }

        let mut map = FxHashMap::default();
        let mut reverse_count = 0usize;
        for raw in reverse_log.replay()? {
            let (index, payload) = decode_record(&raw)?;
            map.insert(payload.to_vec(), index);
            reverse_count += 1;
        }

        let mut reverse_log = reverse_log;
        if reverse_count != records.len() {
            // Reverse log is stale relative to the forward log (the source
            // of truth) — likely a crash between the two appends. Rebuild
            // the reverse map from forward records and recompact.
            tracing::warn!(
                forward = records.len(),
                reverse = reverse_count,
                "nodes_index.db out of sync with nodes.db; rebuilding"
            );
            map.clear();
            let rebuilt: Vec<Vec<u8>> = records
                .iter()
                .map(|(&index, payload)| encode_record(index, payload))
                .collect();
            for (&index, payload) in &records {
                map.insert(payload.clone(), index);
            }
            reverse_log.compact(rebuilt.iter().map(Vec::as_slice))?;
        }

        Ok(NodeStore {
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

    /// Interns `payload`, returning a stable NID. Two calls with
    /// byte-equal payloads always return the same NID.
    pub fn identify(&self, payload: &[u8]) -> Result<Nid> {
        let mut reverse = self.reverse.lock();
        if let Some(&index) = reverse.map.get(payload) {
            return Ok(Nid::node(index));
        }

        let index = {
            let mut forward = self.forward.lock();
            let index = forward.last_index + 1;
            forward.last_index = index;
            forward.log.append(&encode_record(index, payload))?;
            forward.records.insert(index, payload.to_vec());
            index
        };

        reverse.log.append(&encode_record(index, payload))?;
        reverse.map.insert(payload.to_vec(), index);

        Ok(Nid::node(index))
    }

    /// Resolves `nid` to its stored payload, copying it into a fresh
    /// `Vec<u8>`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotANodeNid` if `nid` has the `TRIPLE` flag set, or
    /// `Error::NoSuchNode` if no node with this index has been interned.
    pub fn resolve(&self, nid: Nid) -> Result<Vec<u8>> {
        if nid.is_triple() {
            return Err(Error::NotANodeNid);
        }
        let forward = self.forward.lock();
        forward
            .records
            .get(&nid.index)
            .cloned()
            .ok_or(Error::NoSuchNode(nid))
    }

    /// Resolves `nid` into the caller-supplied buffer if it fits.
    ///
    /// Returns `Ok(n)` with the payload copied into `buf[..n]` if
    /// `buf.len() >= n`; otherwise returns `Err(Error::BufferTooSmall)`
    /// reporting the required size, so the caller can retry with a larger
    /// buffer. This mirrors the C API's buffer-or-allocate discipline
    /// without requiring callers to `free_data` an owned allocation.
    ///
    /// # Errors
    ///
    /// As [`NodeStore::resolve`], plus `Error::BufferTooSmall`.
    pub fn resolve_into(&self, nid: Nid, buf: &mut [u8]) -> Result<usize> {
        if nid.is_triple() {
            return Err(Error::NotANodeNid);
        }
        let forward = self.forward.lock();
        let payload = forward.records.get(&nid.index).ok_or(Error::NoSuchNode(nid))?;
        if payload.len() > buf.len() {
            return Err(Error::BufferTooSmall {
                needed: payload.len(),
                available: buf.len(),
            });
        }
        buf[..payload.len()].copy_from_slice(payload);
        Ok(payload.len())
    }

    /// Number of interned nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.lock().records.len()
    }

    /// True if no nodes have been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "node_store_tests.rs"]
mod tests;
