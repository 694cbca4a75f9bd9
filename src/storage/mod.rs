//! Generic on-disk storage building blocks shared by the node store, the
//! triple store and the per-model index.
//!
//! Every persistent structure in this crate is, at its core, an in-memory
//! map or ordered set kept durable by a simple append-only log of length
//! prefixed records: appends are O(1) and crash-safe up to a partially
//! written final record (dropped on replay), and periodic compaction keeps
//! replay time bounded. This is the same WAL shape the teacher's own
//! `storage.rs` sketches out (`// TODO: Implement WAL... for durability`)
//! applied uniformly across all four process-global files and every
//! per-model file.

mod record_log;

pub use record_log::RecordLog;
