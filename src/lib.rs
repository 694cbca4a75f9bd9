//! `tripledb-core`: a persistent triple store.
//!
//! Byte-string nodes and triples are both interned into stable NIDs; a
//! triple, once interned, becomes a node in its own right and can appear
//! inside other triples (reification). Triples are organized into named
//! or anonymous *models*, each an independently-locked, wildcard-queryable
//! set backed by an eight-permutation ordered index, so any pattern query
//! `(s, p, o)` with any subset of positions left as wildcards reduces to a
//! single ordered range scan.
//!
//! See [`db::TripleDb`] for the public entry point.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod nid;
pub mod node_store;
mod storage;
mod sync;
pub mod triple_store;
mod urlencode;

pub use config::Config;
pub use db::TripleDb;
pub use error::{Error, Result};
pub use model::Model;
pub use nid::{Nid, Triple};
