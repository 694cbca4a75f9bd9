//! Synchronization primitive aliases.
//!
//! A single place to swap the lock implementation. We use `parking_lot`
//! throughout rather than `std::sync`: its `Mutex`/`RwLock` are smaller, do
//! not poison on panic, and its guards are not tied to a `Result`, which
//! keeps the lock-order-sensitive code in `node_store`, `triple_store` and
//! `model` readable.

pub use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
pub use std::sync::Arc;
