//! Error types for `tripledb-core`.
//!
//! Every condition the original C library treated as a fatal contract
//! violation (wrong NID kind passed to a resolve call, missing node, model
//! handle misuse) is instead a distinct `Error` variant here. Error codes
//! follow the pattern `TDB-XXX` for easy cross-referencing in logs.

use thiserror::Error;

/// Result type alias for `tripledb-core` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in `tripledb-core` operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A NID with the `TRIPLE` flag set was passed to `resolve_node` (TDB-001).
    #[error("[TDB-001] NID is a triple node; resolve_node only accepts byte-string nodes")]
    NotANodeNid,

    /// A NID without the `TRIPLE` flag was passed to `resolve_triple` (TDB-002).
    #[error("[TDB-002] NID is not a triple node; resolve_triple requires the TRIPLE flag")]
    NotATripleNid,

    /// The NID does not identify any node in the store (TDB-003).
    ///
    /// The reference C implementation asserts unconditionally here instead
    /// of surfacing a recoverable error; this is deliberately not
    /// reproduced (see spec.md Design Notes / DESIGN.md).
    #[error("[TDB-003] no such node: {0:?}")]
    NoSuchNode(crate::nid::Nid),

    /// The NID does not identify any triple in the store (TDB-004).
    #[error("[TDB-004] no such triple: {0:?}")]
    NoSuchTriple(crate::nid::Nid),

    /// The supplied buffer was too small for `resolve_node`; retry with the
    /// reported size (TDB-005). This is a recoverable condition, not an error
    /// in the usual sense, but it is modeled here for uniformity.
    #[error("[TDB-005] buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes required to hold the node payload.
        needed: usize,
        /// Bytes actually available in the caller-supplied buffer.
        available: usize,
    },

    /// Failed to open or create the on-disk store backing a model or the
    /// process-global node/triple stores (TDB-006).
    #[error("[TDB-006] storage error: {0}")]
    Storage(String),

    /// The on-disk log for a store is corrupted beyond recovery (TDB-007).
    #[error("[TDB-007] corrupted store at {path}: {reason}")]
    Corrupted {
        /// Path of the corrupted file.
        path: String,
        /// Human-readable description of the corruption.
        reason: String,
    },

    /// Configuration error (TDB-008).
    #[error("[TDB-008] configuration error: {0}")]
    Config(String),

    /// IO error (TDB-009).
    #[error("[TDB-009] IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the stable error code (e.g. `"TDB-001"`).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotANodeNid => "TDB-001",
            Self::NotATripleNid => "TDB-002",
            Self::NoSuchNode(_) => "TDB-003",
            Self::NoSuchTriple(_) => "TDB-004",
            Self::BufferTooSmall { .. } => "TDB-005",
            Self::Storage(_) => "TDB-006",
            Self::Corrupted { .. } => "TDB-007",
            Self::Config(_) => "TDB-008",
            Self::Io(_) => "TDB-009",
        }
    }

    /// Returns true if the caller can reasonably retry or recover from this
    /// error without restarting the process.
    ///
    /// Corruption is not recoverable in-process; everything else is.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Corrupted { .. })
    }
}
