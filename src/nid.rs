//! Node identifiers, triples and patterns.

use serde::{Deserialize, Serialize};

/// Bit set in [`Nid::flags`] for triple nodes (as opposed to byte-string
/// nodes).
pub const TRIPLE: u32 = 1;

/// The on-disk encoding of a [`Nid`] packs `index` and the `TRIPLE` flag
/// into a single `u32`: bit 31 is the flag, bits 0..=30 are the index. This
/// keeps triples at 12 bytes and permutation-key records at 16 bytes on
/// disk, matching the file layout in SPEC_FULL.md.
const PACKED_TRIPLE_BIT: u32 = 1 << 31;
const PACKED_INDEX_MASK: u32 = PACKED_TRIPLE_BIT - 1;

/// A node identifier: `(index, flags)`. The null NID (`index == 0 && flags
/// == 0`) never identifies a stored node or triple; it is only meaningful
/// inside patterns and permutation keys, where it acts as a wildcard.
///
/// NIDs are cheap to copy and compare; two NIDs are equal iff both fields
/// are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Nid {
    /// Dense, strictly-positive (for non-null NIDs) per-namespace counter.
    pub index: u32,
    /// Bitfield; only [`TRIPLE`] is currently defined.
    pub flags: u32,
}

impl Nid {
    /// The null NID: matches any node or triple when used inside a pattern.
    pub const NULL: Nid = Nid { index: 0, flags: 0 };

    /// Constructs a byte-string node NID with the given index.
    #[must_use]
    pub const fn node(index: u32) -> Self {
        Nid { index, flags: 0 }
    }

    /// Constructs a triple node NID with the given index.
    #[must_use]
    pub const fn triple(index: u32) -> Self {
        Nid {
            index,
            flags: TRIPLE,
        }
    }

    /// True iff this is the null NID.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.index == 0 && self.flags == 0
    }

    /// True iff this NID identifies a triple node.
    #[must_use]
    pub const fn is_triple(&self) -> bool {
        self.flags & TRIPLE != 0
    }

    /// Packs this NID into its 4-byte on-disk form.
    ///
    /// # Panics
    ///
    /// Panics if `index` exceeds `2^31 - 1`; the index counters are not
    /// expected to approach that bound in practice (it would require four
    /// billion distinct interned nodes or triples).
    #[must_use]
    pub fn pack(&self) -> u32 {
        assert!(
            self.index <= PACKED_INDEX_MASK,
            "node/triple index {} exceeds packed-NID range",
            self.index
        );
        let flag = if self.is_triple() { PACKED_TRIPLE_BIT } else { 0 };
        self.index | flag
    }

    /// Unpacks a 4-byte on-disk NID.
    #[must_use]
    pub fn unpack(raw: u32) -> Self {
        if raw & PACKED_TRIPLE_BIT != 0 {
            Nid::triple(raw & PACKED_INDEX_MASK)
        } else {
            Nid {
                index: raw & PACKED_INDEX_MASK,
                flags: 0,
            }
        }
    }
}

impl Default for Nid {
    fn default() -> Self {
        Nid::NULL
    }
}

/// An ordered triple of three NIDs. Any position may hold the null NID when
/// used as a pattern or as a permutation key; a *stored* triple (the value
/// behind a triple NID) never contains a null NID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// The three node slots, conventionally named subject/predicate/object.
    pub nodes: [Nid; 3],
}

impl Triple {
    /// Builds a triple from its three components.
    #[must_use]
    pub const fn new(s: Nid, p: Nid, o: Nid) -> Self {
        Triple { nodes: [s, p, o] }
    }

    /// Packs this triple into its 12-byte on-disk form.
    #[must_use]
    pub fn pack(&self) -> [u8; 12] {
        let mut out = [0u8; 12];
        for (i, n) in self.nodes.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&n.pack().to_le_bytes());
        }
        out
    }

    /// Unpacks a 12-byte on-disk triple.
    #[must_use]
    pub fn unpack(raw: &[u8; 12]) -> Self {
        let mut nodes = [Nid::NULL; 3];
        for (i, n) in nodes.iter_mut().enumerate() {
            let mut b = [0u8; 4];
            b.copy_from_slice(&raw[i * 4..i * 4 + 4]);
            *n = Nid::unpack(u32::from_le_bytes(b));
        }
        Triple { nodes }
    }

    /// A pattern `p` defines exactly one subset of "concrete" (non-null)
    /// positions; this returns that subset as a 3-bit mask, bit `i` set iff
    /// `nodes[i]` is not the null NID.
    #[must_use]
    pub fn concrete_mask(&self) -> u8 {
        let mut mask = 0u8;
        for (i, n) in self.nodes.iter().enumerate() {
            if !n.is_null() {
                mask |= 1 << i;
            }
        }
        mask
    }

    /// Masks this triple down to the given subset of positions, replacing
    /// the rest with the null NID. Used to compute one of the eight
    /// permutation keys for a stored triple.
    #[must_use]
    pub fn masked(&self, mask: u8) -> Triple {
        let mut nodes = [Nid::NULL; 3];
        for i in 0..3 {
            if mask & (1 << i) != 0 {
                nodes[i] = self.nodes[i];
            }
        }
        Triple { nodes }
    }

    /// True iff `self` matches `pattern`: every position either equals the
    /// pattern's position, or the pattern's position is the null NID
    /// (wildcard).
    #[must_use]
    pub fn matches(&self, pattern: &Triple) -> bool {
        self.nodes
            .iter()
            .zip(pattern.nodes.iter())
            .all(|(n, p)| p.is_null() || n == p)
    }
}

#[cfg(test)]
#[path = "nid_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "nid_proptests.rs"]
mod proptests;
