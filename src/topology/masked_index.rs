//! `MaskedIndex`: an index with flag bits packed into its high bits
//!
//! Every pointer array of the contour tree pipeline (extremal chains, merge-tree
//! arcs, superarcs, hyperarcs) stores one `MaskedIndex` per slot instead of an
//! `Option<usize>` plus side tables. The low 59 bits hold the index, the five
//! high bits hold flags:
//!
//! | bit | flag               | meaning                                      |
//! |-----|--------------------|----------------------------------------------|
//! | 63  | `NO_SUCH_ELEMENT`  | sentinel, there is no target                 |
//! | 62  | `TERMINAL_ELEMENT` | the index names an extremum that ends a chain |
//! | 61  | `IS_SUPERNODE`     | the index is a supernode                     |
//! | 60  | `IS_HYPERNODE`     | the index is a hypernode                     |
//! | 59  | `IS_ASCENDING`     | the arc leads to a higher vertex             |
//!
//! # Memory layout
//! `repr(transparent)` over `u64`, so slices can be cast with `bytemuck`.

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Sentinel flag: "no such element".
pub const NO_SUCH_ELEMENT: u64 = 1 << 63;
/// Marks the end of an extremal chain.
pub const TERMINAL_ELEMENT: u64 = 1 << 62;
/// Marks a supernode.
pub const IS_SUPERNODE: u64 = 1 << 61;
/// Marks a hypernode.
pub const IS_HYPERNODE: u64 = 1 << 60;
/// Marks an arc that leads upwards in the sort order.
pub const IS_ASCENDING: u64 = 1 << 59;
/// Bits carrying the plain index.
pub const INDEX_MASK: u64 = IS_ASCENDING - 1;
/// Bits carrying flags.
pub const FLAG_MASK: u64 = !INDEX_MASK;

#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct MaskedIndex(u64);

impl MaskedIndex {
    /// The "no such element" sentinel.
    pub const NONE: Self = MaskedIndex(NO_SUCH_ELEMENT);

    /// Wraps a plain index with no flags.
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index as u64 <= INDEX_MASK, "index {index} collides with flag bits");
        MaskedIndex(index as u64)
    }

    /// Wraps `index` and marks it as the terminal element of a chain.
    #[inline]
    pub fn terminal(index: usize) -> Self {
        Self::new(index).with_flag(TERMINAL_ELEMENT)
    }

    /// The plain index with every flag stripped.
    #[inline]
    pub const fn index(self) -> usize {
        (self.0 & INDEX_MASK) as usize
    }

    /// `Some(index)` unless this is the sentinel.
    #[inline]
    pub const fn get(self) -> Option<usize> {
        if self.is_none() { None } else { Some(self.index()) }
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 & NO_SUCH_ELEMENT != 0
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        self.0 & TERMINAL_ELEMENT != 0
    }

    #[inline]
    pub const fn is_supernode(self) -> bool {
        self.0 & IS_SUPERNODE != 0
    }

    #[inline]
    pub const fn is_hypernode(self) -> bool {
        self.0 & IS_HYPERNODE != 0
    }

    #[inline]
    pub const fn is_ascending(self) -> bool {
        self.0 & IS_ASCENDING != 0
    }

    /// A chain ends here: either nothing follows or the slot is an extremum.
    #[inline]
    pub const fn ends_chain(self) -> bool {
        self.0 & (NO_SUCH_ELEMENT | TERMINAL_ELEMENT) != 0
    }

    #[inline]
    pub const fn with_flag(self, flag: u64) -> Self {
        MaskedIndex(self.0 | (flag & FLAG_MASK))
    }

    /// Same index, different flags.
    #[inline]
    pub const fn with_index(self, index: usize) -> Self {
        MaskedIndex((self.0 & FLAG_MASK) | (index as u64 & INDEX_MASK))
    }

    #[inline]
    pub const fn flags(self) -> u64 {
        self.0 & FLAG_MASK
    }
}

impl Default for MaskedIndex {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<Option<usize>> for MaskedIndex {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Self::NONE, Self::new)
    }
}

impl fmt::Debug for MaskedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("MaskedIndex(NONE)");
        }
        let mut t = f.debug_tuple("MaskedIndex");
        t.field(&self.index());
        for (flag, name) in [
            (TERMINAL_ELEMENT, "terminal"),
            (IS_SUPERNODE, "supernode"),
            (IS_HYPERNODE, "hypernode"),
            (IS_ASCENDING, "ascending"),
        ] {
            if self.0 & flag != 0 {
                t.field(&format_args!("{name}"));
            }
        }
        t.finish()
    }
}

impl fmt::Display for MaskedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(i) => write!(f, "{i}"),
            None => f.write_str("-"),
        }
    }
}
