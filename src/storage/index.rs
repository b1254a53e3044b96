//! Index widths for CSR storage
//!
//! Vertex ids and arc offsets are stored in a caller-chosen integer type so
//! that graphs under 4B vertices/arcs can use half the memory of 64-bit
//! indices. The choice is made once, at the type level:
//!
//! ```text
//! CsrGraph<u32>        // 32-bit vertices, 32-bit offsets
//! CsrGraph<u32, u64>   // 32-bit vertices, 64-bit offsets (many arcs)
//! CsrGraph<u64>        // 64-bit everything
//! ```

use std::fmt::Debug;

/// Unsigned integer usable as a CSR vertex id or arc offset
pub trait GraphIndex: Copy + Ord + Debug + Send + Sync + 'static {
    /// Widen to `usize` for slice indexing
    fn index(self) -> usize;

    /// Narrow from `usize`, `None` if the value does not fit
    fn from_index(value: usize) -> Option<Self>;
}

impl GraphIndex for u32 {
    #[inline]
    #[allow(clippy::cast_possible_truncation)] // usize >= 32 bits on supported targets
    fn index(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_index(value: usize) -> Option<Self> {
        u32::try_from(value).ok()
    }
}

impl GraphIndex for u64 {
    #[inline]
    #[allow(clippy::cast_possible_truncation)] // 64-bit targets only for >4B graphs
    fn index(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_index(value: usize) -> Option<Self> {
        u64::try_from(value).ok()
    }
}

impl GraphIndex for usize {
    #[inline]
    fn index(self) -> usize {
        self
    }

    #[inline]
    fn from_index(value: usize) -> Option<Self> {
        Some(value)
    }
}
