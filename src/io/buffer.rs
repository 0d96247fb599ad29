//! Sample blocks and the DMA double buffer.
//!
//! The transfer engine writes (or reads) the [`DoubleBuffer`] continuously
//! and circularly, raising a completion signal at each half boundary. Each
//! half is exactly one [`SampleBlock`]: the unit handed to application
//! processing. While the engine works on one half, the other belongs to the
//! dispatch layer; the half-complete signal is the only ownership transfer
//! point, so a block handed to a callback is never concurrently written.
//!
//! Buffers are statically owned by platform glue (placed in non-cached or
//! maintenance-managed RAM) and passed into the ISR entry points by
//! reference, so the core itself allocates nothing.

use crate::constants::{CACHE_LINE_BYTES, PROCESSING_BLOCK_SIZE};

/// One audio sample: signed 16-bit.
pub type Sample = i16;

/// Fixed-length block of samples delivered per half-complete signal.
///
/// Immutable for the duration of the callback invocation that receives it.
pub type SampleBlock = [Sample; PROCESSING_BLOCK_SIZE];

/// Which half of a double buffer an event refers to.
///
/// Halves strictly alternate: even trigger intervals fill `First`, odd
/// intervals fill `Second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaHalf {
    First,
    Second,
}

impl DmaHalf {
    /// The opposite half.
    pub const fn other(self) -> Self {
        match self {
            DmaHalf::First => DmaHalf::Second,
            DmaHalf::Second => DmaHalf::First,
        }
    }

    const fn index(self) -> usize {
        match self {
            DmaHalf::First => 0,
            DmaHalf::Second => 1,
        }
    }
}

/// Two-block region filled (or drained) circularly by the transfer engine.
///
/// Cache-line aligned so maintenance operations on one half never touch the
/// other.
#[repr(C, align(32))]
pub struct DoubleBuffer {
    halves: [SampleBlock; 2],
}

impl DoubleBuffer {
    /// A zeroed buffer, usable in `static` initializers.
    pub const fn new() -> Self {
        Self {
            halves: [[0; PROCESSING_BLOCK_SIZE]; 2],
        }
    }

    /// Borrow one half as a completed block.
    pub fn half(&self, half: DmaHalf) -> &SampleBlock {
        &self.halves[half.index()]
    }

    /// Borrow one half for filling (output direction).
    pub fn half_mut(&mut self, half: DmaHalf) -> &mut SampleBlock {
        &mut self.halves[half.index()]
    }
}

impl Default for DoubleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

const _: () = assert!(
    core::mem::align_of::<DoubleBuffer>() == CACHE_LINE_BYTES,
    "double buffer must be cache-line aligned"
);
const _: () = assert!(
    core::mem::size_of::<SampleBlock>() % CACHE_LINE_BYTES == 0,
    "each buffer half must span whole cache lines"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_do_not_alias() {
        let mut buf = DoubleBuffer::new();
        buf.half_mut(DmaHalf::First).fill(11);
        buf.half_mut(DmaHalf::Second).fill(-7);

        assert!(buf.half(DmaHalf::First).iter().all(|&s| s == 11));
        assert!(buf.half(DmaHalf::Second).iter().all(|&s| s == -7));
    }

    #[test]
    fn other_alternates() {
        assert_eq!(DmaHalf::First.other(), DmaHalf::Second);
        assert_eq!(DmaHalf::Second.other(), DmaHalf::First);
        assert_eq!(DmaHalf::First.other().other(), DmaHalf::First);
    }
}
