//! Digital audio output toward the MQS modulator.
//!
//! The output direction mirrors the input: the transfer engine drains a
//! [`DoubleBuffer`] circularly into the modulator while the application
//! refills the half the engine is not reading. Each half-complete signal
//! means the engine just finished sending `completed` and has moved on to
//! the other half, so `completed` becomes the half to write next and the
//! hook is invoked to produce it.
//!
//! Before [`start`], the buffer holds zeros, so the modulator output is
//! silence rather than garbage.
//!
//! [`start`]: AudioOutputMqs::start

use crate::callback::ContextCallback;
use crate::io::buffer::{DmaHalf, DoubleBuffer, SampleBlock};
use crate::io::dispatch::BlockDispatcher;

/// Driver for the modulator-facing output path.
pub struct AudioOutputMqs {
    dispatch: BlockDispatcher,
    write_half: DmaHalf,
}

impl AudioOutputMqs {
    /// A driver with no hook attached.
    ///
    /// The engine starts reading the first half, so writing begins at the
    /// second.
    pub const fn new() -> Self {
        Self {
            dispatch: BlockDispatcher::new(),
            write_half: DmaHalf::Second,
        }
    }

    /// Prepare the emission buffer: zero both halves and reset the write
    /// position, so whatever the modulator drains before the first
    /// [`update`](Self::update) is silence.
    pub fn init(&mut self, buffer: &mut DoubleBuffer) {
        buffer.half_mut(DmaHalf::First).fill(0);
        buffer.half_mut(DmaHalf::Second).fill(0);
        self.write_half = DmaHalf::Second;
    }

    /// Register the block-production hook, overwriting any previous one.
    pub fn attach_interrupt(&mut self, handle: ContextCallback<()>, priority: u8) {
        self.dispatch.attach(handle, priority);
    }

    /// Enable dispatch of half-complete events to the hook.
    pub fn start(&mut self) {
        self.dispatch.start();
    }

    /// DMA half/complete interrupt entry point.
    ///
    /// `completed` is the half the engine just finished draining; it is now
    /// free for refilling and becomes the write target for
    /// [`update`](Self::update).
    pub fn half_complete(&mut self, buffer: &DoubleBuffer, completed: DmaHalf) {
        self.write_half = completed;
        self.dispatch.dispatch(buffer.half(completed));
    }

    /// Copy one processed block into the currently writable half.
    pub fn update(&self, buffer: &mut DoubleBuffer, block: &SampleBlock) {
        buffer.half_mut(self.write_half).copy_from_slice(block);
    }

    /// The half [`update`](Self::update) would write into.
    pub const fn write_half(&self) -> DmaHalf {
        self.write_half
    }
}

impl Default for AudioOutputMqs {
    fn default() -> Self {
        Self::new()
    }
}
