//! Block dispatch: routes completed sample blocks to the application hook.
//!
//! One hook per direction. Registration is last-writer-wins: attaching a new
//! handle replaces the previous one atomically from the dispatcher's point
//! of view, and the very next completed block goes to the new target only.
//! An unattached dispatcher drops blocks silently; with a 128-sample block
//! at 48 kHz the hook runs 375 times per second.

use crate::callback::ContextCallback;
use crate::io::buffer::SampleBlock;

/// Per-direction dispatch point for completed blocks.
///
/// The stored handle is type-erased to `ContextCallback<()>`; hooks with
/// typed state go through a forwarding function that casts the opaque
/// pointer back. Dispatch only happens once [`start`](Self::start) has been
/// called, so a half-configured pipeline never invokes application code.
pub struct BlockDispatcher {
    handle: ContextCallback<()>,
    priority: u8,
    started: bool,
}

impl BlockDispatcher {
    /// A dispatcher with no hook attached and dispatch disabled.
    pub const fn new() -> Self {
        Self {
            handle: ContextCallback::empty(),
            priority: 0,
            started: false,
        }
    }

    /// Register `handle` as the processing hook, overwriting any previous
    /// registration.
    ///
    /// `priority` is the interrupt priority the block-processing stage
    /// should run at; platform glue reads it back with
    /// [`priority`](Self::priority) when programming the NVIC.
    pub fn attach(&mut self, handle: ContextCallback<()>, priority: u8) {
        self.handle = handle;
        self.priority = priority;
    }

    /// Enable dispatch. Idempotent.
    pub fn start(&mut self) {
        self.started = true;
    }

    /// Whether [`start`](Self::start) has been called.
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Requested interrupt priority for the processing stage.
    pub const fn priority(&self) -> u8 {
        self.priority
    }

    /// Hand one completed block to the hook, if dispatch is enabled.
    #[inline(always)]
    pub fn dispatch(&self, block: &SampleBlock) {
        if self.started {
            self.handle.call(block);
        }
    }
}

impl Default for BlockDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PROCESSING_BLOCK_SIZE;

    static BLOCK: SampleBlock = [0; PROCESSING_BLOCK_SIZE];

    #[test]
    fn nothing_dispatches_before_start() {
        use core::sync::atomic::{AtomicUsize, Ordering};
        static HITS: AtomicUsize = AtomicUsize::new(0);

        fn hook(_: &SampleBlock) {
            HITS.fetch_add(1, Ordering::Relaxed);
        }

        let mut dispatch = BlockDispatcher::new();
        dispatch.attach(ContextCallback::from_fn(hook), 32);
        dispatch.dispatch(&BLOCK);
        assert_eq!(HITS.load(Ordering::Relaxed), 0);

        dispatch.start();
        dispatch.dispatch(&BLOCK);
        assert_eq!(HITS.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn unattached_dispatcher_drops_blocks() {
        let mut dispatch = BlockDispatcher::new();
        dispatch.start();
        dispatch.dispatch(&BLOCK);
    }

    #[test]
    fn attach_records_the_requested_priority() {
        let mut dispatch = BlockDispatcher::new();
        assert_eq!(dispatch.priority(), 0);
        dispatch.attach(ContextCallback::empty(), 48);
        assert_eq!(dispatch.priority(), 48);
    }

    #[test]
    fn reattach_redirects_the_next_block() {
        use core::sync::atomic::{AtomicUsize, Ordering};
        static FIRST: AtomicUsize = AtomicUsize::new(0);
        static SECOND: AtomicUsize = AtomicUsize::new(0);

        fn first_hook(_: &SampleBlock) {
            FIRST.fetch_add(1, Ordering::Relaxed);
        }
        fn second_hook(_: &SampleBlock) {
            SECOND.fetch_add(1, Ordering::Relaxed);
        }

        let mut dispatch = BlockDispatcher::new();
        dispatch.attach(ContextCallback::from_fn(first_hook), 32);
        dispatch.start();
        dispatch.dispatch(&BLOCK);

        dispatch.attach(ContextCallback::from_fn(second_hook), 32);
        dispatch.dispatch(&BLOCK);
        dispatch.dispatch(&BLOCK);

        assert_eq!(FIRST.load(Ordering::Relaxed), 1);
        assert_eq!(SECOND.load(Ordering::Relaxed), 2);
    }
}
