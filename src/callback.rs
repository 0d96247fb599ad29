//! Allocation-free callback handles for interrupt context.
//!
//! Interrupt handlers need to invoke application processing hooks without
//! heap allocation, trait objects, or closures that capture state on the
//! heap. This module provides three fixed-size, `Copy` handle types, each
//! with a single `call` entry point that receives the completed sample
//! block:
//!
//! | Handle | Target |
//! |--------|--------|
//! | [`Callback`] | free function or any fn item |
//! | [`InstanceCallback<T>`] | method-like call against one `T` |
//! | [`ContextCallback<T>`] | function plus an opaque context pointer |
//!
//! All three default to a safe no-op: calling an unbound handle does nothing
//! and never dereferences null. Re-registration is a plain value overwrite;
//! there is nothing to release.
//!
//! Handles are non-owning. Binding an instance or context pointer is
//! `unsafe` because the caller must guarantee the target outlives every
//! invocation; once bound, invocation itself is safe.
//!
//! [`ContextCallback`] is the variant the dispatch layer stores: a hook that
//! needs typed state erases it to `ContextCallback<()>` through a forwarding
//! function that casts the opaque pointer back to its concrete type.

use core::ptr;

use crate::io::buffer::SampleBlock;

/// Plain function handle.
#[derive(Clone, Copy)]
pub struct Callback {
    func: fn(&SampleBlock),
}

impl Callback {
    fn noop(_: &SampleBlock) {}

    /// An unbound handle; calling it does nothing.
    pub const fn empty() -> Self {
        Self {
            func: Self::noop,
        }
    }

    /// Bind a function.
    pub const fn new(func: fn(&SampleBlock)) -> Self {
        Self { func }
    }

    /// Invoke the handle with a completed block.
    #[inline(always)]
    pub fn call(&self, block: &SampleBlock) {
        (self.func)(block)
    }
}

impl Default for Callback {
    fn default() -> Self {
        Self::empty()
    }
}

/// Method-like handle: calls `func` against one bound instance of `T`.
pub struct InstanceCallback<T> {
    instance: *mut T,
    func: fn(&mut T, &SampleBlock),
}

impl<T> InstanceCallback<T> {
    fn noop(_: &mut T, _: &SampleBlock) {}

    /// An unbound handle; calling it does nothing.
    pub const fn empty() -> Self {
        Self {
            instance: ptr::null_mut(),
            func: Self::noop,
        }
    }

    /// Bind `func` to `instance`.
    ///
    /// # Safety
    /// `instance` must point to a valid `T` that outlives every invocation
    /// of the handle, and no other reference to it may be live while the
    /// handle is invoked. The handle does not own the instance.
    pub const unsafe fn bind(instance: *mut T, func: fn(&mut T, &SampleBlock)) -> Self {
        Self { instance, func }
    }

    /// Invoke the handle with a completed block. One pointer-null test, no
    /// other overhead.
    #[inline(always)]
    pub fn call(&self, block: &SampleBlock) {
        if !self.instance.is_null() {
            // Note(unsafe): non-null by the check above; validity and
            // exclusivity were guaranteed by the caller of `bind`.
            unsafe { (self.func)(&mut *self.instance, block) }
        }
    }
}

impl<T> Clone for InstanceCallback<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for InstanceCallback<T> {}

impl<T> Default for InstanceCallback<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Function handle carrying an opaque context pointer.
///
/// The most general of the three: holds either a context-free function or a
/// function plus a raw `*mut T` payload. A forwarding function is expected
/// to cast the pointer back to its concrete type.
pub struct ContextCallback<T> {
    context: *mut T,
    func: fn(*mut T, &SampleBlock),
    no_context_func: Option<fn(&SampleBlock)>,
}

impl<T> ContextCallback<T> {
    fn noop(_: *mut T, _: &SampleBlock) {}

    /// An unbound handle; calling it does nothing.
    pub const fn empty() -> Self {
        Self {
            context: ptr::null_mut(),
            func: Self::noop,
            no_context_func: None,
        }
    }

    /// Bind a function that needs no context.
    pub const fn from_fn(func: fn(&SampleBlock)) -> Self {
        Self {
            context: ptr::null_mut(),
            func: Self::noop,
            no_context_func: Some(func),
        }
    }

    /// Bind `func` together with a context pointer that will be passed back
    /// on every invocation.
    ///
    /// # Safety
    /// `context` must remain valid for every invocation of the handle (the
    /// handle does not own it), and `func` must tolerate whatever aliasing
    /// the interrupt priority scheme allows for that pointer.
    pub const unsafe fn with_context(context: *mut T, func: fn(*mut T, &SampleBlock)) -> Self {
        Self {
            context,
            func,
            no_context_func: None,
        }
    }

    /// Invoke the handle with a completed block.
    #[inline(always)]
    pub fn call(&self, block: &SampleBlock) {
        match self.no_context_func {
            Some(func) => func(block),
            None => (self.func)(self.context, block),
        }
    }
}

impl<T> Clone for ContextCallback<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for ContextCallback<T> {}

impl<T> Default for ContextCallback<T> {
    fn default() -> Self {
        Self::empty()
    }
}
