//! Fallible allocation of queue nodes and their strings.
//!
//! Everything the queue allocates goes through [`try_alloc`] and [`try_dup`],
//! so an allocation failure is reported as
//! [`QueueError::AllocationFailure`] instead of aborting the process.
//!
//! With the `fault-injection` feature, [`fail_after`] makes a chosen
//! allocation fail on purpose, which is how drivers exercise the
//! "queue unchanged on failure" guarantee.

use crate::error::QueueError;
use std::alloc::{self as sys, Layout};
use std::mem::MaybeUninit;
use std::ptr::NonNull;

#[cfg(any(test, feature = "fault-injection"))]
mod fault {
    use std::cell::Cell;

    thread_local! {
        static COUNTDOWN: Cell<Option<usize>> = Cell::new(None);
    }

    /// Make the `n`-th following allocation on this thread fail (`0` is the
    /// very next one). The failure fires once, then allocations succeed again.
    pub fn fail_after(n: usize) {
        COUNTDOWN.with(|c| c.set(Some(n)));
    }

    /// Cancel a pending [`fail_after`].
    pub fn clear_failure() {
        COUNTDOWN.with(|c| c.set(None));
    }

    pub(super) fn should_fail() -> bool {
        COUNTDOWN.with(|c| match c.get() {
            Some(0) => {
                c.set(None);
                true
            }
            Some(n) => {
                c.set(Some(n - 1));
                false
            }
            None => false,
        })
    }
}

#[cfg(any(test, feature = "fault-injection"))]
pub use fault::{clear_failure, fail_after};

#[cfg(any(test, feature = "fault-injection"))]
fn check_injected(layout: Layout) -> Result<(), QueueError> {
    if fault::should_fail() {
        return Err(QueueError::alloc(layout));
    }
    Ok(())
}

#[cfg(not(any(test, feature = "fault-injection")))]
#[inline(always)]
fn check_injected(_layout: Layout) -> Result<(), QueueError> {
    Ok(())
}

/// Allocate uninitialized storage for one `T` from the global allocator.
///
/// The storage has the layout of `Box<T>`, so once initialized it may be
/// handed to `Box::from_raw`.
pub(crate) fn try_alloc<T>() -> Result<NonNull<MaybeUninit<T>>, QueueError> {
    let layout = Layout::new::<T>();
    debug_assert_ne!(layout.size(), 0, "queue nodes are never zero-sized");
    check_injected(layout)?;
    // SAFETY: `layout` has a non-zero size.
    let ptr = unsafe { sys::alloc(layout) };
    NonNull::new(ptr.cast()).ok_or_else(|| QueueError::alloc(layout))
}

/// Give back storage obtained from [`try_alloc`] that was never initialized.
///
/// # Safety
///
/// `ptr` must come from `try_alloc::<T>()` and must not be used afterwards.
pub(crate) unsafe fn dealloc<T>(ptr: NonNull<MaybeUninit<T>>) {
    sys::dealloc(ptr.as_ptr().cast(), Layout::new::<T>());
}

/// Duplicate `s` into a freshly allocated `String` of exactly its length.
pub(crate) fn try_dup(s: &str) -> Result<String, QueueError> {
    let layout = Layout::for_value(s.as_bytes());
    check_injected(layout)?;
    let mut value = String::new();
    value
        .try_reserve_exact(s.len())
        .map_err(|_| QueueError::alloc(layout))?;
    value.push_str(s);
    Ok(value)
}
