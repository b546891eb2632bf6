//! Preemption control.
//!
//! RAII-based preemption guards leveraging Rust's type system for
//! compile-time safety. Inspired by Linux's preempt_disable/enable.
//!
//! Unlike an SMP kernel, there is exactly one preemption counter here —
//! no per-CPU record to index into — since the core this crate supports
//! never runs more than one hardware thread.

use core::marker::PhantomData;
use core::ptr;
use core::sync::atomic::{AtomicPtr, AtomicU32, Ordering};

static PREEMPT_COUNT: AtomicU32 = AtomicU32::new(0);
static RESCHEDULE_PENDING: AtomicU32 = AtomicU32::new(0);
static RESCHEDULE_CALLBACK: AtomicPtr<()> = AtomicPtr::new(ptr::null_mut());

/// RAII guard that disables preemption while held.
/// Guards are nestable — preemption re-enables only when all guards drop.
#[must_use = "if unused, preemption will be immediately re-enabled"]
pub struct PreemptGuard {
    _marker: PhantomData<*mut ()>,
}

impl PreemptGuard {
    #[inline]
    pub fn new() -> Self {
        PREEMPT_COUNT.fetch_add(1, Ordering::Relaxed);
        Self {
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn is_active() -> bool {
        PREEMPT_COUNT.load(Ordering::Relaxed) > 0
    }

    #[inline]
    pub fn count() -> u32 {
        PREEMPT_COUNT.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_reschedule_pending() {
        RESCHEDULE_PENDING.store(1, Ordering::Release);
    }

    #[inline]
    pub fn is_reschedule_pending() -> bool {
        RESCHEDULE_PENDING.load(Ordering::Acquire) != 0
    }

    #[inline]
    pub fn clear_reschedule_pending() {
        RESCHEDULE_PENDING.store(0, Ordering::Release);
    }
}

impl Default for PreemptGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PreemptGuard {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: Only accessing atomic fields on the current CPU's PCR.
        let prev = PREEMPT_COUNT.fetch_sub(1, Ordering::Release);
        debug_assert!(prev > 0, "preempt_count underflow");

        if prev == 1 && RESCHEDULE_PENDING.swap(0, Ordering::AcqRel) != 0 {
            let fn_ptr = RESCHEDULE_CALLBACK.load(Ordering::Acquire);
            if !fn_ptr.is_null() {
                // SAFETY: fn_ptr was set via register_reschedule_callback with a valid fn()
                let callback: fn() = unsafe { core::mem::transmute(fn_ptr) };
                callback();
            }
        }
    }
}

pub fn register_reschedule_callback(callback: fn()) {
    RESCHEDULE_CALLBACK.store(callback as *mut (), Ordering::Release);
}

#[inline]
pub fn is_preemption_disabled() -> bool {
    PreemptGuard::is_active()
}

#[inline]
pub fn preempt_count() -> u32 {
    PreemptGuard::count()
}
