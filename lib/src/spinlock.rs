use core::cell::UnsafeCell;
use core::hint::spin_loop;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use crate::preempt::PreemptGuard;

/// Mutex guarding kernel state that is touched from both ordinary task
/// context and the scheduler's own critical sections.
///
/// This crate has no notion of CPU interrupt flags — that primitive is an
/// out-of-scope external collaborator (see the platform boundary in the
/// `core` crate). `IrqMutex` contributes the piece that belongs at this
/// layer: a fair, nestable mutual-exclusion primitive. Callers that must
/// also keep interrupts masked across the critical section pair this with
/// the platform's own critical-section guard; on a single-CPU kernel the
/// ticket lock below never actually spins except briefly while preemption
/// is re-entered from an interrupt handler.
///
/// Uses a ticket lock for FIFO fairness: each acquirer takes a
/// monotonically-increasing ticket and spins until `now_serving` matches.
///
/// Supports poisoning semantics for panic recovery: after a panic-time
/// force-unlock via `poison_unlock()`, the mutex is marked poisoned.
/// Callers can check `is_poisoned()` to determine if the protected data
/// may be in an inconsistent state and needs reinitialization.
pub struct IrqMutex<T> {
    next_ticket: AtomicU16,
    now_serving: AtomicU16,
    poisoned: AtomicBool,
    data: UnsafeCell<T>,
}

// SAFETY: IrqMutex provides exclusive access through ticket-lock acquisition.
unsafe impl<T: Send> Send for IrqMutex<T> {}
unsafe impl<T: Send> Sync for IrqMutex<T> {}

pub struct IrqMutexGuard<'a, T> {
    mutex: &'a IrqMutex<T>,
    _preempt: PreemptGuard,
}

impl<T> IrqMutex<T> {
    #[inline]
    pub const fn new(data: T) -> Self {
        Self {
            next_ticket: AtomicU16::new(0),
            now_serving: AtomicU16::new(0),
            poisoned: AtomicBool::new(false),
            data: UnsafeCell::new(data),
        }
    }

    /// Force unlock the mutex without proper guard handling.
    ///
    /// # Safety
    /// Only safe when the caller knows no code is currently executing with
    /// this lock held and the protected data is in a consistent state (or
    /// will be reinitialized before further use).
    #[inline]
    pub unsafe fn force_unlock(&self) {
        self.now_serving
            .store(self.next_ticket.load(Ordering::Relaxed), Ordering::Release);
    }

    /// Force unlock and mark the mutex poisoned.
    ///
    /// # Safety
    /// Same requirements as [`Self::force_unlock`].
    #[inline]
    pub unsafe fn poison_unlock(&self) {
        self.poisoned.store(true, Ordering::Release);
        self.now_serving
            .store(self.next_ticket.load(Ordering::Relaxed), Ordering::Release);
    }

    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned.load(Ordering::Acquire)
    }

    #[inline]
    pub fn clear_poison(&self) {
        self.poisoned.store(false, Ordering::Release);
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        let next = self.next_ticket.load(Ordering::Relaxed);
        let serving = self.now_serving.load(Ordering::Relaxed);
        next != serving
    }

    #[inline]
    pub fn lock(&self) -> IrqMutexGuard<'_, T> {
        let preempt = PreemptGuard::new();
        let my_ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        loop {
            let serving = self.now_serving.load(Ordering::Acquire);
            if serving == my_ticket {
                break;
            }
            let distance = my_ticket.wrapping_sub(serving) as u32;
            for _ in 0..distance.min(64) {
                spin_loop();
            }
        }
        IrqMutexGuard {
            mutex: self,
            _preempt: preempt,
        }
    }

    #[inline]
    pub fn try_lock(&self) -> Option<IrqMutexGuard<'_, T>> {
        let preempt = PreemptGuard::new();
        let current = self.now_serving.load(Ordering::Relaxed);
        if self
            .next_ticket
            .compare_exchange(
                current,
                current.wrapping_add(1),
                Ordering::Acquire,
                Ordering::Relaxed,
            )
            .is_ok()
        {
            Some(IrqMutexGuard {
                mutex: self,
                _preempt: preempt,
            })
        } else {
            drop(preempt);
            None
        }
    }
}

impl<'a, T> Deref for IrqMutexGuard<'a, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        unsafe { &*self.mutex.data.get() }
    }
}

impl<'a, T> DerefMut for IrqMutexGuard<'a, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<'a, T> Drop for IrqMutexGuard<'a, T> {
    #[inline]
    fn drop(&mut self) {
        self.mutex.now_serving.fetch_add(1, Ordering::Release);
        // _preempt drops after this, potentially triggering a deferred reschedule.
    }
}
