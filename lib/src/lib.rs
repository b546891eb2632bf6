#![cfg_attr(not(test), no_std)]

//! Ambient engineering stack shared by the task, paging, and message-queue
//! subsystems: structured logging, preemption bookkeeping, locking, and
//! small `no_std`-safe formatting/alignment helpers. Nothing in this crate
//! knows about tasks, page tables, or queues — it is the substrate the
//! `core` and `mm` crates are built on.

pub mod alignment;
pub mod klog;
pub mod numfmt;
pub mod preempt;
pub mod ring_buffer;
pub mod spinlock;

#[doc(hidden)]
pub use paste;

pub use alignment::{align_down_u32, align_down_u64, align_down_usize, align_up_u32, align_up_u64, align_up_usize};
pub use alignment::{align_down_usize as align_down, align_up_usize as align_up};
pub use klog::{
    KlogLevel, klog_get_level, klog_init, klog_is_enabled, klog_register_backend, klog_set_level,
};
pub use preempt::{PreemptGuard, is_preemption_disabled, preempt_count};
pub use ring_buffer::RingBuffer;
pub use spinlock::{IrqMutex, IrqMutexGuard};
