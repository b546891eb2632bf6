//! Kernel-internal ABI types shared between the task, paging, and
//! message-queue subsystems.
//!
//! Having a single source of truth for these types eliminates duplicate
//! constants and keeps the three subsystems agreeing on sizes without a
//! circular dependency between their crates.
//!
//! All types in this crate are plain data: no unsafe code, no I/O.

#![no_std]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod msgqueue;
pub mod task;

pub use config::*;
pub use error::*;
pub use msgqueue::*;
pub use task::*;
