//! Kernel error codes.
//!
//! The external API (`§6`) returns small negative `c_int` values with the
//! standard POSIX-ish meanings, the same convention the reference
//! kernel's userland syscall layer uses (`SyscallError`). Internally each
//! subsystem matches on a typed enum; only the public entry points
//! collapse it to the raw integer.

use core::fmt;

pub const EPERM: i32 = 1;
pub const ESRCH: i32 = 3;
pub const EAGAIN: i32 = 11;
pub const ENOMEM: i32 = 12;
pub const EINVAL: i32 = 22;
pub const EPIPE: i32 = 32;
pub const EINTR: i32 = 4;
pub const ECHILD: i32 = 10;

/// Errors raised by the task lifecycle operations (`start`, `waitpid`,
/// `kill`, `chprio`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskError {
    /// Priority, pid, or stack size out of range.
    InvalidArgument,
    /// No task exists for the given pid, or the idle task was named
    /// where a real task was required.
    NoSuchTask,
    /// No matching child to wait for.
    NoChild,
    /// Attempted to kill the idle task.
    PermissionDenied,
    /// Task or stack allocation failed.
    OutOfMemory,
}

impl TaskError {
    pub const fn errno(self) -> i32 {
        match self {
            TaskError::InvalidArgument => -EINVAL,
            TaskError::NoSuchTask => -ESRCH,
            TaskError::NoChild => -ECHILD,
            TaskError::PermissionDenied => -EPERM,
            TaskError::OutOfMemory => -ENOMEM,
        }
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            TaskError::InvalidArgument => "invalid argument",
            TaskError::NoSuchTask => "no such task",
            TaskError::NoChild => "no child to wait for",
            TaskError::PermissionDenied => "operation not permitted",
            TaskError::OutOfMemory => "out of memory",
        };
        f.write_str(msg)
    }
}

pub type TaskResult<T> = Result<T, TaskError>;

/// Errors raised by the message-queue operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgQueueError {
    /// Bad queue id, or a non-positive `capacity` passed to `pcreate`.
    InvalidArgument,
    /// `pcreate` found no free slot in the queue table.
    NoFreeSlot,
    /// A blocked sender or receiver was woken because `preset` ran.
    Reset,
    /// A blocked sender or receiver was woken because `pdelete` ran.
    Deleted,
}

impl MsgQueueError {
    pub const fn errno(self) -> i32 {
        match self {
            MsgQueueError::InvalidArgument => -EINVAL,
            MsgQueueError::NoFreeSlot => -EAGAIN,
            MsgQueueError::Reset => -EINTR,
            MsgQueueError::Deleted => -EPIPE,
        }
    }
}

impl fmt::Display for MsgQueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            MsgQueueError::InvalidArgument => "invalid queue argument",
            MsgQueueError::NoFreeSlot => "no free message queue slot",
            MsgQueueError::Reset => "queue was reset while blocked",
            MsgQueueError::Deleted => "queue was deleted while blocked",
        };
        f.write_str(msg)
    }
}

pub type MsgQueueResult<T> = Result<T, MsgQueueError>;
