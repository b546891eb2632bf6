//! Compile-time sizing constants for the task, paging, and message-queue
//! subsystems. Centralised here so call sites never carry a bare magic
//! number — mirrors how the reference ABI crate centralises sizing.

/// Maximum number of live tasks (including the idle task). Bounds the
/// task table, the PID space, and every fixed-capacity queue below.
pub const MAX_TASKS: usize = 64;

/// PID 0 is reserved for the idle task and is never handed out by the
/// pid allocator.
pub const IDLE_PID: i32 = 0;

/// Sentinel returned by a PID allocator when the PID space is exhausted.
pub const INVALID_PID: i32 = -1;

/// Lowest legal task priority. Higher numeric values are more urgent.
pub const MIN_PRIO: u16 = 1;

/// Highest legal task priority.
pub const MAX_PRIO: u16 = 255;

/// Priority assigned to the idle task. Always the least urgent.
pub const IDLE_PRIO: u16 = MIN_PRIO;

/// Bound on a task's human-readable name, in printable characters.
pub const TASK_NAME_MAX_LEN: usize = 16;

/// Extra machine words reserved at the top of every kernel stack to hold
/// the hand-crafted startup frame (or, after the first switch, whatever
/// the switch primitive's callee-saved set requires).
///
/// The canonical layout (stack top downward) is:
/// `[edi, esi, ebp, esp-slot, ebx, func, __exit, arg]` — 8 words.
pub const RESERVED_FRAME_WORDS: usize = 8;

/// Largest stack size, in machine words, a caller of `start` may request.
pub const MAX_STACK_SIZE_WORDS: usize = 4096;

/// Number of message-queue slots in the global table.
pub const NBQUEUE: usize = 20;

/// Largest capacity a single message queue may be created with.
pub const MSG_QUEUE_CAPACITY_MAX: usize = 64;

/// Maximum number of tasks that may simultaneously block on one message
/// queue's sender or receiver list.
pub const MSG_QUEUE_MAX_WAITERS: usize = MAX_TASKS;
