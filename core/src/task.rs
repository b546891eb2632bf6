//! The `Task` control block and the hand-crafted startup frame that gives
//! a brand new task something to `swtch` into.

use slopos_abi::config::{RESERVED_FRAME_WORDS, TASK_NAME_MAX_LEN};
use slopos_abi::task::{TaskState, WakeReason};

use crate::platform::Context;
use crate::queue::TaskId;

/// A task's human-readable name: up to [`TASK_NAME_MAX_LEN`] bytes, stored
/// inline so the task table never allocates for it.
#[derive(Clone, Copy)]
pub struct TaskName {
    bytes: [u8; TASK_NAME_MAX_LEN],
    len: u8,
}

impl TaskName {
    pub const EMPTY: TaskName = TaskName {
        bytes: [0; TASK_NAME_MAX_LEN],
        len: 0,
    };

    /// Truncates to `TASK_NAME_MAX_LEN` bytes. Does not validate UTF-8
    /// boundaries at the truncation point; callers pass short ASCII
    /// identifiers in practice.
    pub fn new(name: &str) -> Self {
        let src = name.as_bytes();
        let len = src.len().min(TASK_NAME_MAX_LEN);
        let mut bytes = [0u8; TASK_NAME_MAX_LEN];
        bytes[..len].copy_from_slice(&src[..len]);
        Self {
            bytes,
            len: len as u8,
        }
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or("")
    }
}

/// One entry in the fixed-size task table.
///
/// `queue_link` and `sibling_link` are not stored here — they live in the
/// kernel's [`crate::queue::LinkArena`]s, indexed by this task's slot, so
/// that mutating a task's own fields and relinking it into a queue never
/// need overlapping `&mut` borrows of the same struct.
pub struct Task {
    pub pid: i32,
    pub name: TaskName,
    pub priority: u16,
    pub state: TaskState,
    /// Raw kernel stack obtained from `Platform::mem_alloc`, `stack_words`
    /// machine words long including the [`RESERVED_FRAME_WORDS`]-word
    /// startup frame at its top.
    pub kernel_stack: *mut u8,
    pub stack_words: usize,
    pub context: Context,
    pub wake_time: u64,
    pub retval: i32,
    pub parent: Option<TaskId>,
    /// Head of this task's own children list (threaded through every
    /// child's `sibling_link`).
    pub children_head: Option<TaskId>,
    /// The message queue's `reset_epoch` at the moment this task blocked in
    /// `psend`/`preceive`, so the resumed call can tell a normal rendezvous
    /// apart from a `preset` that ran while it slept.
    pub msgq_epoch: u32,
    /// Why the scheduler last moved this task out of a message-queue wait
    /// state. Read once, immediately after the blocking call resumes.
    pub wake_reason: WakeReason,
}

impl Task {
    pub const fn empty_slot() -> Self {
        Self {
            pid: -1,
            name: TaskName::EMPTY,
            priority: 0,
            state: TaskState::Zombie,
            kernel_stack: core::ptr::null_mut(),
            stack_words: 0,
            context: 0,
            wake_time: 0,
            retval: 0,
            parent: None,
            children_head: None,
            msgq_epoch: 0,
            wake_reason: WakeReason::Normal,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.pid >= 0
    }
}

/// Builds the canonical startup frame at the top of a fresh kernel stack
/// and returns the `context` value that, handed to `Platform::swtch`,
/// resumes execution in `func(arg)`.
///
/// Stack top downward the frame holds `[edi, esi, ebp, esp-slot, ebx,
/// func, __exit, arg]` — eight words. `swtch`'s callee-saved restore pops
/// `edi`, `esi`, `ebp`, and `ebx` (the `esp-slot` sits where the restored
/// stack pointer itself is read from), then returns into `func` with
/// `__exit` left as `func`'s own return address and `arg` as its sole
/// parameter. A task that returns from `func` normally therefore "returns"
/// into `__exit`, which is how exit-on-return is implemented without the
/// task itself calling anything.
///
/// `stack` must be at least `RESERVED_FRAME_WORDS` machine words
/// (`usize`-sized) long; `stack_words` is the stack's total length in
/// words.
pub fn build_startup_frame(
    stack: *mut u8,
    stack_words: usize,
    func: usize,
    exit_trampoline: usize,
    arg: usize,
) -> Context {
    assert!(stack_words >= RESERVED_FRAME_WORDS, "stack too small for startup frame");

    let word_size = core::mem::size_of::<usize>();
    // SAFETY: `stack` is `stack_words` words long and we only ever touch
    // the last RESERVED_FRAME_WORDS of it, all within bounds.
    let base = unsafe { stack.add((stack_words - RESERVED_FRAME_WORDS) * word_size) } as *mut usize;

    let edi = 0usize;
    let esi = 0usize;
    let ebp = 0usize;
    let ebx = 0usize;
    // Points at `func`'s slot: the word `swtch` treats as the return
    // address once the four callee-saved registers above it are popped.
    let esp_slot = base as usize + 4 * word_size;

    let frame = [edi, esi, ebp, esp_slot, ebx, func, exit_trampoline, arg];
    for (i, word) in frame.iter().enumerate() {
        // SAFETY: `base` has room for RESERVED_FRAME_WORDS words.
        unsafe { base.add(i).write(*word) };
    }

    base as Context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_name_truncates_to_max_len() {
        let long = "a".repeat(TASK_NAME_MAX_LEN + 5);
        let name = TaskName::new(&long);
        assert_eq!(name.as_str().len(), TASK_NAME_MAX_LEN);
    }

    #[test]
    fn task_name_round_trips_short_names() {
        let name = TaskName::new("idle");
        assert_eq!(name.as_str(), "idle");
    }

    #[test]
    fn startup_frame_places_func_and_exit_and_arg() {
        let stack_words = RESERVED_FRAME_WORDS + 16;
        let mut stack = std::vec![0u8; stack_words * core::mem::size_of::<usize>()];
        let func = 0xDEAD_BEEFusize;
        let exit_trampoline = 0xC0FF_EEusize;
        let arg = 0x42usize;

        let ctx = build_startup_frame(stack.as_mut_ptr(), stack_words, func, exit_trampoline, arg);

        let base = ctx as *const usize;
        let words: std::vec::Vec<usize> =
            (0..RESERVED_FRAME_WORDS).map(|i| unsafe { *base.add(i) }).collect();

        assert_eq!(words[3], ctx + 4 * core::mem::size_of::<usize>());
        assert_eq!(words[5], func);
        assert_eq!(words[6], exit_trampoline);
        assert_eq!(words[7], arg);
    }

    #[test]
    #[should_panic(expected = "stack too small")]
    fn startup_frame_rejects_undersized_stack() {
        let mut stack = std::vec![0u8; 4 * core::mem::size_of::<usize>()];
        build_startup_frame(stack.as_mut_ptr(), 4, 0, 0, 0);
    }
}
