//! The kernel core: a fixed task table, priority-ordered ready queue, and
//! the `schedule()` dispatch loop that ties them together. Lives in
//! [`Kernel`], generic over the [`Platform`] it runs on so the whole
//! subsystem is testable against [`platform::fake::FakePlatform`].

use slopos_abi::config::{IDLE_PID, IDLE_PRIO, MAX_PRIO, MAX_STACK_SIZE_WORDS, MAX_TASKS, MIN_PRIO, RESERVED_FRAME_WORDS};
use slopos_abi::error::{TaskError, TaskResult};
use slopos_abi::task::TaskState;
use slopos_lib::klog_debug;

use crate::msgqueue::MessageQueue;
use crate::pid::PidAllocator;
use crate::platform::{Context, Platform};
use crate::queue::{new_link_arena, LinkArena, TaskId, TaskQueue};
use crate::task::{build_startup_frame, Task, TaskName};

extern "C" fn exit_trampoline() -> ! {
    panic!("exit_trampoline reached without a real context switch");
}

/// The idle task's body: `sti; hlt; cli` forever. Installed as pid 0's
/// entry point by whatever boots the kernel; `Kernel::new` only seeds the
/// task-table slot, it does not arrange for this to actually run, since
/// that requires the real `swtch`/`cli`/`sti` collaborators this crate does
/// not implement.
pub fn idle_loop<P: Platform>(platform: &P) -> ! {
    loop {
        platform.sti(true);
        platform.hlt();
        platform.cli();
    }
}

/// Everything the scheduler and message-queue subsystems share: the task
/// table, the queues threaded through it, and the platform they run on.
pub struct Kernel<P: Platform> {
    platform: P,
    pub(crate) tasks: [Task; MAX_TASKS],
    /// The one link field every task contributes to whichever list it is
    /// currently a member of: ready, sleeping, zombies, waiting-child, or
    /// a message queue's sender/receiver waiter list.
    pub(crate) queue_links: LinkArena,
    /// Each task's position in its parent's children list, independent of
    /// `queue_links`.
    sibling_links: LinkArena,
    pids: PidAllocator,
    pub(crate) current: TaskId,
    ready: TaskQueue,
    sleeping: TaskQueue,
    zombies: TaskQueue,
    waiting_child: TaskQueue,
    pub(crate) queues: [MessageQueue; crate::msgqueue::NBQUEUE],
    /// Monotonically increasing source for every message queue's
    /// `reset_epoch`, shared across all slots so a `pdelete`d id reused by
    /// a later `pcreate` never collides with an epoch a still-blocked
    /// waiter recorded against the old occupant.
    pub(crate) msgq_epoch_counter: u32,
}

impl<P: Platform> Kernel<P> {
    /// Boots with a single idle task occupying slot 0, already `Running`.
    pub fn new(platform: P) -> Self {
        let mut tasks = [Task::empty_slot(); MAX_TASKS];
        tasks[0] = Task {
            pid: IDLE_PID,
            name: TaskName::new("idle"),
            priority: IDLE_PRIO,
            state: TaskState::Running,
            kernel_stack: core::ptr::null_mut(),
            stack_words: 0,
            context: 0,
            wake_time: 0,
            retval: 0,
            parent: None,
            children_head: None,
            msgq_epoch: 0,
            wake_reason: slopos_abi::task::WakeReason::Normal,
        };

        Self {
            platform,
            tasks,
            queue_links: new_link_arena(),
            sibling_links: new_link_arena(),
            pids: PidAllocator::new(),
            current: 0,
            ready: TaskQueue::new(),
            sleeping: TaskQueue::new(),
            zombies: TaskQueue::new(),
            waiting_child: TaskQueue::new(),
            queues: core::array::from_fn(|_| MessageQueue::empty()),
            msgq_epoch_counter: 0,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn current_pid(&self) -> i32 {
        self.tasks[self.current as usize].pid
    }

    /// Alias for [`Self::current_pid`] matching the external API's name.
    pub fn getpid(&self) -> i32 {
        self.current_pid()
    }

    pub fn getprio(&self, pid: i32) -> TaskResult<u16> {
        let id = self.find_task(pid).ok_or(TaskError::NoSuchTask)?;
        Ok(self.tasks[id as usize].priority)
    }

    fn find_task(&self, pid: i32) -> Option<TaskId> {
        self.tasks
            .iter()
            .position(|t| t.is_occupied() && t.pid == pid)
            .map(|i| i as TaskId)
    }

    fn priority_of(&self, id: TaskId) -> u16 {
        self.tasks[id as usize].priority
    }

    /// Insert `id` into the ready queue, highest priority first, FIFO
    /// among equal priorities.
    pub(crate) fn ready_insert(&mut self, id: TaskId) {
        let priority = self.priority_of(id);
        let tasks = &self.tasks;
        self.ready.push_ordered(&mut self.queue_links, id, |other| {
            tasks[other as usize].priority >= priority
        });
    }

    pub(crate) fn set_state(&mut self, id: TaskId, state: TaskState) {
        debug_assert!(self.tasks[id as usize].state.can_transition_to(state));
        self.tasks[id as usize].state = state;
    }

    // ---- task lifecycle -------------------------------------------------

    /// Creates a new child of the current task, schedulable at `priority`.
    /// `stack_size` is the caller's requested stack size in machine words;
    /// the kernel stack actually allocated is `stack_size +
    /// RESERVED_FRAME_WORDS` words, the extra words holding the startup
    /// frame at the top of the stack.
    pub fn start(
        &mut self,
        func: usize,
        stack_size: usize,
        priority: u16,
        name: &str,
        arg: usize,
    ) -> TaskResult<i32> {
        if !(MIN_PRIO..=MAX_PRIO).contains(&priority) {
            return Err(TaskError::InvalidArgument);
        }
        if stack_size > MAX_STACK_SIZE_WORDS {
            return Err(TaskError::InvalidArgument);
        }
        let stack_words = stack_size + RESERVED_FRAME_WORDS;

        let pid = self.pids.alloc().ok_or(TaskError::OutOfMemory)?;
        let slot = pid as TaskId;

        let word_size = core::mem::size_of::<usize>();
        let stack = self.platform.mem_alloc(stack_words * word_size);
        if stack.is_null() {
            self.pids.free(pid);
            return Err(TaskError::OutOfMemory);
        }

        let context = build_startup_frame(stack, stack_words, func, exit_trampoline as usize, arg);
        let parent = self.current;

        self.tasks[slot as usize] = Task {
            pid,
            name: TaskName::new(name),
            priority,
            state: TaskState::Ready,
            kernel_stack: stack,
            stack_words,
            context,
            wake_time: 0,
            retval: 0,
            parent: Some(parent),
            children_head: None,
            msgq_epoch: 0,
            wake_reason: slopos_abi::task::WakeReason::Normal,
        };

        let first_child = self.tasks[parent as usize].children_head;
        self.sibling_links[slot as usize].next = first_child;
        self.sibling_links[slot as usize].prev = None;
        if let Some(first) = first_child {
            self.sibling_links[first as usize].prev = Some(slot);
        }
        self.tasks[parent as usize].children_head = Some(slot);

        self.ready_insert(slot);
        self.maybe_preempt();

        Ok(pid)
    }

    /// Terminates the current task. Never returns. Panics if called from
    /// the idle task, which must never exit.
    pub fn exit(&mut self, retval: i32) -> ! {
        self.terminate_current(retval);
        self.schedule();
        unreachable!("scheduled back into a zombie task");
    }

    /// The state transition `exit` performs before yielding the CPU: mark
    /// the current task a zombie, record its exit value, and wake its
    /// parent if one is already blocked in `waitpid`. Factored out of
    /// `exit` so it can be exercised without driving a real context switch
    /// out from under the caller.
    fn terminate_current(&mut self, retval: i32) {
        let current = self.current;
        if self.tasks[current as usize].pid == IDLE_PID {
            slopos_lib::klog_error!("idle task exited, halting kernel");
            panic!("idle task exited");
        }

        self.tasks[current as usize].retval = retval;
        self.set_state(current, TaskState::Zombie);
        self.zombies.push_back(&mut self.queue_links, current);

        if let Some(parent) = self.tasks[current as usize].parent {
            if self.tasks[parent as usize].state == TaskState::WaitingChild {
                self.waiting_child.remove(&mut self.queue_links, parent);
                self.set_state(parent, TaskState::Ready);
                self.ready_insert(parent);
            }
        }
    }

    /// Blocks until a child matching `target` becomes a zombie, then
    /// reaps it. `target == -1` matches any child; `target > 0` matches
    /// only that pid. Stores the child's exit value through
    /// `retval_out` when non-null.
    pub fn waitpid(&mut self, target: i32, retval_out: *mut i32) -> TaskResult<i32> {
        loop {
            let current = self.current;

            let mut cursor = self.tasks[current as usize].children_head;
            let mut found = None;
            let mut any_match = false;
            while let Some(child) = cursor {
                let child_task = &self.tasks[child as usize];
                if target == -1 || child_task.pid == target {
                    any_match = true;
                    if child_task.state == TaskState::Zombie {
                        found = Some(child);
                        break;
                    }
                }
                cursor = self.sibling_links[child as usize].next;
            }

            if !any_match {
                return Err(TaskError::NoChild);
            }

            if let Some(child) = found {
                let pid = self.tasks[child as usize].pid;
                let retval = self.tasks[child as usize].retval;
                self.free_stack(child);
                self.unlink_sibling(child);
                self.zombies.remove(&mut self.queue_links, child);
                self.pids.free(pid);
                self.tasks[child as usize] = Task::empty_slot();
                if !retval_out.is_null() {
                    // SAFETY: caller guarantees retval_out is valid for writes.
                    unsafe { *retval_out = retval };
                }
                return Ok(pid);
            }

            self.set_state(current, TaskState::WaitingChild);
            self.waiting_child.push_back(&mut self.queue_links, current);
            self.schedule();
        }
    }

    fn unlink_sibling(&mut self, id: TaskId) {
        let (prev, next) = {
            let link = &self.sibling_links[id as usize];
            (link.prev, link.next)
        };
        match prev {
            Some(p) => self.sibling_links[p as usize].next = next,
            None => {
                if let Some(parent) = self.tasks[id as usize].parent {
                    self.tasks[parent as usize].children_head = next;
                }
            }
        }
        if let Some(n) = next {
            self.sibling_links[n as usize].prev = prev;
        }
        self.sibling_links[id as usize] = Default::default();
    }

    /// Releases `id`'s kernel stack back to the platform, if it hasn't
    /// already been released. Idempotent: safe to call on a task whose
    /// stack `free_zombie_tasks` already reclaimed.
    fn free_stack(&mut self, id: TaskId) {
        let task = &mut self.tasks[id as usize];
        if task.kernel_stack.is_null() {
            return;
        }
        let word_size = core::mem::size_of::<usize>();
        let stack = task.kernel_stack;
        let len = task.stack_words * word_size;
        task.kernel_stack = core::ptr::null_mut();
        // SAFETY: `stack` was obtained from `Platform::mem_alloc(len)` in
        // `start` and the null check above ensures we free it at most once.
        unsafe { self.platform.mem_free(stack, len) };
    }

    /// Reclaims the kernel stack of every zombie task still holding one.
    /// Called from `schedule` once the outgoing task is no longer the one
    /// being switched away from (see its step 4): a zombie's stack is only
    /// needed until the switch that takes its task off the CPU for good.
    fn free_zombie_tasks(&mut self) {
        let mut cursor = self.zombies.front();
        while let Some(id) = cursor {
            cursor = self.queue_links[id as usize].next;
            self.free_stack(id);
        }
    }

    /// Removes `id` from whichever kernel-owned or message-queue queue it
    /// currently sits in, based on its recorded state.
    pub(crate) fn unlink_from_current_queue(&mut self, id: TaskId) {
        match self.tasks[id as usize].state {
            TaskState::Ready => self.ready.remove(&mut self.queue_links, id),
            TaskState::Sleeping => self.sleeping.remove(&mut self.queue_links, id),
            TaskState::WaitingChild => self.waiting_child.remove(&mut self.queue_links, id),
            TaskState::WaitingSendMsg | TaskState::WaitingRecvMsg => {
                for q in self.queues.iter_mut() {
                    q.waiting_senders.remove(&mut self.queue_links, id);
                    q.waiting_receivers.remove(&mut self.queue_links, id);
                }
            }
            TaskState::Running | TaskState::Zombie => {}
        }
    }

    /// Terminates an arbitrary task by pid. The idle task cannot be killed.
    pub fn kill(&mut self, pid: i32) -> TaskResult<()> {
        if pid == IDLE_PID {
            return Err(TaskError::PermissionDenied);
        }
        let id = self.find_task(pid).ok_or(TaskError::NoSuchTask)?;
        if self.tasks[id as usize].state == TaskState::Zombie {
            return Err(TaskError::NoSuchTask);
        }
        if id == self.current {
            self.exit(0);
        }

        self.unlink_from_current_queue(id);
        self.tasks[id as usize].retval = 0;
        self.set_state(id, TaskState::Zombie);
        self.zombies.push_back(&mut self.queue_links, id);

        if let Some(parent) = self.tasks[id as usize].parent {
            if self.tasks[parent as usize].state == TaskState::WaitingChild {
                self.waiting_child.remove(&mut self.queue_links, parent);
                self.set_state(parent, TaskState::Ready);
                self.ready_insert(parent);
                self.maybe_preempt();
            }
        }
        Ok(())
    }

    /// Returns the task's previous priority on success. Zombies cannot be
    /// re-prioritised: their queue membership is gone and nothing will ever
    /// observe the change.
    pub fn chprio(&mut self, pid: i32, new_priority: u16) -> TaskResult<u16> {
        if !(MIN_PRIO..=MAX_PRIO).contains(&new_priority) {
            return Err(TaskError::InvalidArgument);
        }
        let id = self.find_task(pid).ok_or(TaskError::NoSuchTask)?;
        if self.tasks[id as usize].state == TaskState::Zombie {
            return Err(TaskError::NoSuchTask);
        }

        let old_priority = self.tasks[id as usize].priority;
        let was_ready = self.tasks[id as usize].state == TaskState::Ready;
        if was_ready {
            self.ready.remove(&mut self.queue_links, id);
        }
        self.tasks[id as usize].priority = new_priority;
        if was_ready {
            self.ready_insert(id);
        }

        self.maybe_preempt();
        Ok(old_priority)
    }

    /// Puts the current task to sleep for `ticks` clock ticks.
    pub fn wait_clock(&mut self, ticks: u64) {
        let current = self.current;
        let now = self.platform.current_clock();
        self.tasks[current as usize].wake_time = now + ticks;
        self.set_state(current, TaskState::Sleeping);

        let tasks = &self.tasks;
        self.sleeping.push_ordered(&mut self.queue_links, current, |other| {
            tasks[other as usize].wake_time <= tasks[current as usize].wake_time
        });

        self.schedule();
    }

    /// Calls `schedule()` only if doing so would actually switch tasks —
    /// used after an operation that might have made a higher-priority
    /// task ready without the current task giving up the CPU.
    pub(crate) fn maybe_preempt(&mut self) {
        let current = self.current;
        if self.tasks[current as usize].state != TaskState::Running {
            return;
        }
        if let Some(head) = self.ready.front() {
            if self.priority_of(head) > self.priority_of(current) {
                self.schedule();
            }
        }
    }

    /// The five-step dispatch: wake sleepers whose time has come, decide
    /// whether a switch is needed, requeue the outgoing task if it is
    /// still runnable, and hand control to the platform's `swtch`.
    pub fn schedule(&mut self) {
        self.wake_sleepers();

        let current = self.current;
        let current_runnable = self.tasks[current as usize].state == TaskState::Running;

        let should_switch = match self.ready.front() {
            Some(head) => !current_runnable || self.priority_of(head) > self.priority_of(current),
            None => !current_runnable,
        };

        if !should_switch {
            return;
        }

        let next = match self.ready.pop_front(&mut self.queue_links) {
            Some(id) => id,
            None => return,
        };

        if current_runnable {
            self.set_state(current, TaskState::Ready);
            self.ready_insert(current);
        }

        self.current = next;
        self.set_state(next, TaskState::Running);

        if self.tasks[current as usize].state != TaskState::Zombie {
            self.free_zombie_tasks();
        }

        let old_ctx = &mut self.tasks[current as usize].context as *mut Context;
        let new_ctx = self.tasks[next as usize].context;
        // SAFETY: `old_ctx` is the context field of the task we are
        // switching away from; `new_ctx` was produced by a prior
        // `build_startup_frame` or an earlier `swtch` into that task.
        unsafe { self.platform.swtch(old_ctx, new_ctx) };
    }

    /// Moves every sleeper whose `wake_time` has arrived onto the ready
    /// queue. Shared between `schedule`'s own housekeeping and the timer
    /// tick's top half, which must do this even on ticks that don't end up
    /// calling `schedule`.
    fn wake_sleepers(&mut self) {
        let now = self.platform.current_clock();
        while let Some(head) = self.sleeping.front() {
            if self.tasks[head as usize].wake_time > now {
                break;
            }
            self.sleeping.pop_front(&mut self.queue_links);
            self.set_state(head, TaskState::Ready);
            self.ready_insert(head);
        }
    }

    /// The timer tick's top half: wake due sleepers, then reschedule only
    /// if preemption is enabled and doing so would actually switch tasks.
    /// The timer interrupt dispatch itself, and the decision of when to
    /// call this, are out of scope for this crate.
    pub fn tick(&mut self) {
        self.wake_sleepers();
        if slopos_lib::is_preemption_disabled() {
            return;
        }
        self.maybe_preempt();
    }

    /// The page-fault policy (spec §4.5): print a diagnostic naming the
    /// faulting task and terminate it with `exit(0)`. The caller (the
    /// out-of-scope ISR dispatch) has already read the faulting address
    /// from the architectural fault-address register; kernel-originating
    /// faults are not distinguished from user ones, a documented
    /// limitation. Never returns: `exit` always reschedules away.
    pub fn handle_page_fault(&mut self, fault_addr: u32) -> ! {
        slopos_lib::klog_error!(
            "[{}] segmentation fault at 0x{:08X}",
            self.tasks[self.current as usize].name.as_str(),
            fault_addr,
        );
        self.exit(0);
    }

    /// Dumps the ready/sleeping/zombie/waiting-child queue contents as pids,
    /// for tests and `klog_debug!`-gated diagnostics. Never called from the
    /// hot scheduling path.
    pub fn debug_dump(&self) {
        klog_debug!(
            "scheduler: current={} ready={} sleeping={} zombies={} waiting_child={}",
            self.current_pid(),
            self.ready.iter(&self.queue_links).count(),
            self.sleeping.iter(&self.queue_links).count(),
            self.zombies.iter(&self.queue_links).count(),
            self.waiting_child.iter(&self.queue_links).count(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake::FakePlatform;

    fn kernel() -> Kernel<FakePlatform> {
        Kernel::new(FakePlatform::new())
    }

    #[test]
    fn idle_is_current_on_boot() {
        let k = kernel();
        assert_eq!(k.current_pid(), IDLE_PID);
    }

    #[test]
    fn starting_a_higher_priority_task_preempts_idle() {
        let mut k = kernel();
        let pid = k.start(0x1000, 64, 10, "worker", 0).unwrap();
        assert_eq!(k.current_pid(), pid);
    }

    #[test]
    fn starting_a_lower_priority_task_does_not_preempt() {
        let mut k = kernel();
        k.tasks[0].priority = 100;
        let pid = k.start(0x1000, 64, 10, "worker", 0).unwrap();
        assert_eq!(k.current_pid(), IDLE_PID);
        assert_eq!(k.getprio(pid).unwrap(), 10);
    }

    #[test]
    fn ready_queue_orders_by_priority_then_fifo() {
        let mut k = kernel();
        k.tasks[0].priority = 200;
        let low = k.start(0x1, 64, 5, "low", 0).unwrap();
        let high = k.start(0x2, 64, 50, "high", 0).unwrap();
        let mid = k.start(0x3, 64, 20, "mid", 0).unwrap();

        k.schedule();
        assert_eq!(k.current_pid(), high);
        k.tasks[k.current as usize].state = TaskState::Ready;
        k.ready_insert(k.current);
        k.schedule();
        assert_eq!(k.current_pid(), mid);
        k.tasks[k.current as usize].state = TaskState::Ready;
        k.ready_insert(k.current);
        k.schedule();
        assert_eq!(k.current_pid(), low);
    }

    #[test]
    fn chprio_reorders_ready_queue_and_can_preempt() {
        let mut k = kernel();
        k.tasks[0].priority = 200;
        let a = k.start(0x1, 64, 10, "a", 0).unwrap();
        let _b = k.start(0x2, 64, 20, "b", 0).unwrap();
        assert_eq!(k.current_pid(), IDLE_PID);

        k.chprio(a, 250).unwrap();
        assert_eq!(k.current_pid(), a);
    }

    #[test]
    fn wait_clock_blocks_until_woken_by_schedule() {
        let mut k = kernel();
        k.tasks[0].priority = 200;
        let worker = k.start(0x1, 64, 10, "worker", 0).unwrap();
        k.schedule();
        assert_eq!(k.current_pid(), worker);

        k.wait_clock(5);
        // swtch is fake, so control "returns" here immediately; the
        // sleeping task is still parked until the clock advances.
        assert_eq!(k.tasks[worker as usize].state, TaskState::Sleeping);

        k.platform().advance_clock(5);
        k.schedule();
        assert_eq!(k.tasks[worker as usize].state, TaskState::Ready);
    }

    #[test]
    fn waitpid_reaps_an_already_exited_child_without_blocking() {
        let mut k = kernel();
        // Idle keeps the default (lowest) priority so starting the child
        // preempts it for real, leaving the child properly off the ready
        // queue and `Running` before it "exits".
        let child = k.start(0x1, 64, 10, "child", 0).unwrap();
        assert_eq!(k.current_pid(), child);

        // `exit` never returns once a real `swtch` lands it back on the
        // CPU; exercise its state transition directly instead of driving
        // the whole call through the fake platform's non-suspending swtch,
        // which would fall through to code that is genuinely unreachable
        // in a real kernel.
        k.terminate_current(42);
        assert_eq!(k.tasks[child as usize].retval, 42);
        assert_eq!(k.tasks[child as usize].state, TaskState::Zombie);

        k.ready.remove(&mut k.queue_links, 0);
        k.current = 0;
        k.tasks[0].state = TaskState::Running;
        let mut out = -99;
        let pid = k.waitpid(-1, &mut out as *mut i32).unwrap();
        assert_eq!(pid, child);
        assert_eq!(out, 42);
    }

    #[test]
    fn waitpid_with_no_children_fails_immediately() {
        let mut k = kernel();
        let mut out = 0;
        assert_eq!(k.waitpid(-1, &mut out as *mut i32), Err(TaskError::NoChild));
    }

    #[test]
    fn exit_wakes_a_parent_already_blocked_in_waitpid() {
        let mut k = kernel();
        k.tasks[0].priority = 200;
        let child = k.start(0x1, 64, 10, "child", 0).unwrap();

        // Idle (the parent) blocks waiting for the still-running child.
        k.current = 0;
        k.tasks[0].state = TaskState::WaitingChild;
        k.waiting_child.push_back(&mut k.queue_links, 0);

        // Hand the CPU to the child by hand, the way `schedule` would:
        // pop it off ready before marking it `Running`.
        k.ready.remove(&mut k.queue_links, child);
        k.current = child;
        k.tasks[child as usize].state = TaskState::Running;
        k.terminate_current(7);

        assert_eq!(k.tasks[0].state, TaskState::Ready);
        assert!(k.waiting_child.is_empty());
    }

    #[test]
    fn kill_reaps_target_into_zombie_queue() {
        let mut k = kernel();
        k.tasks[0].priority = 200;
        let victim = k.start(0x1, 64, 10, "victim", 0).unwrap();
        k.kill(victim).unwrap();
        assert_eq!(k.tasks[victim as usize].state, TaskState::Zombie);
    }

    #[test]
    fn idle_cannot_be_killed() {
        let mut k = kernel();
        assert_eq!(k.kill(IDLE_PID), Err(TaskError::PermissionDenied));
    }

    #[test]
    fn page_fault_kills_only_the_faulting_task() {
        let mut k = kernel();
        k.tasks[0].priority = 200;
        let faulter = k.start(0x1, 64, 10, "faulter", 0).unwrap();
        let other = k.start(0x2, 64, 5, "other", 0).unwrap();

        // `handle_page_fault` ends in the same never-really-returns `exit`
        // tail exercised above; drive its state transition through
        // `terminate_current` rather than the full call.
        k.ready.remove(&mut k.queue_links, faulter);
        k.current = faulter;
        k.tasks[faulter as usize].state = TaskState::Running;
        k.terminate_current(0);

        assert_eq!(k.tasks[faulter as usize].state, TaskState::Zombie);
        assert_eq!(k.tasks[faulter as usize].retval, 0);
        assert_eq!(k.tasks[other as usize].state, TaskState::Ready);
    }
}
