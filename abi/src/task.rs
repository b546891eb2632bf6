//! Task state machine shared by the scheduler and the task lifecycle
//! operations.

/// The state of a schedulable task.
///
/// A task's `state` and its queue membership always agree (see the data
/// model invariants): `Ready` tasks are on the ready queue, `Sleeping`
/// tasks on the sleep queue, and so on. There is deliberately no
/// "unallocated slot" variant here — the task table tracks slot
/// occupancy separately, so this enum matches the state diagram exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TaskState {
    Running = 0,
    Ready = 1,
    Sleeping = 2,
    WaitingSendMsg = 3,
    WaitingRecvMsg = 4,
    WaitingChild = 5,
    Zombie = 6,
}

impl TaskState {
    /// Validates a transition against the state diagram in the task
    /// lifecycle design. Used defensively at every state-changing call
    /// site so a logic error trips an assertion instead of silently
    /// corrupting queue membership.
    pub fn can_transition_to(self, next: TaskState) -> bool {
        use TaskState::*;
        match (self, next) {
            (Ready, Running) => true,
            (Running, Ready) => true,
            (Running, Sleeping) => true,
            (Running, WaitingChild) => true,
            (Running, WaitingSendMsg) => true,
            (Running, WaitingRecvMsg) => true,
            (Running, Zombie) => true,
            (Sleeping, Ready) => true,
            (WaitingChild, Ready) => true,
            (WaitingSendMsg, Ready) => true,
            (WaitingRecvMsg, Ready) => true,
            // A blocked task can also be killed directly into Zombie.
            (Sleeping, Zombie) => true,
            (WaitingChild, Zombie) => true,
            (WaitingSendMsg, Zombie) => true,
            (WaitingRecvMsg, Zombie) => true,
            (Ready, Zombie) => true,
            _ => false,
        }
    }

    pub fn is_blocked(self) -> bool {
        matches!(
            self,
            TaskState::Sleeping
                | TaskState::WaitingChild
                | TaskState::WaitingSendMsg
                | TaskState::WaitingRecvMsg
        )
    }
}

/// The reason the scheduler woke a task that was blocked on a message
/// queue, passed back through the blocking call's return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeReason {
    /// Woken because the rendezvous completed normally.
    Normal,
    /// Woken because the queue was reset (`preset`) while blocked.
    Reset,
    /// Woken because the queue was destroyed (`pdelete`) while blocked.
    Deleted,
}
