//! Intrusive doubly linked task lists, arena-style.
//!
//! Each task has exactly one `queue_link` (shared across the ready, sleep,
//! zombie, waiting-child, and per-message-queue waiter lists — a task is on
//! at most one of them at a time) and one `sibling_link` (its position in
//! its parent's children list, independent of `queue_link`). Rather than
//! embed these in the `Task` struct and fight the borrow checker over
//! `&mut Task` aliasing, the links for a whole list kind live in their own
//! flat array, indexed by task id — the "arena+index pair" the design notes
//! call for. `TaskQueue` itself only stores a head/tail pair.

use slopos_abi::config::MAX_TASKS;

pub type TaskId = u32;

#[derive(Clone, Copy, Default)]
pub struct Link {
    pub prev: Option<TaskId>,
    pub next: Option<TaskId>,
}

impl Link {
    pub const fn new() -> Self {
        Self {
            prev: None,
            next: None,
        }
    }
}

pub type LinkArena = [Link; MAX_TASKS];

pub const fn new_link_arena() -> LinkArena {
    [Link::new(); MAX_TASKS]
}

/// A FIFO or priority-ordered list of tasks.
#[derive(Clone, Copy, Default)]
pub struct TaskQueue {
    head: Option<TaskId>,
    tail: Option<TaskId>,
}

impl TaskQueue {
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn front(&self) -> Option<TaskId> {
        self.head
    }

    pub fn push_back(&mut self, links: &mut LinkArena, id: TaskId) {
        links[id as usize].prev = self.tail;
        links[id as usize].next = None;
        match self.tail {
            Some(tail) => links[tail as usize].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    /// Insert `id` just before the first existing entry for which
    /// `keep_before` returns `false`. FIFO among entries that all return
    /// `true` (a priority queue with FIFO tie-breaking, for instance).
    pub fn push_ordered(
        &mut self,
        links: &mut LinkArena,
        id: TaskId,
        mut keep_before: impl FnMut(TaskId) -> bool,
    ) {
        let mut cursor = self.head;
        while let Some(candidate) = cursor {
            if !keep_before(candidate) {
                break;
            }
            cursor = links[candidate as usize].next;
        }

        match cursor {
            None => self.push_back(links, id),
            Some(before) => {
                let prev = links[before as usize].prev;
                links[id as usize].prev = prev;
                links[id as usize].next = Some(before);
                links[before as usize].prev = Some(id);
                match prev {
                    Some(prev_id) => links[prev_id as usize].next = Some(id),
                    None => self.head = Some(id),
                }
            }
        }
    }

    /// Remove `id` from wherever it sits in the list. Safe to call even if
    /// `id` is not currently linked into this particular queue, as long as
    /// its link slot is quiescent (not linked into any queue at all).
    pub fn remove(&mut self, links: &mut LinkArena, id: TaskId) {
        let (prev, next) = {
            let link = &links[id as usize];
            (link.prev, link.next)
        };

        match prev {
            Some(prev_id) => links[prev_id as usize].next = next,
            None => {
                if self.head == Some(id) {
                    self.head = next;
                }
            }
        }
        match next {
            Some(next_id) => links[next_id as usize].prev = prev,
            None => {
                if self.tail == Some(id) {
                    self.tail = prev;
                }
            }
        }

        links[id as usize].prev = None;
        links[id as usize].next = None;
    }

    pub fn pop_front(&mut self, links: &mut LinkArena) -> Option<TaskId> {
        let id = self.head?;
        self.remove(links, id);
        Some(id)
    }

    /// Iterate the list front-to-back without mutating it.
    pub fn iter<'a>(&self, links: &'a LinkArena) -> TaskQueueIter<'a> {
        TaskQueueIter {
            links,
            cursor: self.head,
        }
    }
}

pub struct TaskQueueIter<'a> {
    links: &'a LinkArena,
    cursor: Option<TaskId>,
}

impl<'a> Iterator for TaskQueueIter<'a> {
    type Item = TaskId;

    fn next(&mut self) -> Option<TaskId> {
        let id = self.cursor?;
        self.cursor = self.links[id as usize].next;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_back_then_pop_front_is_fifo() {
        let mut links = new_link_arena();
        let mut q = TaskQueue::new();
        q.push_back(&mut links, 1);
        q.push_back(&mut links, 2);
        q.push_back(&mut links, 3);

        assert_eq!(q.pop_front(&mut links), Some(1));
        assert_eq!(q.pop_front(&mut links), Some(2));
        assert_eq!(q.pop_front(&mut links), Some(3));
        assert_eq!(q.pop_front(&mut links), None);
    }

    #[test]
    fn remove_from_middle_preserves_order() {
        let mut links = new_link_arena();
        let mut q = TaskQueue::new();
        q.push_back(&mut links, 1);
        q.push_back(&mut links, 2);
        q.push_back(&mut links, 3);

        q.remove(&mut links, 2);

        assert_eq!(q.pop_front(&mut links), Some(1));
        assert_eq!(q.pop_front(&mut links), Some(3));
    }

    #[test]
    fn push_ordered_respects_priority_then_fifo() {
        // Higher "priority" (here, the id itself) sorts first.
        let mut links = new_link_arena();
        let priority = [0u32, 30, 10, 10, 20];
        let mut q = TaskQueue::new();

        for id in [1u32, 2, 3, 4] {
            q.push_ordered(&mut links, id, |existing| priority[existing as usize] >= priority[id as usize]);
        }

        let order: std::vec::Vec<TaskId> = q.iter(&links).collect();
        assert_eq!(order, std::vec![2, 4, 3, 1]);
    }
}
