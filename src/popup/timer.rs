// SPDX-License-Identifier: MPL-2.0
//! Single-threaded deferred task queue.
//!
//! `TimerQueue` keeps its own monotonic clock, expressed as the time elapsed
//! since the queue was created. Tasks are scheduled relative to that clock
//! and handed back by [`TimerQueue::pop_due`] in due order; tasks sharing a
//! due time come back in the order they were scheduled. Nothing runs on its
//! own: the owner advances the clock and executes whatever is due.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

/// Handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Queue of tasks waiting for their due time.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_seq: u64,
    /// Min-heap of (due, seq). Cancelled entries stay here until popped.
    deadlines: BinaryHeap<Reverse<(Duration, u64)>>,
    tasks: HashMap<u64, T>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            deadlines: BinaryHeap::new(),
            tasks: HashMap::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position of the queue clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Moves the clock forward. The clock never goes backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Schedules `task` to become due `delay` after the current clock.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.deadlines.push(Reverse((self.now + delay, seq)));
        self.tasks.insert(seq, task);
        TimerId(seq)
    }

    /// Cancels a scheduled task.
    ///
    /// Returns `false` if the task already fired or was cancelled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.tasks.remove(&id.0).is_some()
    }

    /// Returns whether the task behind `id` is still waiting.
    #[must_use]
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.tasks.contains_key(&id.0)
    }

    /// Pops the next task due at or before `deadline`.
    ///
    /// The clock is moved to the task's due time before returning it, so
    /// tasks scheduled while handling it are timed from that point.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<T> {
        while let Some(Reverse((due, seq))) = self.deadlines.peek().copied() {
            if due > deadline {
                return None;
            }
            self.deadlines.pop();
            if let Some(task) = self.tasks.remove(&seq) {
                self.set_now(due);
                return Some(task);
            }
        }
        None
    }

    /// Number of tasks still waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
