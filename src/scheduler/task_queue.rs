// src/scheduler/task_queue.rs
//! Virtual-time task queue.
//!
//! Tasks are ordered by due time, then by insertion order, so two tasks due
//! at the same instant run in the order they were scheduled. The queue keeps
//! its own clock; it only moves forward, and only when the owner says so.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

/// A task waiting in the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled<T> {
    /// Virtual time at which the task becomes runnable.
    pub due: Duration,
    /// Session epoch the task was scheduled under.
    pub epoch: u64,
    pub task: T,
    seq: u64,
}

/// Min-heap wrapper: earliest due first, then lowest sequence number.
struct Entry<T>(Scheduled<T>);

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .due
            .cmp(&self.0.due)
            .then_with(|| other.0.seq.cmp(&self.0.seq))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.due == other.0.due && self.0.seq == other.0.seq
    }
}

pub struct TaskQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    now: Duration,
    next_seq: u64,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            now: Duration::ZERO,
            next_seq: 0,
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Moves the clock forward to `now`. Earlier values are ignored.
    pub fn set_clock(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Schedules `task` to run `delay` after the current virtual time.
    pub fn schedule(&mut self, delay: Duration, epoch: u64, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry(Scheduled {
            due: self.now + delay,
            epoch,
            task,
            seq,
        }));
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|entry| entry.0.due)
    }

    /// Removes the earliest task if it is due at the current clock.
    pub fn pop_due(&mut self) -> Option<Scheduled<T>> {
        match self.heap.peek() {
            Some(entry) if entry.0.due <= self.now => self.heap.pop().map(|entry| entry.0),
            _ => None,
        }
    }

    /// Drops every pending task. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.heap.len();
        self.heap.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
