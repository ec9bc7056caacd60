//! Virtual-time queue for scheduled effects.
//!
//! Timers are ordered by due time, then by the order they were scheduled,
//! so a zero animation unit still delivers steps in plan order.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::session::effects::TimerKind;

#[derive(Debug)]
struct Entry {
    due_ms: u64,
    seq: u64,
    kind: TimerKind,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_ms, self.seq).cmp(&(other.due_ms, other.seq))
    }
}

#[derive(Debug, Default)]
pub struct Timeline {
    now_ms: u64,
    seq: u64,
    pending: BinaryHeap<Reverse<Entry>>,
}

impl Timeline {
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn schedule(&mut self, delay_ms: u64, kind: TimerKind) {
        self.seq += 1;
        self.pending.push(Reverse(Entry {
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq: self.seq,
            kind,
        }));
    }

    /// Due time of the earliest timer.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending.peek().map(|Reverse(e)| e.due_ms)
    }

    /// Move the clock forward. Time never goes backwards.
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Pop the earliest timer that is due at the current time.
    pub fn pop_due(&mut self) -> Option<TimerKind> {
        match self.pending.peek() {
            Some(Reverse(e)) if e.due_ms <= self.now_ms => {
                self.pending.pop().map(|Reverse(e)| e.kind)
            }
            _ => None,
        }
    }

    /// Jump the clock to the earliest timer and pop it.
    pub fn pop_next(&mut self) -> Option<TimerKind> {
        let due = self.next_due_ms()?;
        self.advance_to(due);
        self.pop_due()
    }
}
