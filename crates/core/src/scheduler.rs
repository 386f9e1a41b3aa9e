use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A payload waiting for the clock to reach `due`.
#[derive(Debug, Clone)]
struct ScheduledEvent<T> {
    due: f64,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for ScheduledEvent<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for ScheduledEvent<T> {}

impl<T> PartialOrd for ScheduledEvent<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ScheduledEvent<T> {
    // Reversed so the max-heap pops the earliest deadline first, then the
    // earliest scheduled among equal deadlines.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .total_cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Deadline queue keyed by playback-clock time.
///
/// Deadlines are virtual times, so pausing the clock postpones every
/// pending event by the length of the pause without touching the queue.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    heap: BinaryHeap<ScheduledEvent<T>>,
    next_seq: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `payload` to fire `delay` seconds after `now`. Returns the
    /// absolute due time.
    pub fn schedule_after(&mut self, now: f64, delay: f64, payload: T) -> f64 {
        let due = now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(ScheduledEvent { due, seq, payload });
        due
    }

    /// Pop the earliest event whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<(f64, T)> {
        if self.heap.peek()?.due > now {
            return None;
        }
        self.heap.pop().map(|event| (event.due, event.payload))
    }

    /// Deadline of the next pending event.
    pub fn next_due(&self) -> Option<f64> {
        self.heap.peek().map(|event| event.due)
    }

    /// All pending `(due, payload)` pairs, in no particular order.
    pub fn pending(&self) -> impl Iterator<Item = (f64, &T)> {
        self.heap.iter().map(|event| (event.due, &event.payload))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every pending event.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
