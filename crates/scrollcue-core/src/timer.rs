//! Cancellable one-shot timers driven by an external clock
//!
//! Every delayed callback in the engine (hold detection, double-tap expiry,
//! deferred taps, reset debounce, delayed restarts) is an entry in a
//! `TimerQueue`. Nothing fires on its own: the owner polls `pop_due(now)`
//! from its tick and dispatches on the returned kind. Dropping or clearing
//! the queue guarantees that no pending callback can run afterwards.

use std::time::{Duration, Instant};

/// Handle to a scheduled timer, usable for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry<K> {
    id: TimerId,
    deadline: Instant,
    kind: K,
}

#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    entries: Vec<Entry<K>>,
    next_id: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<K> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire `delay` after `now`
    pub fn schedule(&mut self, now: Instant, delay: Duration, kind: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            deadline: now + delay,
            kind,
        });
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel every pending timer matching the predicate
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&K) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !predicate(&e.kind));
        before - self.entries.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Whether any pending timer matches the predicate
    pub fn contains(&self, mut predicate: impl FnMut(&K) -> bool) -> bool {
        self.entries.iter().any(|e| predicate(&e.kind))
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Remove and return the earliest timer due at `now`.
    ///
    /// Timers sharing a deadline come out in scheduling order.
    pub fn pop_due(&mut self, now: Instant) -> Option<(Instant, K)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.id))
            .map(|(i, _)| i)?;
        let entry = self.entries.remove(index);
        Some((entry.deadline, entry.kind))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pop_due_orders_by_deadline() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        queue.schedule(t0, ms(300), "late");
        queue.schedule(t0, ms(100), "early");

        assert!(queue.pop_due(t0 + ms(50)).is_none());
        assert_eq!(queue.pop_due(t0 + ms(400)).map(|(_, k)| k), Some("early"));
        assert_eq!(queue.pop_due(t0 + ms(400)).map(|(_, k)| k), Some("late"));
        assert!(queue.next_deadline().is_none());
    }

    #[test]
    fn test_same_deadline_keeps_schedule_order() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        queue.schedule(t0, ms(100), 1);
        queue.schedule(t0, ms(100), 2);
        assert_eq!(queue.pop_due(t0 + ms(100)).map(|(_, k)| k), Some(1));
        assert_eq!(queue.pop_due(t0 + ms(100)).map(|(_, k)| k), Some(2));
    }

    #[test]
    fn test_cancel_single_timer() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        let a = queue.schedule(t0, ms(100), 'a');
        let b = queue.schedule(t0, ms(100), 'b');

        assert!(queue.cancel(a));
        assert!(!queue.cancel(a));
        assert!(!queue.is_pending(a));
        assert!(queue.is_pending(b));
        assert_eq!(queue.pop_due(t0 + ms(200)).map(|(_, k)| k), Some('b'));
    }

    #[test]
    fn test_cancel_where_and_clear() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        queue.schedule(t0, ms(10), 1);
        queue.schedule(t0, ms(20), 2);
        queue.schedule(t0, ms(30), 3);

        assert_eq!(queue.cancel_where(|k| *k % 2 == 1), 2);
        assert_eq!(queue.next_deadline(), Some(t0 + ms(20)));

        queue.clear();
        assert!(queue.pop_due(t0 + ms(1000)).is_none());
    }
}
