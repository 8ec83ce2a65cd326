//! Timer Queue
//!
//! One-shot timers on an explicit clock. Callers pass "now" as the elapsed
//! time since the document's time origin, so firing order is deterministic.

use std::time::Duration;

/// Timer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Timer entry
#[derive(Debug)]
struct Timer<T> {
    id: TimerId,
    due: Duration,
    payload: T,
}

/// Pending one-shot timers carrying a payload
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self { next_id: 0, timers: Vec::new() }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a timeout firing `delay` after `now`
    pub fn set_timeout(&mut self, payload: T, delay: Duration, now: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let due = now.checked_add(delay).unwrap_or(Duration::MAX);
        self.timers.push(Timer { id, due, payload });
        id
    }

    /// Clear a timer. Returns whether it was still pending.
    pub fn clear(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Remove and return payloads of timers due at `now`, earliest first
    pub fn drain_ready(&mut self, now: Duration) -> Vec<T> {
        let (mut ready, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.timers).into_iter().partition(|t| t.due <= now);
        self.timers = pending;
        ready.sort_by_key(|t| (t.due, t.id.0));
        ready.into_iter().map(|t| t.payload).collect()
    }

    /// Check if there are pending timers
    pub fn has_pending(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Get time until next timer fires
    pub fn time_until_next(&self, now: Duration) -> Option<Duration> {
        self.timers.iter().map(|t| t.due.saturating_sub(now)).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_fires_only_when_due() {
        let mut queue = TimerQueue::new();
        queue.set_timeout("a", ms(50), ms(0));
        assert!(queue.drain_ready(ms(49)).is_empty());
        assert_eq!(queue.drain_ready(ms(50)), vec!["a"]);
        assert!(!queue.has_pending());
    }

    #[test]
    fn test_due_time_saturates() {
        let mut queue = TimerQueue::new();
        queue.set_timeout("edge", ms(50), Duration::MAX - ms(10));
        assert!(queue.drain_ready(Duration::MAX - ms(1)).is_empty());
        assert_eq!(queue.time_until_next(Duration::MAX - ms(10)), Some(ms(10)));
        assert_eq!(queue.drain_ready(Duration::MAX), vec!["edge"]);
    }

    #[test]
    fn test_clear() {
        let mut queue = TimerQueue::new();
        let id = queue.set_timeout(1, ms(10), ms(0));
        assert!(queue.clear(id));
        assert!(!queue.clear(id));
        assert!(queue.drain_ready(ms(100)).is_empty());
    }

    #[test]
    fn test_drain_order_and_time_until_next() {
        let mut queue = TimerQueue::new();
        queue.set_timeout("late", ms(30), ms(0));
        queue.set_timeout("early", ms(10), ms(0));
        queue.set_timeout("later", ms(90), ms(0));
        assert_eq!(queue.time_until_next(ms(5)), Some(ms(5)));
        assert_eq!(queue.drain_ready(ms(40)), vec!["early", "late"]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.time_until_next(ms(100)), Some(Duration::ZERO));
    }
}
