//! One-shot timers for the chord reset window.
//!
//! Timers never run callbacks themselves. The owner of a [`Scheduler`] asks it
//! for due [`TimerId`]s and delivers them to whoever armed them, on the same
//! thread that delivers every other event. That keeps "chord advanced" and
//! "chord timed out" strictly ordered.
//!
//! - [`DeadlineScheduler`] - wall-clock deadlines, drained by the event loop
//! - [`ManualScheduler`] - virtual time, advanced explicitly (tests, headless runs)
//!
//! Both are cheap cloneable handles over shared state, so the event loop and
//! the component that arms timers can hold the same queue.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Handle for a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Capability to arm and cancel one-shot timers.
pub trait Scheduler {
    /// Arm a timer that becomes due after `delay`.
    fn schedule(&mut self, delay: Duration) -> TimerId;
    /// Cancel a timer. Unknown or already-fired ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

// ============================================================================
// DeadlineScheduler
// ============================================================================

#[derive(Debug, Default)]
struct DeadlineQueue {
    next_id: u64,
    pending: BTreeMap<TimerId, Instant>,
}

/// Wall-clock timer queue drained by the host event loop.
#[derive(Clone, Debug, Default)]
pub struct DeadlineScheduler {
    inner: Rc<RefCell<DeadlineQueue>>,
}

impl DeadlineScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Earliest pending deadline, used to decide how long the loop may sleep.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.inner.borrow().pending.values().min().copied()
    }

    /// Remove and return every timer due at `now`, in arming order.
    pub fn take_due(&self, now: Instant) -> Vec<TimerId> {
        let mut queue = self.inner.borrow_mut();
        let due: Vec<TimerId> = queue
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, _)| *id)
            .collect();
        for id in &due {
            queue.pending.remove(id);
        }
        due
    }

    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }
}

impl Scheduler for DeadlineScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let mut queue = self.inner.borrow_mut();
        queue.next_id += 1;
        let id = TimerId(queue.next_id);
        queue.pending.insert(id, Instant::now() + delay);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.inner.borrow_mut().pending.remove(&id);
    }
}

/// Earliest of the host loop's wake-up candidates.
pub fn earliest_wake(candidates: impl IntoIterator<Item = Option<Instant>>) -> Option<Instant> {
    candidates.into_iter().flatten().min()
}

// ============================================================================
// ManualScheduler
// ============================================================================

#[derive(Debug, Default)]
struct VirtualQueue {
    next_id: u64,
    now: Duration,
    pending: BTreeMap<TimerId, Duration>,
}

/// Virtual-time timer queue. Time only moves when [`ManualScheduler::advance`] is called.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<VirtualQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move virtual time forward and return the timers that became due.
    pub fn advance(&self, by: Duration) -> Vec<TimerId> {
        let mut queue = self.inner.borrow_mut();
        queue.now += by;
        let now = queue.now;
        let mut due: Vec<(Duration, TimerId)> = queue
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort();
        for (_, id) in &due {
            queue.pending.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.inner.borrow().pending.contains_key(&id)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let mut queue = self.inner.borrow_mut();
        queue.next_id += 1;
        let id = TimerId(queue.next_id);
        let deadline = queue.now + delay;
        queue.pending.insert(id, deadline);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.inner.borrow_mut().pending.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_timer_fires_at_deadline() {
        let mut scheduler = ManualScheduler::new();
        let id = scheduler.schedule(Duration::from_millis(1500));
        assert!(scheduler.advance(Duration::from_millis(1499)).is_empty());
        assert_eq!(scheduler.advance(Duration::from_millis(1)), vec![id]);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_manual_cancel_prevents_firing() {
        let mut scheduler = ManualScheduler::new();
        let id = scheduler.schedule(Duration::from_millis(10));
        scheduler.cancel(id);
        assert!(!scheduler.is_pending(id));
        assert!(scheduler.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_manual_clones_share_queue() {
        let mut armer = ManualScheduler::new();
        let driver = armer.clone();
        let id = armer.schedule(Duration::from_millis(5));
        assert_eq!(driver.advance(Duration::from_millis(5)), vec![id]);
    }

    #[test]
    fn test_manual_due_order_follows_deadline() {
        let mut scheduler = ManualScheduler::new();
        let late = scheduler.schedule(Duration::from_millis(20));
        let early = scheduler.schedule(Duration::from_millis(10));
        assert_eq!(scheduler.advance(Duration::from_millis(30)), vec![early, late]);
    }

    #[test]
    fn test_earliest_wake_skips_missing_candidates() {
        let now = Instant::now();
        let soon = now + Duration::from_millis(50);
        let later = now + Duration::from_secs(1);
        assert_eq!(earliest_wake([None, Some(later), Some(soon)]), Some(soon));
        assert_eq!(earliest_wake([None, None]), None);
    }

    #[test]
    fn test_deadline_take_due() {
        let mut scheduler = DeadlineScheduler::new();
        let soon = scheduler.schedule(Duration::ZERO);
        let later = scheduler.schedule(Duration::from_secs(3600));
        assert_eq!(scheduler.take_due(Instant::now()), vec![soon]);
        assert_eq!(scheduler.pending_count(), 1);
        assert!(scheduler.next_deadline().is_some());
        scheduler.cancel(later);
        assert_eq!(scheduler.next_deadline(), None);
    }
}
