//! Single-slot pending timer.
//!
//! At most one auto-advance timer exists per sequencer. Scheduling always
//! replaces whatever was pending, so a timer armed for an earlier step can
//! never fire after the state has moved on.

use serde::{Deserialize, Serialize};

/// Monotonic timer identifier, unique within one slot.
pub type TimerId = u64;

/// An armed auto-advance deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTimer {
    pub id: TimerId,
    /// Step the timer belongs to.
    pub step_index: usize,
    /// Absolute clock time at which the step expires.
    pub due_at_ms: u64,
}

impl PendingTimer {
    /// Milliseconds left before the deadline, floored at zero.
    pub fn remaining_at(&self, now_ms: u64) -> u64 {
        self.due_at_ms.saturating_sub(now_ms)
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms >= self.due_at_ms
    }
}

/// Holder for the one outstanding timer.
#[derive(Debug, Default)]
pub struct TimerSlot {
    pending: Option<PendingTimer>,
    next_id: TimerId,
    scheduled_total: u64,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a timer for `step_index` expiring `delay_ms` after `now_ms`,
    /// cancelling any timer already pending.
    pub fn schedule(&mut self, step_index: usize, now_ms: u64, delay_ms: u64) -> PendingTimer {
        if let Some(old) = self.pending.take() {
            log::debug!("timer {} for step {} replaced", old.id, old.step_index);
        }
        self.next_id += 1;
        self.scheduled_total += 1;
        let timer = PendingTimer {
            id: self.next_id,
            step_index,
            due_at_ms: now_ms.saturating_add(delay_ms),
        };
        log::debug!(
            "timer {} armed for step {} in {}ms",
            timer.id,
            step_index,
            delay_ms
        );
        self.pending = Some(timer);
        timer
    }

    /// Clears the pending timer, returning it if there was one.
    pub fn cancel(&mut self) -> Option<PendingTimer> {
        let cancelled = self.pending.take();
        if let Some(timer) = &cancelled {
            log::debug!("timer {} for step {} cancelled", timer.id, timer.step_index);
        }
        cancelled
    }

    /// Removes and returns the pending timer if it is due.
    pub fn take_due(&mut self, now_ms: u64) -> Option<PendingTimer> {
        match self.pending {
            Some(timer) if timer.is_due(now_ms) => self.pending.take(),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<PendingTimer> {
        self.pending
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of timers ever scheduled through this slot.
    pub fn scheduled_total(&self) -> u64 {
        self.scheduled_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_replaces_previous() {
        let mut slot = TimerSlot::new();
        let first = slot.schedule(0, 0, 1000);
        let second = slot.schedule(1, 200, 1000);
        assert_ne!(first.id, second.id);
        assert_eq!(slot.pending(), Some(second));
        assert_eq!(slot.scheduled_total(), 2);
    }

    #[test]
    fn test_take_due_only_when_elapsed() {
        let mut slot = TimerSlot::new();
        slot.schedule(0, 100, 1000);
        assert_eq!(slot.take_due(1099), None);
        assert!(slot.is_armed());
        let fired = slot.take_due(1100).unwrap();
        assert_eq!(fired.step_index, 0);
        assert!(!slot.is_armed());
        assert_eq!(slot.take_due(5000), None);
    }

    #[test]
    fn test_cancel_clears_slot() {
        let mut slot = TimerSlot::new();
        assert_eq!(slot.cancel(), None);
        slot.schedule(2, 0, 50);
        assert!(slot.cancel().is_some());
        assert_eq!(slot.pending(), None);
    }

    #[test]
    fn test_remaining_floors_at_zero() {
        let timer = PendingTimer {
            id: 1,
            step_index: 0,
            due_at_ms: 1000,
        };
        assert_eq!(timer.remaining_at(400), 600);
        assert_eq!(timer.remaining_at(4000), 0);
    }
}
