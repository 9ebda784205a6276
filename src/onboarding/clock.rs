//! Time sources for the sequencer.
//!
//! The sequencer never reads wall-clock time itself. Hosts inject a
//! [`Clock`]; tests and the simulator use [`VirtualClock`] so countdowns can
//! be driven without real delays.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic millisecond time source.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin. Must never decrease.
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Manually advanced clock.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// hand another to the sequencer.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Rc<Cell<u64>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Jumps to an absolute time. Moving backwards is ignored.
    pub fn set(&self, ms: u64) {
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Native monotonic clock anchored at construction.
///
/// Not usable on `wasm32-unknown-unknown`; the WASM bindings supply their own
/// clock backed by `Date.now()`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}
