//! Wall-clock sources for the playback controller.
//!
//! The controller never reads the system time directly; it asks a [`Clock`].
//! The web and native frontends use [`SystemClock`], tests and headless runs
//! drive a [`ManualClock`] by hand.

use instant::Instant;
use std::cell::Cell;
use std::rc::Rc;

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

#[derive(Clone, Debug)]
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
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock. Clones share the same reading.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let a = ManualClock::new(10.0);
        let b = a.clone();
        a.advance(5.0);
        assert_eq!(b.now_ms(), 15.0);
        b.set(100.0);
        assert_eq!(a.now_ms(), 100.0);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let t0 = clock.now_ms();
        let t1 = clock.now_ms();
        assert!(t1 >= t0);
    }
}
