//! Time sources
//!
//! The host supplies readings; nothing here sleeps or blocks.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use stagehand_core::TimePoint;

/// Ambient monotonic clock of the host environment
pub trait HostClock: Send + Sync {
    fn now(&self) -> TimePoint;
}

/// Host clock backed by the OS monotonic clock, zeroed at creation
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock for SystemClock {
    fn now(&self) -> TimePoint {
        TimePoint::from_micros(self.origin.elapsed().as_micros() as i64)
    }
}

/// Manually driven host clock.
///
/// Clones share the same reading, so a test can keep one handle and give
/// another to the clock under test.
#[derive(Clone, Default)]
pub struct ManualClock {
    micros: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: TimePoint) -> Self {
        ManualClock {
            micros: Arc::new(AtomicI64::new(start.as_micros())),
        }
    }

    /// Advance by whole milliseconds
    pub fn advance_millis(&self, millis: i64) {
        self.micros.fetch_add(millis.saturating_mul(1000), Ordering::AcqRel);
    }

    pub fn advance_micros(&self, micros: i64) {
        self.micros.fetch_add(micros, Ordering::AcqRel);
    }

    pub fn set(&self, t: TimePoint) {
        self.micros.store(t.as_micros(), Ordering::Release);
    }
}

impl HostClock for ManualClock {
    fn now(&self) -> TimePoint {
        TimePoint::from_micros(self.micros.load(Ordering::Acquire))
    }
}

/// Single time reading for the project clock.
///
/// Returns the ambient host clock until the host pushes a compat
/// timestamp, then the latest compat timestamp. Compat readings may live
/// on a different timeline than the ambient clock, so the first one is
/// rebased onto the reading it replaces and `now()` carries on without a
/// jump. Compat readings never move `now()` backwards.
pub struct TimeSource {
    ambient: Box<dyn HostClock>,
    compat: Option<TimePoint>,
    /// Ambient minus compat at the moment of the switch
    rebase_us: i64,
}

impl TimeSource {
    pub fn new(ambient: impl HostClock + 'static) -> Self {
        TimeSource {
            ambient: Box::new(ambient),
            compat: None,
            rebase_us: 0,
        }
    }

    /// Time source seeded with the host's current compat reading; no
    /// ambient reading is ever used
    pub fn with_compat(ambient: impl HostClock + 'static, compat: TimePoint) -> Self {
        TimeSource {
            ambient: Box::new(ambient),
            compat: Some(compat),
            rebase_us: 0,
        }
    }

    pub fn now(&self) -> TimePoint {
        match self.compat {
            Some(t) => t.offset_micros(self.rebase_us),
            None => self.ambient.now(),
        }
    }

    pub fn set_compat_timestamp(&mut self, t: TimePoint) {
        match self.compat {
            None => {
                let ambient = self.ambient.now();
                self.rebase_us = ambient.micros_since(t);
                tracing::debug!(rebase_us = self.rebase_us, "switched to compat timeline");
                self.compat = Some(t);
            }
            Some(last) if t < last => {
                tracing::trace!(?t, ?last, "stale compat timestamp ignored");
            }
            Some(_) => self.compat = Some(t),
        }
    }

    /// Latest compat timestamp as pushed by the host
    pub fn compat_timestamp(&self) -> Option<TimePoint> {
        self.compat
    }
}

impl Default for TimeSource {
    fn default() -> Self {
        Self::new(SystemClock::new())
    }
}
