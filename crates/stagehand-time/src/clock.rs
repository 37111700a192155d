//! Project clock
//!
//! Elapsed project time is measured from a start point on the TimeSource.
//! Pausing freezes a snapshot; resuming moves the start point forward by
//! the paused interval so the snapshot carries on without a jump.

use std::time::Duration;

use stagehand_core::TimePoint;

use crate::TimeSource;

/// Running or paused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PauseState {
    Running,
    Paused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ClockState {
    Running,
    Paused { snapshot: Duration },
}

/// Pausable, resettable project clock.
///
/// INVARIANT: elapsed time equals total running time on the source since
/// the last `start()`; paused intervals contribute nothing.
pub struct ProjectClock {
    source: TimeSource,
    start: TimePoint,
    state: ClockState,
}

impl ProjectClock {
    /// Create a running clock whose elapsed time starts at zero
    pub fn new(source: TimeSource) -> Self {
        let start = source.now();
        ProjectClock {
            source,
            start,
            state: ClockState::Running,
        }
    }

    /// Zero the elapsed time. Does not change the pause state; while paused
    /// the frozen snapshot is zeroed as well.
    pub fn start(&mut self) {
        self.start = self.source.now();
        if let ClockState::Paused { .. } = self.state {
            self.state = ClockState::Paused {
                snapshot: Duration::ZERO,
            };
        }
        tracing::debug!(start = ?self.start, "project clock started");
    }

    /// Elapsed project time
    pub fn elapsed(&self) -> Duration {
        match self.state {
            ClockState::Running => self.source.now() - self.start,
            ClockState::Paused { snapshot } => snapshot,
        }
    }

    /// Elapsed project time in seconds (the project timer value)
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Freeze elapsed time. No-op when already paused.
    pub fn pause(&mut self) {
        if let ClockState::Running = self.state {
            let snapshot = self.source.now() - self.start;
            self.state = ClockState::Paused { snapshot };
            tracing::debug!(elapsed_ms = snapshot.as_millis() as u64, "project clock paused");
        }
    }

    /// Continue from the frozen snapshot. No-op when already running.
    pub fn resume(&mut self) {
        if let ClockState::Paused { snapshot } = self.state {
            let elapsed_us = self.source.now().micros_since(self.start);
            let drift_us = elapsed_us - snapshot.as_micros() as i64;
            self.start = self.start.offset_micros(drift_us);
            self.state = ClockState::Running;
            tracing::debug!(excised_us = drift_us, "project clock resumed");
        }
    }

    /// Host compatibility tick. Only affects future readings; the switch
    /// from the ambient clock to compat readings is continuous.
    pub fn on_compat_tick(&mut self, timestamp: TimePoint) {
        tracing::trace!(?timestamp, "compat tick");
        self.source.set_compat_timestamp(timestamp);
    }

    pub fn pause_state(&self) -> PauseState {
        match self.state {
            ClockState::Running => PauseState::Running,
            ClockState::Paused { .. } => PauseState::Paused,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause_state() == PauseState::Paused
    }

    /// Current reading of the underlying source
    pub fn now(&self) -> TimePoint {
        self.source.now()
    }
}

impl Default for ProjectClock {
    fn default() -> Self {
        Self::new(TimeSource::default())
    }
}
