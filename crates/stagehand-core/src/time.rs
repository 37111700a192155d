//! Time primitives
//!
//! Host timestamps arrive as millisecond readings (possibly fractional).
//! They are stored as signed microseconds so that start-point corrections
//! after a resume can move either way without losing precision.

use std::ops::{Add, Sub};
use std::time::Duration;

/// Host time point - microseconds on the host's monotonic timeline
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimePoint(pub i64);

impl TimePoint {
    pub const ZERO: TimePoint = TimePoint(0);

    #[inline]
    pub fn from_micros(micros: i64) -> Self {
        TimePoint(micros)
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        TimePoint(millis.saturating_mul(1000))
    }

    /// Host readings such as `performance.now()` carry sub-millisecond fractions
    #[inline]
    pub fn from_millis_f64(millis: f64) -> Self {
        TimePoint((millis * 1000.0).round() as i64)
    }

    #[inline]
    pub fn as_micros(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0 / 1000
    }

    #[inline]
    pub fn as_millis_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Signed distance `self - earlier` in microseconds
    #[inline]
    pub fn micros_since(self, earlier: TimePoint) -> i64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Shift by a signed number of microseconds
    #[inline]
    pub fn offset_micros(self, micros: i64) -> Self {
        TimePoint(self.0.saturating_add(micros))
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let micros = i64::try_from(duration.as_micros()).unwrap_or(i64::MAX);
        TimePoint(self.0.saturating_add(micros))
    }
}

impl Add<Duration> for TimePoint {
    type Output = TimePoint;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

/// Elapsed duration between two points; clamps to zero when `rhs` is later
impl Sub<TimePoint> for TimePoint {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: TimePoint) -> Self::Output {
        let diff = self.0.saturating_sub(rhs.0);
        if diff >= 0 {
            Duration::from_micros(diff as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl std::fmt::Debug for TimePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({:.3}ms)", self.as_millis_f64())
    }
}
