//! Project clock simulator
//!
//! Drives a `ProjectClock` through a seeded schedule of host time advances,
//! compatibility ticks and pause/resume calls, and checks the reported
//! elapsed time against an independently accumulated reference.
//!
//! Compat ticks may run on a timeline far from the ambient clock and may
//! arrive out of order; neither may move the project timer backwards.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stagehand_core::TimePoint;
use stagehand_time::{ManualClock, ProjectClock, TimeSource};

/// One scheduled clock operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockOp {
    /// Ambient host clock moves forward (microseconds)
    AdvanceAmbient(i64),
    /// Compatibility tick this many microseconds after the previous one.
    /// Negative steps model late ticks. The first tick is placed relative
    /// to the ambient clock plus the simulator's timeline offset.
    CompatTick(i64),
    Pause,
    Resume,
    /// Project timer reset
    Restart,
}

/// Schedule generation parameters
#[derive(Clone, Debug)]
pub struct ClockSimConfig {
    pub seed: u64,
    pub steps: usize,
    /// Upper bound of a single time step
    pub max_step: Duration,
    /// Probability that an operation is a pause or resume
    pub toggle_probability: f64,
    /// Probability that a time step is a compat tick rather than ambient
    pub compat_probability: f64,
    /// Probability that a compat tick steps backwards
    pub backward_probability: f64,
    pub restart_probability: f64,
    /// Distance of the compat timeline from the ambient clock (microseconds)
    pub timeline_offset_us: i64,
}

impl Default for ClockSimConfig {
    fn default() -> Self {
        ClockSimConfig {
            seed: 42,
            steps: 1_000,
            max_step: Duration::from_millis(50),
            toggle_probability: 0.1,
            compat_probability: 0.0,
            backward_probability: 0.0,
            restart_probability: 0.0,
            timeline_offset_us: 0,
        }
    }
}

impl ClockSimConfig {
    /// VM in compatibility mode: every time step is a 30 TPS tick
    pub fn compat_ticks() -> Self {
        ClockSimConfig {
            compat_probability: 1.0,
            max_step: Duration::from_micros(33_333),
            ..Self::default()
        }
    }

    /// Compat ticks stamped with wall-clock epoch time while the ambient
    /// clock counts from page load
    pub fn epoch_timeline() -> Self {
        ClockSimConfig {
            timeline_offset_us: 1_760_000_000_000_000,
            ..Self::compat_ticks()
        }
    }

    /// Compat timeline slightly behind ambient, with late ticks
    pub fn lagging_compat() -> Self {
        ClockSimConfig {
            timeline_offset_us: -20_000,
            backward_probability: 0.15,
            ..Self::mixed()
        }
    }

    /// Everything mixed, including restarts
    pub fn mixed() -> Self {
        ClockSimConfig {
            compat_probability: 0.3,
            toggle_probability: 0.2,
            restart_probability: 0.02,
            ..Self::default()
        }
    }
}

/// Generate a schedule from a seed
pub fn generate_schedule(config: &ClockSimConfig) -> Vec<ClockOp> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let max_us = config.max_step.as_micros().max(1) as i64;
    let mut paused = false;

    (0..config.steps)
        .map(|_| {
            if rng.gen_bool(config.restart_probability) {
                ClockOp::Restart
            } else if rng.gen_bool(config.toggle_probability) {
                paused = !paused;
                if paused {
                    ClockOp::Pause
                } else {
                    ClockOp::Resume
                }
            } else {
                let step = rng.gen_range(0..=max_us);
                if rng.gen_bool(config.compat_probability) {
                    if rng.gen_bool(config.backward_probability) {
                        ClockOp::CompatTick(-step)
                    } else {
                        ClockOp::CompatTick(step)
                    }
                } else {
                    ClockOp::AdvanceAmbient(step)
                }
            }
        })
        .collect()
}

/// Outcome of one simulated run
#[derive(Clone, Debug, Default)]
pub struct ClockSimResult {
    pub steps: usize,
    pub pauses: u32,
    pub resumes: u32,
    pub compat_ticks: u32,
    pub restarts: u32,
    /// Largest absolute difference from the reference (microseconds)
    pub max_error_us: u128,
    pub expected: Duration,
    pub reported: Duration,
    /// Reported elapsed time never went backwards except on restart
    pub monotonic: bool,
}

/// Clock under test plus its reference model
pub struct ClockSimulator {
    ambient: ManualClock,
    clock: ProjectClock,
    timeline_offset_us: i64,
    /// Latest accepted compat timestamp
    compat: Option<TimePoint>,
    /// What the time source should read once compat ticks have started
    reading: TimePoint,
    paused: bool,
    expected_us: i64,
}

impl ClockSimulator {
    pub fn new() -> Self {
        Self::with_timeline_offset(0)
    }

    /// Compat ticks start `offset_us` away from the ambient clock
    pub fn with_timeline_offset(offset_us: i64) -> Self {
        let start = TimePoint::from_millis(10_000);
        let ambient = ManualClock::new(start);
        let mut clock = ProjectClock::new(TimeSource::new(ambient.clone()));
        clock.start();
        ClockSimulator {
            ambient,
            clock,
            timeline_offset_us: offset_us,
            compat: None,
            reading: start,
            paused: false,
            expected_us: 0,
        }
    }

    fn host_now(&self) -> TimePoint {
        match self.compat {
            Some(_) => self.reading,
            None => self.ambient_now(),
        }
    }

    fn ambient_now(&self) -> TimePoint {
        use stagehand_time::HostClock;
        self.ambient.now()
    }

    /// Apply one operation to both the clock and the reference
    pub fn apply(&mut self, op: ClockOp) {
        let before = self.host_now();
        match op {
            ClockOp::AdvanceAmbient(us) => self.ambient.advance_micros(us),
            ClockOp::CompatTick(us) => {
                let t = match self.compat {
                    Some(last) => last.offset_micros(us),
                    None => before.offset_micros(self.timeline_offset_us.saturating_add(us)),
                };
                match self.compat {
                    None => {
                        self.reading = before;
                        self.compat = Some(t);
                    }
                    Some(last) if t >= last => {
                        self.reading = self.reading.offset_micros(t.micros_since(last));
                        self.compat = Some(t);
                    }
                    Some(_) => {}
                }
                self.clock.on_compat_tick(t);
            }
            ClockOp::Pause => {
                self.clock.pause();
                self.paused = true;
            }
            ClockOp::Resume => {
                self.clock.resume();
                self.paused = false;
            }
            ClockOp::Restart => {
                self.clock.start();
                self.expected_us = 0;
            }
        }
        if !self.paused {
            self.expected_us += self.host_now().micros_since(before);
        }
    }

    pub fn expected(&self) -> Duration {
        Duration::from_micros(self.expected_us.max(0) as u64)
    }

    pub fn clock(&self) -> &ProjectClock {
        &self.clock
    }

    /// Run a schedule, checking the clock after every step
    pub fn run(&mut self, schedule: &[ClockOp]) -> ClockSimResult {
        let mut result = ClockSimResult {
            monotonic: true,
            ..ClockSimResult::default()
        };
        let mut last = self.clock.elapsed();

        for op in schedule {
            self.apply(*op);
            match op {
                ClockOp::Pause => result.pauses += 1,
                ClockOp::Resume => result.resumes += 1,
                ClockOp::CompatTick(_) => result.compat_ticks += 1,
                ClockOp::Restart => result.restarts += 1,
                ClockOp::AdvanceAmbient(_) => {}
            }

            let reported = self.clock.elapsed();
            let expected = self.expected();
            let error = reported.as_micros().abs_diff(expected.as_micros());
            result.max_error_us = result.max_error_us.max(error);
            if reported < last && *op != ClockOp::Restart {
                result.monotonic = false;
            }
            last = reported;
            result.steps += 1;
        }

        result.expected = self.expected();
        result.reported = self.clock.elapsed();
        tracing::debug!(
            steps = result.steps,
            max_error_us = result.max_error_us as u64,
            "clock simulation finished"
        );
        result
    }
}

impl Default for ClockSimulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate and run one seeded scenario
pub fn run_clock_scenario(config: &ClockSimConfig) -> ClockSimResult {
    let schedule = generate_schedule(config);
    ClockSimulator::with_timeline_offset(config.timeline_offset_us).run(&schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_schedule() {
        let config = ClockSimConfig::mixed();
        assert_eq!(generate_schedule(&config), generate_schedule(&config));
    }

    #[test]
    fn test_ambient_schedule_tracks_reference() {
        let result = run_clock_scenario(&ClockSimConfig::default());
        assert_eq!(result.steps, 1_000);
        assert!(result.pauses > 0);
        assert_eq!(result.max_error_us, 0);
        assert!(result.monotonic);
    }

    #[test]
    fn test_compat_schedule_tracks_reference() {
        let result = run_clock_scenario(&ClockSimConfig::compat_ticks());
        assert!(result.compat_ticks > 0);
        assert_eq!(result.max_error_us, 0);
        assert!(result.monotonic);
    }

    #[test]
    fn test_mixed_schedules_across_seeds() {
        for seed in 0..20 {
            let config = ClockSimConfig {
                seed,
                ..ClockSimConfig::mixed()
            };
            let result = run_clock_scenario(&config);
            assert_eq!(result.max_error_us, 0, "seed {seed}");
            assert!(result.monotonic, "seed {seed}");
        }
    }

    #[test]
    fn test_ambient_ignored_after_first_compat_tick() {
        let mut sim = ClockSimulator::new();
        sim.apply(ClockOp::AdvanceAmbient(2_000));
        sim.apply(ClockOp::CompatTick(1_000));
        sim.apply(ClockOp::AdvanceAmbient(500_000));
        sim.apply(ClockOp::CompatTick(1_000));
        assert_eq!(sim.clock().elapsed(), Duration::from_millis(3));
        assert_eq!(sim.expected(), Duration::from_millis(3));
    }

    #[test]
    fn test_epoch_timeline_does_not_jump() {
        let mut sim = ClockSimulator::with_timeline_offset(1_760_000_000_000_000);
        sim.apply(ClockOp::AdvanceAmbient(40_000));
        sim.apply(ClockOp::CompatTick(0));
        assert_eq!(sim.clock().elapsed(), Duration::from_millis(40));
        sim.apply(ClockOp::CompatTick(33_333));
        assert_eq!(sim.clock().elapsed(), Duration::from_micros(73_333));

        let result = run_clock_scenario(&ClockSimConfig::epoch_timeline());
        assert!(result.compat_ticks > 0);
        assert_eq!(result.max_error_us, 0);
        assert!(result.monotonic);
        assert!(result.reported < Duration::from_secs(60));
    }

    #[test]
    fn test_late_compat_ticks_never_rewind() {
        let mut sim = ClockSimulator::with_timeline_offset(-20_000);
        sim.apply(ClockOp::AdvanceAmbient(500_000));
        sim.apply(ClockOp::CompatTick(0));
        assert_eq!(sim.clock().elapsed(), Duration::from_millis(500));
        sim.apply(ClockOp::CompatTick(-30_000));
        assert_eq!(sim.clock().elapsed(), Duration::from_millis(500));
        // steps continue from the last accepted tick, not the late one
        sim.apply(ClockOp::CompatTick(40_000));
        assert_eq!(sim.clock().elapsed(), Duration::from_millis(540));
        sim.apply(ClockOp::CompatTick(33_000));
        assert_eq!(sim.clock().elapsed(), Duration::from_millis(573));
        assert_eq!(sim.expected(), Duration::from_millis(573));
    }

    #[test]
    fn test_lagging_compat_across_seeds() {
        for seed in 0..20 {
            let config = ClockSimConfig {
                seed,
                ..ClockSimConfig::lagging_compat()
            };
            let result = run_clock_scenario(&config);
            assert!(result.compat_ticks > 0, "seed {seed}");
            assert_eq!(result.max_error_us, 0, "seed {seed}");
            assert!(result.monotonic, "seed {seed}");
        }
    }
}
