//! Player session harness
//!
//! A `Player` wired to a simulated host and a recording VM. Events are
//! "fired" the way the page would: every live listener registered for the
//! element and class receives its own dispatch, in registration order.

use rand::seq::SliceRandom;
use stagehand_core::{
    ProgramView, RawEventKind, StagehandResult, SurfaceBox, TimePoint,
};
use stagehand_input::{DispatchOutcome, ElementRef, RawEvent};
use stagehand_runtime::{HostEvent, LoadReport, Player, PlayerConfig};
use stagehand_time::{ManualClock, TimeSource};

use crate::{InputSimulator, RecordingVm, SimulatedHost};

/// Counters collected while driving a session
#[derive(Clone, Debug, Default)]
pub struct SessionReport {
    pub fired: u64,
    pub dispatched: u64,
    pub errors: u64,
    pub prevented: u64,
    /// Posted pointer events that fell outside the surface
    pub out_of_bounds: u64,
}

pub struct PlayerSession {
    pub player: Player,
    pub host: SimulatedHost,
    pub vm: RecordingVm,
    pub ambient: ManualClock,
    pub input: InputSimulator,
    report: SessionReport,
}

impl PlayerSession {
    pub fn new(config: PlayerConfig, host: SimulatedHost, surface: SurfaceBox, seed: u64) -> Self {
        let ambient = ManualClock::new(TimePoint::from_millis(1_000));
        let mut player = Player::new(config, TimeSource::new(ambient.clone()));
        let mut vm = RecordingVm::new();
        player.configure_vm(&mut vm);
        player.handle_host_event(HostEvent::Resize(surface));

        PlayerSession {
            player,
            host,
            vm,
            ambient,
            input: InputSimulator::new(seed, surface),
            report: SessionReport::default(),
        }
    }

    /// Desktop session with default configuration
    pub fn desktop(seed: u64) -> Self {
        Self::new(
            PlayerConfig::default(),
            SimulatedHost::desktop(),
            SurfaceBox::new(0.0, 0.0, 480.0, 360.0),
            seed,
        )
    }

    /// Touch session; `host` carries the scripted prompt answers
    pub fn touch(host: SimulatedHost, seed: u64) -> Self {
        Self::new(
            PlayerConfig::default(),
            host,
            SurfaceBox::new(0.0, 0.0, 480.0, 360.0),
            seed,
        )
    }

    pub fn load(&mut self, program: &(impl ProgramView + ?Sized)) -> StagehandResult<LoadReport> {
        self.player.load_program(program, &mut self.host)
    }

    pub fn resize(&mut self, surface: SurfaceBox) {
        self.player.handle_host_event(HostEvent::Resize(surface));
        self.input.set_surface(surface);
    }

    /// Deliver `raw` to every listener registered for its class on `element`
    pub fn fire(&mut self, element: &ElementRef, raw: &RawEvent) -> Vec<StagehandResult<DispatchOutcome>> {
        self.report.fired += 1;
        let ids = self.host.fire(element, raw.kind);
        let mut results = Vec::with_capacity(ids.len());

        for id in ids {
            // an earlier listener in this batch may have detached this one
            if self.player.router().subscription(id).is_none() {
                continue;
            }
            let posted_before = self.vm.posted.len();
            let result = self.player.dispatch(id, raw, &mut self.vm, &mut self.host);
            match &result {
                Ok(outcome) => {
                    self.report.dispatched += 1;
                    if outcome.prevent_default {
                        self.report.prevented += 1;
                    }
                    self.check_bounds(posted_before);
                }
                Err(_) => self.report.errors += 1,
            }
            results.push(result);
        }
        results
    }

    /// Generate an event of class `kind` and fire it on `element`
    pub fn fire_generated(&mut self, element: &ElementRef, kind: RawEventKind) -> Vec<StagehandResult<DispatchOutcome>> {
        let raw = self.input.event(kind);
        self.fire(element, &raw)
    }

    /// Fire `count` generated events on randomly chosen live listeners
    pub fn fire_random(&mut self, count: usize) {
        for _ in 0..count {
            let target = self
                .host
                .listeners()
                .choose(self.input.rng())
                .map(|l| (l.element.clone(), l.kind));
            let Some((element, kind)) = target else {
                return;
            };
            self.fire_generated(&element, kind);
        }
    }

    fn check_bounds(&mut self, from: usize) {
        let Some(surface) = self.player.surface_box() else {
            return;
        };
        for data in &self.vm.posted[from..] {
            if let stagehand_core::IoData::Mouse(ev) = data {
                let inside = (0.0..=surface.width).contains(&ev.x)
                    && (0.0..=surface.height).contains(&ev.y);
                if !inside {
                    self.report.out_of_bounds += 1;
                }
            }
        }
    }

    pub fn report(&self) -> &SessionReport {
        &self.report
    }
}
