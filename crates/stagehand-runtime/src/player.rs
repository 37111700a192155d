//! Player - per-VM orchestration

use std::sync::Arc;

use parking_lot::Mutex;
use stagehand_core::{
    HandlerTag, KeySet, ProgramView, StagehandResult, SubscriptionId, SurfaceBox,
};
use stagehand_input::{
    desktop_sources, scan, virtual_sources, ControlLayout, DispatchOutcome, Dispatched,
    EventRouter, InputNormalizer, IoSink, LayoutVariant, RawEvent, RemovalConsent, SourceDescriptor,
    SurfaceDecision, VirtualControlSurface,
};
use stagehand_time::{ProjectClock, TimeSource};

use crate::{HostEvent, PlayerConfig, PlayerHost, Vm};

/// Project clock shared with the VM scheduler
pub type SharedClock = Arc<Mutex<ProjectClock>>;

/// Summary of one program (re)load
#[derive(Clone, Debug)]
pub struct LoadReport {
    pub keys: KeySet,
    /// Present when a virtual control surface was built
    pub layout: Option<LayoutVariant>,
    /// Listener subscriptions now live
    pub subscriptions: usize,
}

#[derive(Clone, Debug, Default)]
pub struct PlayerStats {
    pub loads: u64,
    pub dispatched: u64,
    pub dispatch_errors: u64,
    pub compat_ticks: u64,
    pub resizes: u64,
}

/// Player glue for one VM instance
pub struct Player {
    config: PlayerConfig,
    clock: SharedClock,
    router: EventRouter,
    /// Geometry snapshot read by every pointer dispatch
    normalizer: InputNormalizer,
    keys: KeySet,
    surface: Option<VirtualControlSurface>,
    /// Per-control and hardware-key subscriptions, dropped with the surface
    control_subscriptions: Vec<SubscriptionId>,
    stats: PlayerStats,
}

impl Player {
    pub fn new(config: PlayerConfig, source: TimeSource) -> Self {
        Player {
            config,
            clock: Arc::new(Mutex::new(ProjectClock::new(source))),
            router: EventRouter::new(),
            normalizer: InputNormalizer::new(),
            keys: KeySet::new(),
            surface: None,
            control_subscriptions: Vec::new(),
            stats: PlayerStats::default(),
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn clock(&self) -> SharedClock {
        Arc::clone(&self.clock)
    }

    /// Apply VM-level settings before the first load
    pub fn configure_vm(&self, vm: &mut dyn Vm) {
        vm.set_compatibility_mode(self.config.compatibility_mode);
    }

    /// Host runtime notification
    pub fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::UpdateCompatMsecs(t) => {
                self.clock.lock().on_compat_tick(t);
                self.stats.compat_ticks += 1;
            }
            HostEvent::Resize(surface) => {
                tracing::debug!(width = surface.width, height = surface.height, "surface resized");
                self.normalizer.set_surface(surface);
                self.stats.resizes += 1;
            }
        }
    }

    pub fn surface_box(&self) -> Option<SurfaceBox> {
        self.normalizer.surface()
    }

    /// (Re)load a program: drop old listeners, zero the project timer,
    /// scan keys and attach desktop and (on touch hosts) virtual sources.
    pub fn load_program<H: PlayerHost>(
        &mut self,
        program: &(impl ProgramView + ?Sized),
        host: &mut H,
    ) -> StagehandResult<LoadReport> {
        let detached = self.router.detach_all(host);
        let router = &self.router;
        self.control_subscriptions.retain(|id| router.contains(*id));
        if let Some(mut old) = self.surface.take() {
            if let Err(e) = old.unmount(host) {
                self.surface = Some(old);
                return Err(e);
            }
        }
        detached?;

        self.clock.lock().start();
        self.keys = scan(program);
        self.router.attach(desktop_sources(), host)?;

        let mut layout = None;
        if self.config.touch_controls.enabled(host.touch_capable()) {
            let built = ControlLayout::build(&self.keys);
            layout = Some(built.variant);

            let mut surface = VirtualControlSurface::new(built);
            surface.mount(host)?;

            let mut sources = virtual_sources(surface.layout()).into_iter();
            let touch: Vec<SourceDescriptor> = sources.next().into_iter().collect();
            self.router.attach(touch, host)?;
            self.control_subscriptions = self.router.attach(sources, host)?;
            self.surface = Some(surface);
        }

        self.stats.loads += 1;
        tracing::info!(
            keys = self.keys.len(),
            subscriptions = self.router.len(),
            virtual_controls = layout.is_some(),
            "program loaded"
        );

        Ok(LoadReport {
            keys: self.keys.clone(),
            layout,
            subscriptions: self.router.len(),
        })
    }

    /// Route one raw event delivered for subscription `id`
    pub fn dispatch<H: PlayerHost>(
        &mut self,
        id: SubscriptionId,
        raw: &RawEvent,
        vm: &mut dyn IoSink,
        host: &mut H,
    ) -> StagehandResult<DispatchOutcome> {
        let outcome = match self.router.dispatch(id, raw, &self.normalizer, vm) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.stats.dispatch_errors += 1;
                tracing::warn!(%id, event = %raw.kind, error = %e, "dispatch failed");
                return Err(e);
            }
        };
        self.stats.dispatched += 1;

        if outcome.action == Dispatched::Notified(HandlerTag::HARDWARE_KEY) {
            self.on_hardware_key(host)?;
        }
        Ok(outcome)
    }

    fn on_hardware_key<H: PlayerHost>(&mut self, host: &mut H) -> StagehandResult<()> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        let decision = surface.on_hardware_key(host);
        // a confirmed removal that failed part way is retried on the next key
        let retry = decision == SurfaceDecision::AlreadyAnswered
            && surface.consent() == RemovalConsent::Confirmed;
        if decision != SurfaceDecision::Remove && !retry {
            return Ok(());
        }

        surface.unmount(host)?;
        let detached = self.router.detach_many(&self.control_subscriptions, host);
        let router = &self.router;
        self.control_subscriptions.retain(|id| router.contains(*id));
        detached
    }

    /// Wait the configured start delay, then start the VM and press the green flag
    pub async fn launch<V: Vm + ?Sized>(&self, vm: &mut V) {
        if !self.config.start_delay.is_zero() {
            tokio::time::sleep(self.config.start_delay).await;
        }
        vm.start();
        vm.green_flag();
        tracing::info!("vm started");
    }

    pub fn pause(&self) {
        self.clock.lock().pause();
    }

    pub fn resume(&self) {
        self.clock.lock().resume();
    }

    /// Project timer value in seconds
    pub fn project_timer(&self) -> f64 {
        self.clock.lock().elapsed_seconds()
    }

    pub fn reset_project_timer(&self) {
        self.clock.lock().start();
    }

    pub fn keys(&self) -> &KeySet {
        &self.keys
    }

    pub fn control_surface(&self) -> Option<&VirtualControlSurface> {
        self.surface.as_ref()
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }
}
