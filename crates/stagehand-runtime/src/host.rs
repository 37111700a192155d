//! Host abstractions
//!
//! Everything the player needs from its environment is injected through
//! these traits, so the orchestration runs the same against a browser
//! bridge or the simulated host in `stagehand-test`.

use stagehand_core::{SurfaceBox, TimePoint};
use stagehand_input::{ConfirmPrompt, ControlHost, EventHost, IoSink};

/// Virtual machine surface used by the player
pub trait Vm: IoSink {
    fn set_compatibility_mode(&mut self, enabled: bool);
    fn start(&mut self);
    fn green_flag(&mut self);
}

/// Host environment: listener registration, control rendering, prompts
pub trait PlayerHost: EventHost + ControlHost + ConfirmPrompt {
    /// Whether the host reports touch support
    fn touch_capable(&self) -> bool;
}

/// Notifications pushed by the host runtime
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// `UPDATE_COMPAT_MSECS`: compatibility-mode tick timestamp
    UpdateCompatMsecs(TimePoint),
    /// Control-surface geometry changed (e.g. window resize)
    Resize(SurfaceBox),
}
