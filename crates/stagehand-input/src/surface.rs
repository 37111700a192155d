//! Virtual control surface
//!
//! Owns a mounted control layout and the one-time question of whether a
//! user who is typing on a real keyboard wants the touch controls removed.

use stagehand_core::StagehandResult;

use crate::ControlLayout;

/// Question asked the first time a hardware key is seen
pub const REMOVAL_PROMPT: &str = "Do you want to remove the touchscreen buttons?";

/// Host capability that renders and removes control layouts
pub trait ControlHost {
    fn mount_controls(&mut self, layout: &ControlLayout) -> StagehandResult<()>;
    fn remove_controls(&mut self) -> StagehandResult<()>;
}

/// Host capability that asks the user a yes/no question
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Answer to the removal question; asked at most once per surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RemovalConsent {
    #[default]
    Unasked,
    Confirmed,
    Declined,
}

/// Result of a hardware-key notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceDecision {
    /// Question already answered earlier; nothing happened
    AlreadyAnswered,
    /// User chose to keep the controls
    Kept,
    /// User confirmed removal
    Remove,
}

/// Synthesized control surface for one loaded program
#[derive(Clone, Debug)]
pub struct VirtualControlSurface {
    layout: ControlLayout,
    consent: RemovalConsent,
    mounted: bool,
}

impl VirtualControlSurface {
    pub fn new(layout: ControlLayout) -> Self {
        VirtualControlSurface {
            layout,
            consent: RemovalConsent::Unasked,
            mounted: false,
        }
    }

    pub fn layout(&self) -> &ControlLayout {
        &self.layout
    }

    pub fn consent(&self) -> RemovalConsent {
        self.consent
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Ask the host to render the layout
    pub fn mount(&mut self, host: &mut dyn ControlHost) -> StagehandResult<()> {
        if !self.mounted {
            host.mount_controls(&self.layout)?;
            self.mounted = true;
        }
        Ok(())
    }

    /// A real keyboard key was pressed while the controls are shown.
    ///
    /// The first call asks the user; every later call is a no-op whatever
    /// the first answer was. On `Remove` the caller tears the surface down
    /// with [`VirtualControlSurface::unmount`].
    pub fn on_hardware_key(&mut self, prompt: &mut dyn ConfirmPrompt) -> SurfaceDecision {
        if self.consent != RemovalConsent::Unasked {
            return SurfaceDecision::AlreadyAnswered;
        }

        if prompt.confirm(REMOVAL_PROMPT) {
            self.consent = RemovalConsent::Confirmed;
            tracing::info!("user asked to remove virtual controls");
            SurfaceDecision::Remove
        } else {
            self.consent = RemovalConsent::Declined;
            tracing::info!("virtual controls kept");
            SurfaceDecision::Kept
        }
    }

    /// Ask the host to remove the rendered layout
    pub fn unmount(&mut self, host: &mut dyn ControlHost) -> StagehandResult<()> {
        if self.mounted {
            host.remove_controls()?;
            self.mounted = false;
        }
        Ok(())
    }
}
