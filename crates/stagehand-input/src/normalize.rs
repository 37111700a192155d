//! Input normalization
//!
//! Converts raw pointer and keyboard events into the canonical records the
//! VM input channel accepts.

use stagehand_core::{
    CanonicalKeyEvent, CanonicalPointerEvent, KeyToken, PressState, StagehandError,
    StagehandResult, SurfaceBox,
};

use crate::RawEvent;

/// Normalize a pointer event against the current surface geometry.
///
/// Touch events use the first changed touch; everything else uses the
/// event's own client coordinates.
pub fn normalize_pointer(
    raw: &RawEvent,
    surface: &SurfaceBox,
) -> StagehandResult<CanonicalPointerEvent> {
    if !raw.kind.is_pointer() {
        return Err(StagehandError::NotAPointerEvent(raw.kind));
    }

    let (client_x, client_y) = match &raw.changed_touches {
        Some(touches) => touches
            .first()
            .map(|t| (t.client_x, t.client_y))
            .ok_or(StagehandError::MissingCoordinates { kind: raw.kind })?,
        None => raw
            .client
            .ok_or(StagehandError::MissingCoordinates { kind: raw.kind })?,
    };

    Ok(CanonicalPointerEvent {
        x: client_x - surface.left,
        y: client_y - surface.top,
        surface_width: surface.width,
        surface_height: surface.height,
        phase: raw.kind.phase(),
    })
}

/// Normalize a keyboard-class event.
///
/// Virtual controls listen to touch and mouse press/release classes and
/// supply `override_token`; only movement classes are rejected.
pub fn normalize_key(
    raw: &RawEvent,
    override_token: Option<&KeyToken>,
) -> StagehandResult<CanonicalKeyEvent> {
    let is_down = match raw.kind.phase() {
        PressState::Press => true,
        PressState::Release => false,
        PressState::Move => return Err(StagehandError::NotAKeyEvent(raw.kind)),
    };

    let key = match override_token {
        Some(token) => KeyToken::new(token.as_str()),
        None => KeyToken::new(raw.key.as_deref().ok_or(StagehandError::MissingKey)?),
    };

    Ok(CanonicalKeyEvent { key, is_down })
}

/// Normalizer holding the latest surface geometry snapshot
#[derive(Clone, Debug, Default)]
pub struct InputNormalizer {
    surface: Option<SurfaceBox>,
}

impl InputNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_surface(surface: SurfaceBox) -> Self {
        InputNormalizer {
            surface: Some(surface),
        }
    }

    /// Replace the geometry; call after every layout change
    pub fn set_surface(&mut self, surface: SurfaceBox) {
        self.surface = Some(surface);
    }

    pub fn surface(&self) -> Option<SurfaceBox> {
        self.surface
    }

    pub fn pointer(&self, raw: &RawEvent) -> StagehandResult<CanonicalPointerEvent> {
        let surface = self
            .surface
            .as_ref()
            .ok_or(StagehandError::MissingSurfaceGeometry)?;
        normalize_pointer(raw, surface)
    }

    pub fn key(
        &self,
        raw: &RawEvent,
        override_token: Option<&KeyToken>,
    ) -> StagehandResult<CanonicalKeyEvent> {
        normalize_key(raw, override_token)
    }
}
