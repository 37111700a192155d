//! Event definitions
//!
//! Raw host event classes, the press/release/move phase they map to, and
//! the canonical records handed to the VM input channel.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::{KeyToken, StagehandError, StagehandResult};

/// Raw host event class
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RawEventKind {
    MouseDown,
    MouseUp,
    MouseMove,
    TouchStart,
    TouchEnd,
    TouchMove,
    KeyDown,
    KeyUp,
}

impl RawEventKind {
    /// Parse a host event class name (`"mousedown"`, `"touchend"`, ...)
    pub fn from_name(name: &str) -> StagehandResult<Self> {
        match name {
            "mousedown" => Ok(RawEventKind::MouseDown),
            "mouseup" => Ok(RawEventKind::MouseUp),
            "mousemove" => Ok(RawEventKind::MouseMove),
            "touchstart" => Ok(RawEventKind::TouchStart),
            "touchend" => Ok(RawEventKind::TouchEnd),
            "touchmove" => Ok(RawEventKind::TouchMove),
            "keydown" => Ok(RawEventKind::KeyDown),
            "keyup" => Ok(RawEventKind::KeyUp),
            other => Err(StagehandError::UnknownEventKind(other.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RawEventKind::MouseDown => "mousedown",
            RawEventKind::MouseUp => "mouseup",
            RawEventKind::MouseMove => "mousemove",
            RawEventKind::TouchStart => "touchstart",
            RawEventKind::TouchEnd => "touchend",
            RawEventKind::TouchMove => "touchmove",
            RawEventKind::KeyDown => "keydown",
            RawEventKind::KeyUp => "keyup",
        }
    }

    /// Press, release or move
    pub fn phase(self) -> PressState {
        match self {
            RawEventKind::MouseDown | RawEventKind::TouchStart | RawEventKind::KeyDown => {
                PressState::Press
            }
            RawEventKind::MouseUp | RawEventKind::TouchEnd | RawEventKind::KeyUp => {
                PressState::Release
            }
            RawEventKind::MouseMove | RawEventKind::TouchMove => PressState::Move,
        }
    }

    #[inline]
    pub fn is_keyboard(self) -> bool {
        matches!(self, RawEventKind::KeyDown | RawEventKind::KeyUp)
    }

    #[inline]
    pub fn is_pointer(self) -> bool {
        !self.is_keyboard()
    }
}

impl fmt::Display for RawEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Phase of an input event.
///
/// `Move` carries no down/up information at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PressState {
    Press,
    Release,
    Move,
}

impl PressState {
    /// `Some(true)` for press, `Some(false)` for release, `None` for movement
    #[inline]
    pub fn is_down(self) -> Option<bool> {
        match self {
            PressState::Press => Some(true),
            PressState::Release => Some(false),
            PressState::Move => None,
        }
    }
}

/// Device channel on the VM input side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Mouse,
    Keyboard,
}

impl DeviceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceKind::Mouse => "mouse",
            DeviceKind::Keyboard => "keyboard",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Control-surface bounding box in host coordinates
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct SurfaceBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        SurfaceBox {
            left,
            top,
            width,
            height,
        }
    }
}

/// Pointer event relative to the control surface's top-left corner
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanonicalPointerEvent {
    pub x: f64,
    pub y: f64,
    pub surface_width: f64,
    pub surface_height: f64,
    pub phase: PressState,
}

impl CanonicalPointerEvent {
    #[inline]
    pub fn is_down(&self) -> Option<bool> {
        self.phase.is_down()
    }
}

/// Wire shape expected by the VM: `isDown` is omitted for movement
impl Serialize for CanonicalPointerEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let is_down = self.is_down();
        let len = if is_down.is_some() { 5 } else { 4 };
        let mut s = serializer.serialize_struct("CanonicalPointerEvent", len)?;
        s.serialize_field("x", &self.x)?;
        s.serialize_field("y", &self.y)?;
        s.serialize_field("canvasWidth", &self.surface_width)?;
        s.serialize_field("canvasHeight", &self.surface_height)?;
        match is_down {
            Some(down) => s.serialize_field("isDown", &down)?,
            None => s.skip_field("isDown")?,
        }
        s.end()
    }
}

/// Keyboard event with a normalized token
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalKeyEvent {
    pub key: KeyToken,
    pub is_down: bool,
}

/// Payload of one `postIOData` call
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IoData {
    Mouse(CanonicalPointerEvent),
    Keyboard(CanonicalKeyEvent),
}

impl IoData {
    pub fn device(&self) -> DeviceKind {
        match self {
            IoData::Mouse(_) => DeviceKind::Mouse,
            IoData::Keyboard(_) => DeviceKind::Keyboard,
        }
    }
}
