//! Raw host events
//!
//! A host listener copies the handful of fields the normalizer needs out of
//! the native event object into a `RawEvent`.

use stagehand_core::{RawEventKind, StagehandResult};

/// One touch point of a multi-touch event
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub client_x: f64,
    pub client_y: f64,
}

impl TouchPoint {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        TouchPoint { client_x, client_y }
    }
}

/// Raw host event
#[derive(Clone, Debug, PartialEq)]
pub struct RawEvent {
    pub kind: RawEventKind,
    /// Client coordinates of the event itself
    pub client: Option<(f64, f64)>,
    /// Present when the event carries multi-touch data
    pub changed_touches: Option<Vec<TouchPoint>>,
    /// Host key identifier for keyboard events
    pub key: Option<String>,
}

impl RawEvent {
    pub fn new(kind: RawEventKind) -> Self {
        RawEvent {
            kind,
            client: None,
            changed_touches: None,
            key: None,
        }
    }

    /// Build from a host event class name
    pub fn named(name: &str) -> StagehandResult<Self> {
        Ok(Self::new(RawEventKind::from_name(name)?))
    }

    /// Mouse event at client coordinates
    pub fn mouse(kind: RawEventKind, client_x: f64, client_y: f64) -> Self {
        Self::new(kind).with_client(client_x, client_y)
    }

    /// Touch event with its changed touches
    pub fn touch(kind: RawEventKind, changed: Vec<TouchPoint>) -> Self {
        RawEvent {
            changed_touches: Some(changed),
            ..Self::new(kind)
        }
    }

    /// Keyboard event with a host key identifier
    pub fn key(kind: RawEventKind, key: impl Into<String>) -> Self {
        RawEvent {
            key: Some(key.into()),
            ..Self::new(kind)
        }
    }

    pub fn with_client(mut self, client_x: f64, client_y: f64) -> Self {
        self.client = Some((client_x, client_y));
        self
    }

    #[inline]
    pub fn is_touch(&self) -> bool {
        self.changed_touches.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let ev = RawEvent::mouse(RawEventKind::MouseDown, 3.0, 4.0);
        assert_eq!(ev.client, Some((3.0, 4.0)));
        assert!(!ev.is_touch());

        let ev = RawEvent::touch(RawEventKind::TouchStart, vec![TouchPoint::new(1.0, 2.0)]);
        assert!(ev.is_touch());
        assert!(ev.client.is_none());

        let ev = RawEvent::named("keyup").unwrap();
        assert_eq!(ev.kind, RawEventKind::KeyUp);
        assert!(RawEvent::named("pointerdown").is_err());
    }
}
