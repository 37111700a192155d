//! Standard source descriptor sets

use stagehand_core::{HandlerTag, RawEventKind};

use crate::{ControlLayout, ElementRef, Handler, SourceDescriptor};

/// Pointer classes observed on desktop hosts
pub const DESKTOP_POINTER_EVENTS: [RawEventKind; 3] = [
    RawEventKind::MouseMove,
    RawEventKind::MouseDown,
    RawEventKind::MouseUp,
];

/// Keyboard classes observed on every host
pub const KEYBOARD_EVENTS: [RawEventKind; 2] = [RawEventKind::KeyDown, RawEventKind::KeyUp];

/// Pointer classes observed on touch hosts
pub const TOUCH_POINTER_EVENTS: [RawEventKind; 3] = [
    RawEventKind::TouchMove,
    RawEventKind::TouchStart,
    RawEventKind::TouchEnd,
];

/// Mouse and hardware keyboard on the body
pub fn desktop_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::new(ElementRef::Body, &DESKTOP_POINTER_EVENTS, Handler::Pointer),
        SourceDescriptor::new(ElementRef::Body, &KEYBOARD_EVENTS, Handler::Key { code: None }),
    ]
}

/// Touch pointer on the body, one keyboard source per control, and the
/// hardware-key notification listener
pub fn virtual_sources(layout: &ControlLayout) -> Vec<SourceDescriptor> {
    let mut sources = Vec::with_capacity(layout.len() + 2);
    sources.push(SourceDescriptor::new(
        ElementRef::Body,
        &TOUCH_POINTER_EVENTS,
        Handler::Pointer,
    ));

    for control in layout.descriptors() {
        sources.push(SourceDescriptor::new(
            ElementRef::Selector(control.selector.clone()),
            control.events(),
            Handler::Key {
                code: Some(control.code.clone()),
            },
        ));
    }

    sources.push(SourceDescriptor::new(
        ElementRef::Body,
        &[RawEventKind::KeyDown],
        Handler::Notify(HandlerTag::HARDWARE_KEY),
    ));
    sources
}
