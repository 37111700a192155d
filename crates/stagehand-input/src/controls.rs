//! Virtual control layout
//!
//! Decides which on-screen controls a touch-only host needs for a program
//! and how they are grouped. Purely logical: turning the layout into
//! elements is the host's job.

use stagehand_core::{ArrowDirection, KeySet, KeyToken, RawEventKind};

/// Event classes every synthesized control listens to
pub const CONTROL_EVENTS: [RawEventKind; 4] = [
    RawEventKind::TouchStart,
    RawEventKind::TouchEnd,
    RawEventKind::MouseDown,
    RawEventKind::MouseUp,
];

/// Control classification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    Arrow(ArrowDirection),
    Text,
}

/// One synthesized on-screen control
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlDescriptor {
    /// Key token as discovered in the program
    pub token: KeyToken,
    pub kind: ControlKind,
    /// Token posted to the VM when the control is pressed
    pub code: KeyToken,
    /// Selector of the rendered control element
    pub selector: String,
}

impl ControlDescriptor {
    /// Classify one discovered key
    pub fn for_key(token: &KeyToken) -> Self {
        match token.arrow() {
            Some(dir) => ControlDescriptor {
                token: token.clone(),
                kind: ControlKind::Arrow(dir),
                code: dir.key_code(),
                selector: dir.selector(),
            },
            None => ControlDescriptor {
                token: token.clone(),
                kind: ControlKind::Text,
                code: token.clone(),
                selector: format!(".{}", token.label()),
            },
        }
    }

    pub fn is_arrow(&self) -> bool {
        matches!(self.kind, ControlKind::Arrow(_))
    }

    /// Event classes this control subscribes to
    pub fn events(&self) -> &'static [RawEventKind] {
        &CONTROL_EVENTS
    }
}

/// Layout variant chosen from the control counts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutVariant {
    ArrowOnly,
    ArrowPlusOne,
    ArrowPlusMany,
}

impl LayoutVariant {
    /// Evaluated in order: arrows and no text, arrows and one text, anything else
    pub fn select(arrows: usize, text: usize) -> Self {
        if arrows > 0 && text == 0 {
            LayoutVariant::ArrowOnly
        } else if arrows > 0 && text == 1 {
            LayoutVariant::ArrowPlusOne
        } else {
            LayoutVariant::ArrowPlusMany
        }
    }

    /// Class name applied to the controls container
    pub fn class_name(self) -> &'static str {
        match self {
            LayoutVariant::ArrowOnly => "arrow-only",
            LayoutVariant::ArrowPlusOne => "arrow-one-button",
            LayoutVariant::ArrowPlusMany => "arrow-many-buttons",
        }
    }

    /// Whether the container has a text-button group
    pub fn has_text_group(self) -> bool {
        !matches!(self, LayoutVariant::ArrowOnly)
    }
}

/// Grouped control descriptors.
///
/// The implicit "any key" listener is part of every layout's listener set
/// but never appears here as a descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlLayout {
    pub arrows: Vec<ControlDescriptor>,
    pub text: Vec<ControlDescriptor>,
    pub variant: LayoutVariant,
}

impl ControlLayout {
    /// Build the layout for a set of discovered keys
    pub fn build(keys: &KeySet) -> Self {
        let (arrows, text): (Vec<_>, Vec<_>) = keys
            .iter()
            .map(ControlDescriptor::for_key)
            .partition(ControlDescriptor::is_arrow);

        let variant = LayoutVariant::select(arrows.len(), text.len());
        tracing::info!(
            arrows = arrows.len(),
            text = text.len(),
            variant = variant.class_name(),
            "virtual control layout built"
        );

        ControlLayout {
            arrows,
            text,
            variant,
        }
    }

    /// All descriptors, arrows first
    pub fn descriptors(&self) -> impl Iterator<Item = &ControlDescriptor> {
        self.arrows.iter().chain(self.text.iter())
    }

    pub fn len(&self) -> usize {
        self.arrows.len() + self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
