//! Simulated host environment
//!
//! Stands in for the page: keeps a live listener table, records mounted
//! control layouts and answers removal prompts from a script.

use std::collections::VecDeque;

use stagehand_core::{RawEventKind, StagehandError, StagehandResult, SubscriptionId};
use stagehand_input::{ConfirmPrompt, ControlHost, ControlLayout, ElementRef, EventHost};
use stagehand_runtime::PlayerHost;

/// A native listener registered on the simulated page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveListener {
    pub element: ElementRef,
    pub kind: RawEventKind,
    pub id: SubscriptionId,
}

/// Simulated page host
#[derive(Debug, Default)]
pub struct SimulatedHost {
    touch: bool,
    listeners: Vec<LiveListener>,
    mounted: Option<ControlLayout>,
    mounts: u32,
    removals: u32,
    /// Scripted prompt answers, consumed front to back
    answers: VecDeque<bool>,
    /// Answer once the script runs out
    default_answer: bool,
    prompts: Vec<String>,
}

impl SimulatedHost {
    /// Desktop host without touch support
    pub fn desktop() -> Self {
        Self::default()
    }

    /// Touch-capable host
    pub fn touch() -> Self {
        SimulatedHost {
            touch: true,
            ..Self::default()
        }
    }

    /// Queue answers for upcoming prompts
    pub fn with_answers(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.answers.extend(answers);
        self
    }

    pub fn with_default_answer(mut self, answer: bool) -> Self {
        self.default_answer = answer;
        self
    }

    pub fn listeners(&self) -> &[LiveListener] {
        &self.listeners
    }

    /// Every listener registered for `kind` on `element`, in registration order
    pub fn listeners_for(&self, element: &ElementRef, kind: RawEventKind) -> Vec<SubscriptionId> {
        self.listeners
            .iter()
            .filter(|l| &l.element == element && l.kind == kind)
            .map(|l| l.id)
            .collect()
    }

    /// Ids the page would invoke, in registration order, when `kind` fires on `element`
    pub fn fire(&self, element: &ElementRef, kind: RawEventKind) -> Vec<SubscriptionId> {
        self.listeners_for(element, kind)
    }

    pub fn mounted(&self) -> Option<&ControlLayout> {
        self.mounted.as_ref()
    }

    pub fn mounts(&self) -> u32 {
        self.mounts
    }

    pub fn removals(&self) -> u32 {
        self.removals
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl EventHost for SimulatedHost {
    fn add_listener(
        &mut self,
        element: &ElementRef,
        kind: RawEventKind,
        id: SubscriptionId,
    ) -> StagehandResult<()> {
        self.listeners.push(LiveListener {
            element: element.clone(),
            kind,
            id,
        });
        Ok(())
    }

    fn remove_listener(
        &mut self,
        _element: &ElementRef,
        _kind: RawEventKind,
        id: SubscriptionId,
    ) -> StagehandResult<()> {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        if self.listeners.len() == before {
            return Err(StagehandError::Host(format!("no live listener {id}")));
        }
        Ok(())
    }
}

impl ControlHost for SimulatedHost {
    fn mount_controls(&mut self, layout: &ControlLayout) -> StagehandResult<()> {
        self.mounted = Some(layout.clone());
        self.mounts += 1;
        Ok(())
    }

    fn remove_controls(&mut self) -> StagehandResult<()> {
        if self.mounted.take().is_none() {
            return Err(StagehandError::Host("no controls mounted".to_string()));
        }
        self.removals += 1;
        Ok(())
    }
}

impl ConfirmPrompt for SimulatedHost {
    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_string());
        self.answers.pop_front().unwrap_or(self.default_answer)
    }
}

impl PlayerHost for SimulatedHost {
    fn touch_capable(&self) -> bool {
        self.touch
    }
}
