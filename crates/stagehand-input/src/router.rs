//! Event router
//!
//! Listener registrations live in one dispatch table keyed by
//! `SubscriptionId`. The host registers a native listener per id and hands
//! the id back with each raw event; the router normalizes the event against
//! the caller's geometry snapshot and forwards it to the VM sink.

use std::collections::BTreeMap;

use stagehand_core::{
    DeviceKind, HandlerTag, IoData, KeyToken, RawEventKind, StagehandError, StagehandResult,
    SubscriptionId,
};

use crate::{InputNormalizer, RawEvent};

/// Element a source listens on
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementRef {
    /// The document body
    Body,
    /// First element matching a selector
    Selector(String),
}

/// What a subscription does with its events
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Handler {
    /// Default pointer normalization, posted as `mouse`
    Pointer,
    /// Default key normalization, posted as `keyboard`; `code` overrides the event's key
    Key { code: Option<KeyToken> },
    /// Caller-handled: nothing is posted, the tag is returned to the caller
    Notify(HandlerTag),
}

impl Handler {
    /// Pointer sources suppress the host's default handling
    pub fn prevents_default(&self) -> bool {
        matches!(self, Handler::Pointer)
    }
}

/// One raw event source: an element, the classes to subscribe, and a handler
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub element: ElementRef,
    pub events: Vec<RawEventKind>,
    pub handler: Handler,
}

impl SourceDescriptor {
    pub fn new(element: ElementRef, events: &[RawEventKind], handler: Handler) -> Self {
        SourceDescriptor {
            element,
            events: events.to_vec(),
            handler,
        }
    }
}

/// Host capability for native listener registration
pub trait EventHost {
    fn add_listener(
        &mut self,
        element: &ElementRef,
        kind: RawEventKind,
        id: SubscriptionId,
    ) -> StagehandResult<()>;

    fn remove_listener(
        &mut self,
        element: &ElementRef,
        kind: RawEventKind,
        id: SubscriptionId,
    ) -> StagehandResult<()>;
}

/// VM input channel; fire-and-forget
pub trait IoSink {
    fn post_io_data(&mut self, data: IoData);
}

/// Dispatch table entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub element: ElementRef,
    pub kind: RawEventKind,
    pub handler: Handler,
}

/// What a dispatch did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatched {
    Posted(DeviceKind),
    Notified(HandlerTag),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Host must call its equivalent of `preventDefault`
    pub prevent_default: bool,
    pub action: Dispatched,
}

/// Router statistics
#[derive(Clone, Debug, Default)]
pub struct RouterStats {
    pub attached: u64,
    pub detached: u64,
    pub posted_mouse: u64,
    pub posted_keyboard: u64,
    pub notified: u64,
}

/// Event router.
///
/// Registration is additive: attaching the same source twice yields two
/// subscriptions and doubled posts.
#[derive(Debug, Default)]
pub struct EventRouter {
    table: BTreeMap<SubscriptionId, Subscription>,
    next_id: SubscriptionId,
    stats: RouterStats,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one listener per (source, event class).
    /// Returns the new ids in registration order.
    pub fn attach<I>(
        &mut self,
        sources: I,
        host: &mut dyn EventHost,
    ) -> StagehandResult<Vec<SubscriptionId>>
    where
        I: IntoIterator<Item = SourceDescriptor>,
    {
        let mut ids = Vec::new();
        for source in sources {
            for kind in &source.events {
                self.next_id = self.next_id.next();
                let id = self.next_id;
                host.add_listener(&source.element, *kind, id)?;
                tracing::debug!(%id, element = ?source.element, event = %kind, "listener attached");
                self.table.insert(
                    id,
                    Subscription {
                        id,
                        element: source.element.clone(),
                        kind: *kind,
                        handler: source.handler.clone(),
                    },
                );
                self.stats.attached += 1;
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Remove one listener. The entry stays in the table if the host
    /// fails to remove the native listener.
    pub fn detach(&mut self, id: SubscriptionId, host: &mut dyn EventHost) -> StagehandResult<()> {
        let sub = self
            .table
            .get(&id)
            .ok_or(StagehandError::UnknownSubscription(id))?;
        host.remove_listener(&sub.element, sub.kind, id)?;
        self.table.remove(&id);
        self.stats.detached += 1;
        tracing::debug!(%id, "listener detached");
        Ok(())
    }

    /// Remove every listener in `ids`, carrying on past failures.
    /// Returns the first error; ids that failed stay attached.
    pub fn detach_many(
        &mut self,
        ids: &[SubscriptionId],
        host: &mut dyn EventHost,
    ) -> StagehandResult<()> {
        let mut first_err = None;
        for id in ids {
            if let Err(e) = self.detach(*id, host) {
                tracing::warn!(%id, error = %e, "listener detach failed");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Remove every listener (program reload)
    pub fn detach_all(&mut self, host: &mut dyn EventHost) -> StagehandResult<()> {
        let ids: Vec<SubscriptionId> = self.table.keys().copied().collect();
        self.detach_many(&ids, host)
    }

    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.table.contains_key(&id)
    }

    /// Handle one raw event delivered for subscription `id`
    pub fn dispatch(
        &mut self,
        id: SubscriptionId,
        raw: &RawEvent,
        normalizer: &InputNormalizer,
        sink: &mut dyn IoSink,
    ) -> StagehandResult<DispatchOutcome> {
        let sub = self
            .table
            .get(&id)
            .ok_or(StagehandError::UnknownSubscription(id))?;
        if sub.kind != raw.kind {
            tracing::trace!(%id, expected = %sub.kind, got = %raw.kind, "event class differs from subscription");
        }

        let prevent_default = sub.handler.prevents_default();
        let action = match &sub.handler {
            Handler::Pointer => {
                let data = normalizer.pointer(raw)?;
                sink.post_io_data(IoData::Mouse(data));
                self.stats.posted_mouse += 1;
                Dispatched::Posted(DeviceKind::Mouse)
            }
            Handler::Key { code } => {
                let data = normalizer.key(raw, code.as_ref())?;
                sink.post_io_data(IoData::Keyboard(data));
                self.stats.posted_keyboard += 1;
                Dispatched::Posted(DeviceKind::Keyboard)
            }
            Handler::Notify(tag) => {
                self.stats.notified += 1;
                Dispatched::Notified(*tag)
            }
        };

        Ok(DispatchOutcome {
            prevent_default,
            action,
        })
    }

    pub fn subscription(&self, id: SubscriptionId) -> Option<&Subscription> {
        self.table.get(&id)
    }

    pub fn subscriptions(&self) -> impl Iterator<Item = &Subscription> {
        self.table.values()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn stats(&self) -> &RouterStats {
        &self.stats
    }
}
