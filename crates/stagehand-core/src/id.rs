//! Identity types for listener bookkeeping
//!
//! Listener registrations are tracked by explicit ids rather than by the
//! callbacks themselves, so the host only ever needs to hand back a number.

use std::fmt;

/// Subscription identity - one entry in the router's dispatch table
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SubscriptionId(pub u64);

impl SubscriptionId {
    pub const ZERO: SubscriptionId = SubscriptionId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        SubscriptionId(id)
    }

    /// The id following this one
    #[inline]
    pub fn next(self) -> Self {
        SubscriptionId(self.0 + 1)
    }
}

impl fmt::Debug for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-chosen tag for notification handlers.
///
/// A notification handler does not post anything to the VM; the router
/// returns the tag so the owner can react outside the listener.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct HandlerTag(pub u32);

impl HandlerTag {
    /// The implicit "any key pressed" listener of the virtual control surface
    pub const HARDWARE_KEY: HandlerTag = HandlerTag(1);
}
