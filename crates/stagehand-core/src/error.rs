//! Error types for Stagehand

use thiserror::Error;

use crate::{RawEventKind, SubscriptionId};

/// Core Stagehand errors
#[derive(Error, Debug)]
pub enum StagehandError {
    // Input errors
    #[error("Pointer event {kind} carries neither touch nor client coordinates")]
    MissingCoordinates { kind: RawEventKind },

    #[error("Control-surface geometry has not been supplied")]
    MissingSurfaceGeometry,

    #[error("Not a pointer event: {0}")]
    NotAPointerEvent(RawEventKind),

    #[error("Not a keyboard event: {0}")]
    NotAKeyEvent(RawEventKind),

    #[error("Keyboard event without a key identifier")]
    MissingKey,

    #[error("Unknown event kind: {0}")]
    UnknownEventKind(String),

    // Router errors
    #[error("Unknown subscription: {0}")]
    UnknownSubscription(SubscriptionId),

    // Loading errors
    #[error("Invalid project: {0}")]
    InvalidProject(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    // Host errors
    #[error("Host error: {0}")]
    Host(String),
}

/// Result type for Stagehand operations
pub type StagehandResult<T> = Result<T, StagehandError>;
