//! Stagehand Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every layer of the player glue:
//! - Identifiers (SubscriptionId, HandlerTag)
//! - Time primitives (TimePoint)
//! - Key tokens and ordered key sets
//! - Raw event classes and canonical events handed to the VM
//! - Read-only program introspection model
//! - Error type

pub mod id;
pub mod time;
pub mod key;
pub mod event;
pub mod program;
pub mod error;

pub use id::*;
pub use time::*;
pub use key::*;
pub use event::*;
pub use program::*;
pub use error::*;
