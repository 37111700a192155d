//! Stagehand Time - project time virtualization
//!
//! This crate implements:
//! - Host clocks (system monotonic, manually driven)
//! - TimeSource: compat-tick timestamps layered over the host clock
//! - ProjectClock: pausable, resettable elapsed project time

pub mod source;
pub mod clock;

pub use source::*;
pub use clock::*;
