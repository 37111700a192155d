//! Stagehand Input - from host events to VM input
//!
//! This crate implements:
//! - Raw host event records
//! - Input normalization into canonical pointer/key events
//! - Static key-usage scanning of loaded programs
//! - Virtual control layout for touch-only hosts
//! - The virtual control surface and its removal consent
//! - The event router (dispatch table + VM sink)
//!
//! ```text
//! host listener → EventRouter::dispatch → normalize → IoSink::post_io_data
//!                        │
//!                 notification tags → owner (e.g. hardware-key detection)
//! ```

pub mod raw;
pub mod normalize;
pub mod scanner;
pub mod controls;
pub mod surface;
pub mod router;
pub mod sources;

pub use raw::*;
pub use normalize::*;
pub use scanner::*;
pub use controls::*;
pub use surface::*;
pub use router::*;
pub use sources::*;
