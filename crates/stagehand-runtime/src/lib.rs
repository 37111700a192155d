//! Stagehand Runtime - player orchestration
//!
//! Wires the pieces together for one VM instance:
//! 1. Host compat ticks and resizes update the clock and geometry snapshot
//! 2. Program load restarts the clock, scans keys and attaches listeners
//! 3. Touch hosts get a virtual control surface
//! 4. Raw events are routed to the VM input channel
//! 5. Hardware-key notifications may tear the virtual controls down
//! 6. A status poller mirrors one program variable to the page

pub mod config;
pub mod telemetry;
pub mod host;
pub mod player;
pub mod status;

pub use config::*;
pub use telemetry::*;
pub use host::*;
pub use player::*;
pub use status::*;
