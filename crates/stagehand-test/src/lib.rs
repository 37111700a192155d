//! Stagehand Test Harness - simulated hosts and seeded scenarios
//!
//! This crate provides:
//! - A simulated page host (listener table, control mounting, scripted prompts)
//! - A recording VM
//! - A seeded project clock simulator
//! - A seeded raw event generator
//! - A player session harness that fires events the way a page would

pub mod host;
pub mod vm;
pub mod clock_simulator;
pub mod input_simulator;
pub mod session;

#[cfg(test)]
mod scenarios;

pub use host::*;
pub use vm::*;
pub use clock_simulator::*;
pub use input_simulator::*;
pub use session::*;
