//! `lumo-hal` – the robot capability surface.
//!
//! The real device is driven by a vendor SDK over radio; this crate
//! pins down exactly the slice of that SDK the demo consumes and hides
//! it behind the [`Robot`] trait so everything above it can run against
//! a scripted double.
//!
//! # Modules
//!
//! - [`robot`] – the [`Robot`] trait: telemetry, world-model queries,
//!   behavior start/stop, timed waits, motion, speech, cube lights.
//! - [`behavior`] – [`BehaviorGuard`]: scoped start/stop for background
//!   behaviors, guaranteeing the stop on every exit path.
//! - [`sim`] – [`SimRobot`]: a scripted in-process double that records
//!   every command, for headless tests and CI pipelines.

pub mod behavior;
pub mod robot;
pub mod sim;

pub use behavior::BehaviorGuard;
pub use robot::Robot;
pub use sim::{MotionCommand, SimRobot, SimRobotBuilder};
