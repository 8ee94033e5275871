//! `lumo-runtime` – the demo's coordination logic.
//!
//! Everything hard about the robot (perception, localization, behavior
//! execution, speech) lives behind the [`Robot`][lumo_hal::Robot]
//! trait; this crate only sequences it.
//!
//! # Modules
//!
//! - [`locator`] – the timeout-bounded object searches:
//!   [`locate_charger`][locator::locate_charger] (30 s deadline,
//!   [`ChargerLocation::Unknown`][lumo_types::ChargerLocation] fallback),
//!   [`locate_cubes`][locator::locate_cubes] (60 s deadline, partial
//!   sets allowed), and [`flash_cubes`][locator::flash_cubes] (the
//!   celebratory green/red diagonal alternation).
//! - [`sequencer`] – [`run_demo`][sequencer::run_demo]: the fixed
//!   ordered demonstration sequence, configured by
//!   [`DemoConfig`][sequencer::DemoConfig].
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: tracing
//!   subscriber setup (EnvFilter, compact or JSON output).

pub mod locator;
pub mod sequencer;
pub mod telemetry;

pub use locator::{flash_cubes, locate_charger, locate_cubes, locate_objects};
pub use sequencer::{DemoConfig, run_demo};
pub use telemetry::init_tracing;
