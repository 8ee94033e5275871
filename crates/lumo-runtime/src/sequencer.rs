//! The demonstration sequencer.
//!
//! [`run_demo`] executes the fixed show-off sequence against whatever
//! [`Robot`] it is handed: log identity and telemetry, run the object
//! locator (charger, cubes, flash), drive a short pattern, nod the
//! head, pause, and say hello. Strictly ordered, one action at a time,
//! no branching and no retries – any [`RobotError`] from the device
//! aborts the run and propagates to the entry point.

use std::time::Duration;

use lumo_hal::Robot;
use lumo_types::{MAX_HEAD_ANGLE_DEG, MIN_HEAD_ANGLE_DEG, RobotError};
use tokio::time::sleep;
use tracing::info;

use crate::locator::{
    self, CHARGER_SEARCH_TIMEOUT, CUBE_COUNT, CUBE_SEARCH_TIMEOUT, FLASH_CYCLES, FLASH_HOLD,
};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Tunables for one demo run.
///
/// [`DemoConfig::default`] reproduces the canonical demo: 100 mm
/// forward at 75 mm/s, two half-turns, a 1 s pause, and a "hai".
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Forward drive distance, millimetres.
    pub drive_distance_mm: f32,
    /// Forward drive speed, millimetres per second.
    pub drive_speed_mmps: f32,
    /// Phrase spoken at the end of the sequence.
    pub phrase: String,
    /// Deadline for the charger search.
    pub charger_timeout: Duration,
    /// Deadline for the cube search.
    pub cube_timeout: Duration,
    /// Number of cubes the search asks for.
    pub cube_count: usize,
    /// Full alternations of the cube flash routine.
    pub flash_cycles: u32,
    /// Hold time for each half of a flash alternation.
    pub flash_hold: Duration,
    /// Fixed pause between the head nod and the spoken phrase.
    pub pause: Duration,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            drive_distance_mm: 100.0,
            drive_speed_mmps: 75.0,
            phrase: "hai".to_string(),
            charger_timeout: CHARGER_SEARCH_TIMEOUT,
            cube_timeout: CUBE_SEARCH_TIMEOUT,
            cube_count: CUBE_COUNT,
            flash_cycles: FLASH_CYCLES,
            flash_hold: FLASH_HOLD,
            pause: Duration::from_secs(1),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sequencer
// ─────────────────────────────────────────────────────────────────────────────

/// Run the full demonstration sequence.
///
/// Steps, in order, each blocking until the device reports completion:
///
/// 1. Log name, battery voltage, and accelerometer.
/// 2. Locate objects: charger search, cube search, cube flash.
/// 3. Drive forward (`drive_distance_mm` at `drive_speed_mmps`).
/// 4. Turn in place 180° twice (one full rotation).
/// 5. Nod: head to minimum, maximum, minimum pitch.
/// 6. Pause for `pause`.
/// 7. Speak `phrase`.
///
/// # Errors
///
/// The first [`RobotError`] from any step aborts the remainder of the
/// sequence.
pub async fn run_demo<R: Robot>(robot: &R, config: &DemoConfig) -> Result<(), RobotError> {
    info!("--------------------------");
    info!(name = robot.name(), "demo sequence started");

    let telemetry = robot.telemetry();
    info!(
        battery_volts = f64::from(telemetry.battery_volts),
        accelerometer = %telemetry.accelerometer,
        "device telemetry"
    );

    locator::locate_objects(robot, config).await?;

    // Move forward, then one full rotation as two half-turns.
    robot
        .drive_straight(config.drive_distance_mm, config.drive_speed_mmps)
        .await?;
    robot.turn_in_place(180.0).await?;
    robot.turn_in_place(180.0).await?;

    // Nod the head.
    robot.set_head_angle(MIN_HEAD_ANGLE_DEG).await?;
    robot.set_head_angle(MAX_HEAD_ANGLE_DEG).await?;
    robot.set_head_angle(MIN_HEAD_ANGLE_DEG).await?;

    sleep(config.pause).await;

    robot.say(&config.phrase).await?;

    info!("--------------------------");
    Ok(())
}
