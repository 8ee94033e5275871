//! In-process simulated robot for CI/CD testing without physical hardware.
//!
//! [`SimRobot`] implements [`Robot`] against a scripted world: the
//! builder decides whether a charger is already in the world model, when
//! (if ever) the charger becomes observable during a search, and when
//! each light cube is sighted. Every command is recorded so tests can
//! assert on exactly what the coordination code asked the device to do.
//!
//! All waits and motion durations ride on `tokio::time`, so tests using
//! `#[tokio::test(start_paused = true)]` execute scripted minutes in
//! microseconds.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use lumo_hal::SimRobot;
//! use lumo_types::Position;
//!
//! let robot = SimRobot::builder()
//!     .charger_observed_after(Duration::from_secs(5), Position::new(200.0, 0.0, 0.0))
//!     .build();
//! ```

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use lumo_types::{
    Accel, BehaviorId, BehaviorKind, CornerLights, CubeId, CubeSighting, MAX_HEAD_ANGLE_DEG,
    MIN_HEAD_ANGLE_DEG, Pose, Position, RobotError, Telemetry, WaitOutcome,
};
use tokio::time::sleep;
use tracing::trace;

use crate::robot::Robot;

/// How fast the simulated robot rotates in place, degrees per second.
const SIM_TURN_RATE_DPS: f32 = 90.0;

/// Fixed simulated duration of a head move.
const SIM_HEAD_MOVE: Duration = Duration::from_millis(500);

/// Simulated speech rate: one second per spoken phrase.
const SIM_SPEECH: Duration = Duration::from_secs(1);

// ────────────────────────────────────────────────────────────────────────────
// Recorded commands
// ────────────────────────────────────────────────────────────────────────────

/// One motion command the sim received, recorded for test assertions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionCommand {
    DriveStraight { distance_mm: f32, speed_mmps: f32 },
    TurnInPlace { degrees: f32 },
    SetHeadAngle { degrees: f32 },
}

#[derive(Default)]
struct Recorder {
    behavior_starts: u32,
    behavior_stops: u32,
    running: Vec<BehaviorId>,
    spoken: Vec<String>,
    motions: Vec<MotionCommand>,
    light_calls: HashMap<CubeId, Vec<CornerLights>>,
}

// ────────────────────────────────────────────────────────────────────────────
// SimRobot
// ────────────────────────────────────────────────────────────────────────────

/// A scripted stand-in for the physical robot. See the module docs.
pub struct SimRobot {
    name: String,
    pose: Pose,
    battery_volts: f32,
    accelerometer: Accel,
    known_charger: Option<Pose>,
    /// When, during a search, the charger becomes observable. `None`
    /// means the charger never appears and charger waits always time
    /// out.
    charger_sighting: Option<(Duration, Position)>,
    /// Scripted cube sightings, sorted by appearance delay.
    cube_sightings: Vec<(Duration, CubeSighting)>,
    recorder: Mutex<Recorder>,
}

impl SimRobot {
    /// Start building a simulated robot with an empty world.
    pub fn builder() -> SimRobotBuilder {
        SimRobotBuilder::default()
    }

    // ── Test accessors ──────────────────────────────────────────────────

    /// Total `start_behavior` calls received.
    pub fn behavior_starts(&self) -> u32 {
        self.recorder.lock().unwrap().behavior_starts
    }

    /// Total effective `stop_behavior` calls (stops of behaviors that
    /// were actually running; idempotent re-stops are not counted).
    pub fn behavior_stops(&self) -> u32 {
        self.recorder.lock().unwrap().behavior_stops
    }

    /// Every phrase spoken so far, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.recorder.lock().unwrap().spoken.clone()
    }

    /// Every motion command received, in order.
    pub fn motions(&self) -> Vec<MotionCommand> {
        self.recorder.lock().unwrap().motions.clone()
    }

    /// Every corner-light pattern set on `cube`, in order.
    pub fn light_calls(&self, cube: CubeId) -> Vec<CornerLights> {
        self.recorder
            .lock()
            .unwrap()
            .light_calls
            .get(&cube)
            .cloned()
            .unwrap_or_default()
    }

    fn scripted_cube(&self, cube: CubeId) -> bool {
        self.cube_sightings.iter().any(|(_, s)| s.id == cube)
    }
}

impl Robot for SimRobot {
    fn name(&self) -> &str {
        &self.name
    }

    fn telemetry(&self) -> Telemetry {
        Telemetry {
            battery_volts: self.battery_volts,
            accelerometer: self.accelerometer,
            captured_at: Utc::now(),
        }
    }

    fn pose(&self) -> Pose {
        self.pose
    }

    fn known_charger(&self) -> Option<Pose> {
        self.known_charger
    }

    fn start_behavior(&self, kind: BehaviorKind) -> Result<BehaviorId, RobotError> {
        let id = BehaviorId::new();
        let mut rec = self.recorder.lock().unwrap();
        rec.behavior_starts += 1;
        rec.running.push(id);
        trace!(behavior = %kind, %id, "sim: behavior started");
        Ok(id)
    }

    fn stop_behavior(&self, id: BehaviorId) {
        let mut rec = self.recorder.lock().unwrap();
        // Stopping an unknown or already-stopped behavior is a no-op.
        if let Some(pos) = rec.running.iter().position(|r| *r == id) {
            rec.running.swap_remove(pos);
            rec.behavior_stops += 1;
            trace!(%id, "sim: behavior stopped");
        }
    }

    async fn wait_for_charger(
        &self,
        timeout: Duration,
    ) -> Result<WaitOutcome<Position>, RobotError> {
        match self.charger_sighting {
            Some((delay, position)) if delay <= timeout => {
                sleep(delay).await;
                Ok(WaitOutcome::Observed(position))
            }
            _ => {
                sleep(timeout).await;
                Ok(WaitOutcome::TimedOut)
            }
        }
    }

    async fn wait_for_cubes(
        &self,
        count: usize,
        timeout: Duration,
    ) -> Result<Vec<CubeSighting>, RobotError> {
        let mut found: Vec<CubeSighting> = Vec::new();
        let mut elapsed = Duration::ZERO;

        for &(delay, sighting) in &self.cube_sightings {
            if found.len() == count || delay > timeout {
                break;
            }
            if found.iter().any(|f| f.id == sighting.id) {
                // Same cube re-observed; only distinct cubes count.
                continue;
            }
            sleep(delay.saturating_sub(elapsed)).await;
            elapsed = delay;
            found.push(sighting);
        }

        if found.len() < count {
            // Ran out of scripted sightings; wait out the deadline.
            sleep(timeout.saturating_sub(elapsed)).await;
        }
        Ok(found)
    }

    async fn drive_straight(&self, distance_mm: f32, speed_mmps: f32) -> Result<(), RobotError> {
        if speed_mmps <= 0.0 {
            return Err(RobotError::ActionFailed {
                action: "drive_straight".to_string(),
                details: format!("non-positive speed {speed_mmps}"),
            });
        }
        self.recorder
            .lock()
            .unwrap()
            .motions
            .push(MotionCommand::DriveStraight {
                distance_mm,
                speed_mmps,
            });
        sleep(Duration::from_secs_f32(
            (distance_mm / speed_mmps).abs(),
        ))
        .await;
        Ok(())
    }

    async fn turn_in_place(&self, degrees: f32) -> Result<(), RobotError> {
        self.recorder
            .lock()
            .unwrap()
            .motions
            .push(MotionCommand::TurnInPlace { degrees });
        sleep(Duration::from_secs_f32(
            (degrees / SIM_TURN_RATE_DPS).abs(),
        ))
        .await;
        Ok(())
    }

    async fn set_head_angle(&self, degrees: f32) -> Result<(), RobotError> {
        let clamped = degrees.clamp(MIN_HEAD_ANGLE_DEG, MAX_HEAD_ANGLE_DEG);
        self.recorder
            .lock()
            .unwrap()
            .motions
            .push(MotionCommand::SetHeadAngle { degrees: clamped });
        sleep(SIM_HEAD_MOVE).await;
        Ok(())
    }

    async fn say(&self, text: &str) -> Result<(), RobotError> {
        self.recorder.lock().unwrap().spoken.push(text.to_string());
        sleep(SIM_SPEECH).await;
        Ok(())
    }

    fn set_cube_lights(&self, cube: CubeId, corners: CornerLights) -> Result<(), RobotError> {
        if !self.scripted_cube(cube) {
            return Err(RobotError::UnknownCube(cube));
        }
        self.recorder
            .lock()
            .unwrap()
            .light_calls
            .entry(cube)
            .or_default()
            .push(corners);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

/// Builder for [`SimRobot`]. Every setter scripts one aspect of the
/// world; the defaults are an empty world with a healthy battery and the
/// robot at the frame origin.
pub struct SimRobotBuilder {
    name: String,
    pose: Pose,
    battery_volts: f32,
    accelerometer: Accel,
    known_charger: Option<Pose>,
    charger_sighting: Option<(Duration, Position)>,
    cube_sightings: Vec<(Duration, CubeSighting)>,
}

impl Default for SimRobotBuilder {
    fn default() -> Self {
        Self {
            name: "lumo-sim".to_string(),
            pose: Pose::new(Position::new(0.0, 0.0, 0.0), 0.0, 1),
            battery_volts: 3.7,
            accelerometer: Accel {
                x: 0.0,
                y: 0.0,
                z: 9810.0,
            },
            known_charger: None,
            charger_sighting: None,
            cube_sightings: Vec::new(),
        }
    }
}

impl SimRobotBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    pub fn battery_volts(mut self, volts: f32) -> Self {
        self.battery_volts = volts;
        self
    }

    /// Put a charger into the world model with the given recorded pose.
    ///
    /// Whether it is trusted depends on the pose's `origin_id` relative
    /// to the robot's pose (see [`Pose::is_comparable`]).
    pub fn known_charger(mut self, pose: Pose) -> Self {
        self.known_charger = Some(pose);
        self
    }

    /// Script the charger to be observed `delay` after a charger wait
    /// begins, at `position`. Without this, charger waits always time
    /// out.
    pub fn charger_observed_after(mut self, delay: Duration, position: Position) -> Self {
        self.charger_sighting = Some((delay, position));
        self
    }

    /// Script a cube sighting `delay` after a cube wait begins.
    pub fn cube_observed_after(mut self, delay: Duration, sighting: CubeSighting) -> Self {
        self.cube_sightings.push((delay, sighting));
        self.cube_sightings.sort_by_key(|(d, _)| *d);
        self
    }

    pub fn build(self) -> SimRobot {
        SimRobot {
            name: self.name,
            pose: self.pose,
            battery_volts: self.battery_volts,
            accelerometer: self.accelerometer,
            known_charger: self.known_charger,
            charger_sighting: self.charger_sighting,
            cube_sightings: self.cube_sightings,
            recorder: Mutex::new(Recorder::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumo_types::LightColor;

    fn sighting(n: u8, x: f32) -> CubeSighting {
        CubeSighting {
            id: CubeId(n),
            position: Position::new(x, 0.0, 0.0),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn charger_wait_observes_within_timeout() {
        let robot = SimRobot::builder()
            .charger_observed_after(Duration::from_secs(5), Position::new(200.0, 0.0, 0.0))
            .build();

        let outcome = robot.wait_for_charger(Duration::from_secs(30)).await.unwrap();
        assert_eq!(
            outcome,
            WaitOutcome::Observed(Position::new(200.0, 0.0, 0.0))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn charger_wait_times_out_when_never_observed() {
        let robot = SimRobot::builder().build();
        let outcome = robot.wait_for_charger(Duration::from_secs(30)).await.unwrap();
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn charger_wait_times_out_when_sighting_is_too_late() {
        let robot = SimRobot::builder()
            .charger_observed_after(Duration::from_secs(45), Position::new(0.0, 0.0, 0.0))
            .build();
        let outcome = robot.wait_for_charger(Duration::from_secs(30)).await.unwrap();
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn cube_wait_returns_early_once_count_is_met() {
        let robot = SimRobot::builder()
            .cube_observed_after(Duration::from_secs(2), sighting(1, 10.0))
            .cube_observed_after(Duration::from_secs(4), sighting(2, 20.0))
            .cube_observed_after(Duration::from_secs(6), sighting(3, 30.0))
            .build();

        let start = tokio::time::Instant::now();
        let cubes = robot
            .wait_for_cubes(3, Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cubes.len(), 3);
        assert_eq!(cubes[0].id, CubeId(1));
        assert_eq!(cubes[2].id, CubeId(3));
        // Returned at the third sighting, not at the deadline.
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn cube_wait_returns_partial_set_at_deadline() {
        let robot = SimRobot::builder()
            .cube_observed_after(Duration::from_secs(2), sighting(1, 10.0))
            .build();

        let start = tokio::time::Instant::now();
        let cubes = robot
            .wait_for_cubes(3, Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cubes.len(), 1);
        assert_eq!(start.elapsed(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn cube_wait_counts_distinct_cubes_only() {
        let robot = SimRobot::builder()
            .cube_observed_after(Duration::from_secs(1), sighting(1, 10.0))
            .cube_observed_after(Duration::from_secs(2), sighting(1, 11.0))
            .cube_observed_after(Duration::from_secs(3), sighting(2, 20.0))
            .build();

        let cubes = robot
            .wait_for_cubes(2, Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cubes.len(), 2);
        assert_eq!(cubes[1].id, CubeId(2));
    }

    #[test]
    fn stop_behavior_is_idempotent() {
        let robot = SimRobot::builder().build();
        let id = robot.start_behavior(BehaviorKind::LookAroundInPlace).unwrap();
        robot.stop_behavior(id);
        robot.stop_behavior(id);
        robot.stop_behavior(BehaviorId::new()); // never started
        assert_eq!(robot.behavior_starts(), 1);
        assert_eq!(robot.behavior_stops(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn motions_and_speech_are_recorded() {
        let robot = SimRobot::builder().build();
        robot.drive_straight(100.0, 75.0).await.unwrap();
        robot.turn_in_place(180.0).await.unwrap();
        robot.set_head_angle(-90.0).await.unwrap(); // below the physical limit
        robot.say("hai").await.unwrap();

        assert_eq!(
            robot.motions(),
            vec![
                MotionCommand::DriveStraight {
                    distance_mm: 100.0,
                    speed_mmps: 75.0
                },
                MotionCommand::TurnInPlace { degrees: 180.0 },
                MotionCommand::SetHeadAngle {
                    degrees: MIN_HEAD_ANGLE_DEG
                },
            ]
        );
        assert_eq!(robot.spoken(), vec!["hai".to_string()]);
    }

    #[test]
    fn lights_on_unscripted_cube_fail() {
        let robot = SimRobot::builder().build();
        let pattern = CornerLights::diagonal(LightColor::GREEN, LightColor::RED);
        assert!(robot.set_cube_lights(CubeId(1), pattern).is_err());
    }
}
