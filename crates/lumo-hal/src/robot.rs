//! The [`Robot`] trait – the fixed capability surface of the device.
//!
//! Everything the demo ever asks of the physical robot goes through this
//! trait: telemetry reads, world-model queries, background behavior
//! start/stop, timed event waits, motion primitives, speech, and cube
//! light control. The coordination code in `lumo-runtime` only ever
//! talks to the trait, so a scripted double ([`SimRobot`][crate::sim::SimRobot])
//! can stand in for hardware in headless tests and CI pipelines.
//!
//! All motion and speech methods resolve when the underlying action has
//! *completed* on the device, not when it was merely accepted. The demo
//! issues one action at a time; implementations are not required to
//! support overlapping commands.

use std::time::Duration;

use lumo_types::{
    BehaviorId, BehaviorKind, CornerLights, CubeId, CubeSighting, Pose, Position, RobotError,
    Telemetry, WaitOutcome,
};

/// A connected robot, real or simulated.
///
/// # Errors
///
/// Every fallible method returns [`RobotError`] for hard device failures
/// (link lost, action rejected). Running out of time on a wait is *not*
/// an error: the timed waits report it in-band as
/// [`WaitOutcome::TimedOut`] or as a short collection.
pub trait Robot {
    /// Human-readable device name, e.g. `"lumo-4f2a"`.
    fn name(&self) -> &str;

    /// Current telemetry snapshot (battery voltage, accelerometer).
    fn telemetry(&self) -> Telemetry;

    /// The robot's current pose in its active coordinate frame.
    fn pose(&self) -> Pose;

    /// The charger's recorded pose, if the world model has ever seen one.
    ///
    /// The recorded pose may be stale: check
    /// [`Pose::is_comparable`] against [`Robot::pose`] before trusting
    /// it.
    fn known_charger(&self) -> Option<Pose>;

    /// Start a background behavior and return a handle for stopping it.
    ///
    /// Prefer [`BehaviorGuard::start`][crate::behavior::BehaviorGuard::start],
    /// which guarantees the stop on every exit path.
    fn start_behavior(&self, kind: BehaviorKind) -> Result<BehaviorId, RobotError>;

    /// Stop a running background behavior.
    ///
    /// Idempotent: stopping a behavior that already stopped (or never
    /// existed) is a no-op, never an error.
    fn stop_behavior(&self, id: BehaviorId);

    /// Wait until the charger is observed, or `timeout` elapses.
    fn wait_for_charger(
        &self,
        timeout: Duration,
    ) -> impl Future<Output = Result<WaitOutcome<Position>, RobotError>>;

    /// Wait until `count` distinct light cubes have been observed, or
    /// `timeout` elapses, whichever comes first.
    ///
    /// Returns the sightings accumulated so far in observation order;
    /// the result is shorter than `count` exactly when the wait timed
    /// out.
    fn wait_for_cubes(
        &self,
        count: usize,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<CubeSighting>, RobotError>>;

    /// Drive straight for `distance_mm` at `speed_mmps`, resolving when
    /// the motion completes.
    fn drive_straight(
        &self,
        distance_mm: f32,
        speed_mmps: f32,
    ) -> impl Future<Output = Result<(), RobotError>>;

    /// Rotate in place by `degrees` (positive = counter-clockwise).
    fn turn_in_place(&self, degrees: f32) -> impl Future<Output = Result<(), RobotError>>;

    /// Move the head to `degrees` pitch, clamped by the implementation to
    /// the device's physical range
    /// ([`MIN_HEAD_ANGLE_DEG`][lumo_types::MIN_HEAD_ANGLE_DEG] ..=
    /// [`MAX_HEAD_ANGLE_DEG`][lumo_types::MAX_HEAD_ANGLE_DEG]).
    fn set_head_angle(&self, degrees: f32) -> impl Future<Output = Result<(), RobotError>>;

    /// Speak `text` aloud, resolving when playback finishes.
    fn say(&self, text: &str) -> impl Future<Output = Result<(), RobotError>>;

    /// Set all four corner LEDs of `cube` in one call.
    fn set_cube_lights(&self, cube: CubeId, corners: CornerLights) -> Result<(), RobotError>;
}
