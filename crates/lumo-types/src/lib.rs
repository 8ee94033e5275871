//! `lumo-types` – shared data model for the Lumo demo stack.
//!
//! Everything the other crates exchange lives here: geometry
//! ([`Position`], [`Pose`]), telemetry snapshots ([`Telemetry`]), cube
//! light patterns ([`LightColor`], [`CornerLights`]), search results
//! ([`ChargerLocation`], [`CubeSet`], [`WaitOutcome`]), behavior
//! identifiers ([`BehaviorKind`], [`BehaviorId`]), and the workspace
//! error type ([`RobotError`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────────────────
// Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Lowest commanded head pitch, in degrees (looking down at the ground).
pub const MIN_HEAD_ANGLE_DEG: f32 = -25.0;

/// Highest commanded head pitch, in degrees (looking up).
pub const MAX_HEAD_ANGLE_DEG: f32 = 44.5;

/// A point in the robot's world frame, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

/// A position plus heading, stamped with the coordinate-frame it was
/// recorded in.
///
/// The robot re-anchors its world frame whenever it is picked up or
/// delocalised; every re-anchor bumps `origin_id`. Two poses are only
/// meaningfully relatable when they share an origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Position,
    /// Heading around the vertical axis, radians.
    pub angle_rad: f32,
    /// Identifier of the coordinate frame this pose was recorded in.
    pub origin_id: u32,
}

impl Pose {
    pub fn new(position: Position, angle_rad: f32, origin_id: u32) -> Self {
        Self {
            position,
            angle_rad,
            origin_id,
        }
    }

    /// Whether `self` and `other` were recorded in the same coordinate
    /// frame and can therefore be compared or navigated between.
    ///
    /// A stored pose from a previous frame (robot moved, charger moved)
    /// is *not* comparable and must be treated as stale.
    pub fn is_comparable(&self, other: &Pose) -> bool {
        self.origin_id == other.origin_id
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Telemetry
// ─────────────────────────────────────────────────────────────────────────────

/// Raw accelerometer reading, in mm/s².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accel {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl std::fmt::Display for Accel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{:.1}, {:.1}, {:.1}>", self.x, self.y, self.z)
    }
}

/// Point-in-time device telemetry snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub battery_volts: f32,
    pub accelerometer: Accel,
    pub captured_at: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cube lights
// ─────────────────────────────────────────────────────────────────────────────

/// An RGB color for a single cube corner LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LightColor {
    pub const GREEN: LightColor = LightColor { r: 0, g: 255, b: 0 };
    pub const RED: LightColor = LightColor { r: 255, g: 0, b: 0 };
    pub const OFF: LightColor = LightColor { r: 0, g: 0, b: 0 };
}

/// The four corner LEDs of a light cube, in fixed corner order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornerLights(pub [LightColor; 4]);

impl CornerLights {
    /// A two-color diagonal pattern: corners 0 and 2 get `a`, corners 1
    /// and 3 get `b`.
    pub fn diagonal(a: LightColor, b: LightColor) -> Self {
        Self([a, b, a, b])
    }

    /// The same pattern with the two colors swapped.
    pub fn inverted(&self) -> Self {
        let [c0, c1, c2, c3] = self.0;
        Self([c1, c0, c3, c2])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Search results
// ─────────────────────────────────────────────────────────────────────────────

/// Stable identifier of a physical light cube (1-3 on the real device).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CubeId(pub u8);

impl std::fmt::Display for CubeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cube#{}", self.0)
    }
}

/// A single observed light cube: which cube, and where it was seen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubeSighting {
    pub id: CubeId,
    pub position: Position,
}

/// The ordered set of cubes accumulated by a timed search.
///
/// Holds at most `requested` sightings. [`CubeSet::is_complete`] tells a
/// caller whether the search found everything it asked for or ran out of
/// time with fewer – the two outcomes are otherwise identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeSet {
    sightings: Vec<CubeSighting>,
    requested: usize,
}

impl CubeSet {
    /// Wrap the sightings a search accumulated before its deadline.
    ///
    /// `sightings` is truncated to `requested` if the producer somehow
    /// over-delivered.
    pub fn new(mut sightings: Vec<CubeSighting>, requested: usize) -> Self {
        sightings.truncate(requested);
        Self {
            sightings,
            requested,
        }
    }

    pub fn len(&self) -> usize {
        self.sightings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sightings.is_empty()
    }

    /// Number of cubes the search was asked to find.
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// `true` when the search found every cube it was asked for.
    pub fn is_complete(&self) -> bool {
        self.sightings.len() == self.requested
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CubeSighting> {
        self.sightings.iter()
    }
}

impl<'a> IntoIterator for &'a CubeSet {
    type Item = &'a CubeSighting;
    type IntoIter = std::slice::Iter<'a, CubeSighting>;

    fn into_iter(self) -> Self::IntoIter {
        self.sightings.iter()
    }
}

/// Result of a charger search: either a trustworthy position, or the
/// sentinel for a search that timed out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChargerLocation {
    Known(Position),
    Unknown,
}

impl std::fmt::Display for ChargerLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChargerLocation::Known(pos) => write!(f, "{pos}"),
            ChargerLocation::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Outcome of a timed wait on a world-model event.
///
/// Timing out is an expected result, not an error: it is modelled as a
/// value rather than a catchable failure so that callers must handle
/// both arms. Hard device failures still travel as [`RobotError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    /// The event arrived within the deadline.
    Observed(T),
    /// The deadline elapsed first.
    TimedOut,
}

// ─────────────────────────────────────────────────────────────────────────────
// Behaviors
// ─────────────────────────────────────────────────────────────────────────────

/// Vendor-provided background behaviors the robot can run while the
/// caller waits on something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorKind {
    /// Sweep head and body in place to aid object detection.
    LookAroundInPlace,
}

impl std::fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BehaviorKind::LookAroundInPlace => write!(f, "look_around_in_place"),
        }
    }
}

/// Handle for one started background behavior run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BehaviorId(pub Uuid);

impl BehaviorId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for BehaviorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Hard failures from the robot link. These are terminal for a demo run:
/// nothing in the sequencer retries, errors propagate to the entry point.
#[derive(Error, Debug)]
pub enum RobotError {
    #[error("link to robot lost: {0}")]
    LinkLost(String),

    #[error("action '{action}' failed: {details}")]
    ActionFailed { action: String, details: String },

    #[error("robot rejected behavior {kind}")]
    BehaviorRejected { kind: BehaviorKind },

    #[error("no such cube: {0}")]
    UnknownCube(CubeId),
}
