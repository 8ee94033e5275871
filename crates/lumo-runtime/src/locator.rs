//! Object locator – timeout-bounded search-and-fallback routines.
//!
//! The demo needs to know where the charger and the three light cubes
//! are before it starts driving. Neither search does any perception of
//! its own: a background look-around behavior sweeps the sensors while
//! this module waits on the world model, bounded by a deadline, and
//! falls back to a default when nothing shows up.
//!
//! Two rules hold throughout:
//!
//! 1. A started look-around behavior is stopped on every exit path –
//!    success, timeout, or a propagated device failure – via
//!    [`BehaviorGuard`].
//! 2. Running out of time is a *result*, not an error:
//!    [`locate_charger`] returns [`ChargerLocation::Unknown`] and
//!    [`locate_cubes`] returns a short [`CubeSet`]. Only hard device
//!    failures propagate as [`RobotError`].

use std::time::Duration;

use lumo_hal::{BehaviorGuard, Robot};
use lumo_types::{
    BehaviorKind, ChargerLocation, CornerLights, CubeSet, LightColor, RobotError, WaitOutcome,
};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::sequencer::DemoConfig;

/// How long the charger search waits before giving up.
pub const CHARGER_SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// How long the cube search waits for all cubes before giving up.
pub const CUBE_SEARCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Number of light cubes the robot ships with.
pub const CUBE_COUNT: usize = 3;

/// Full on/off alternations per cube in the flash routine.
pub const FLASH_CYCLES: u32 = 10;

/// How long each half of a flash alternation is held.
pub const FLASH_HOLD: Duration = Duration::from_millis(500);

/// Locate the charging dock.
///
/// If the world model already holds a charger pose recorded in the
/// robot's current coordinate frame, that position is returned
/// immediately and no search behavior is started. Otherwise (never
/// seen, or recorded in a stale frame) the robot looks around in place
/// and waits up to `timeout` for a sighting.
///
/// On a successful sighting the robot confirms out loud ("found it")
/// before the function returns; on timeout the result is
/// [`ChargerLocation::Unknown`] and a warning is logged.
pub async fn locate_charger<R: Robot>(
    robot: &R,
    timeout: Duration,
) -> Result<ChargerLocation, RobotError> {
    if let Some(charger_pose) = robot.known_charger() {
        if charger_pose.is_comparable(&robot.pose()) {
            debug!(position = %charger_pose.position, "charger already localized, skipping search");
            return Ok(ChargerLocation::Known(charger_pose.position));
        }
        // World model has a charger, but from a previous coordinate
        // frame (robot or charger moved since). Treat it like an
        // unknown charger and search.
        warn!("recorded charger pose is in a stale frame, searching again");
    }

    info!("searching for charger");
    let mut look_around = BehaviorGuard::start(robot, BehaviorKind::LookAroundInPlace)?;

    match robot.wait_for_charger(timeout).await? {
        WaitOutcome::Observed(position) => {
            info!(%position, "charger found");
            look_around.stop();
            robot.say("found it").await?;
            Ok(ChargerLocation::Known(position))
        }
        WaitOutcome::TimedOut => {
            warn!(timeout_secs = timeout.as_secs(), "charger not found");
            Ok(ChargerLocation::Unknown)
        }
        // The guard stops the behavior here on the timeout arm and on
        // any `?` above.
    }
}

/// Locate up to `count` light cubes.
///
/// Looks around in place and waits until `count` distinct cubes have
/// been observed or `timeout` elapses, whichever comes first. The
/// accumulated set is returned either way; use [`CubeSet::is_complete`]
/// to tell a full find from a timeout with fewer.
pub async fn locate_cubes<R: Robot>(
    robot: &R,
    count: usize,
    timeout: Duration,
) -> Result<CubeSet, RobotError> {
    info!(count, "searching for light cubes");
    let mut look_around = BehaviorGuard::start(robot, BehaviorKind::LookAroundInPlace)?;

    let sightings = robot.wait_for_cubes(count, timeout).await?;
    look_around.stop();

    let cubes = CubeSet::new(sightings, count);
    if cubes.is_complete() {
        info!(found = cubes.len(), "all cubes found");
    } else {
        warn!(
            found = cubes.len(),
            requested = count,
            timeout_secs = timeout.as_secs(),
            "cube search timed out with a partial set"
        );
    }
    Ok(cubes)
}

/// Flash every cube in `cubes` with an alternating green/red diagonal
/// pattern.
///
/// Each of the `cycles` iterations sets the pattern on all cubes, holds
/// for `hold`, sets the inverted pattern, and holds again – two
/// light-set calls per cube per cycle. Purely cosmetic; runs to
/// completion with no early exit.
pub async fn flash_cubes<R: Robot>(
    robot: &R,
    cubes: &CubeSet,
    cycles: u32,
    hold: Duration,
) -> Result<(), RobotError> {
    if cubes.is_empty() {
        return Ok(());
    }

    let pattern = CornerLights::diagonal(LightColor::GREEN, LightColor::RED);
    let inverted = pattern.inverted();

    for _ in 0..cycles {
        for cube in cubes {
            robot.set_cube_lights(cube.id, pattern)?;
        }
        sleep(hold).await;

        for cube in cubes {
            robot.set_cube_lights(cube.id, inverted)?;
        }
        sleep(hold).await;
    }
    Ok(())
}

/// Run the full object-location pass: charger search, cube search, and
/// the celebratory cube flash.
///
/// Returns the cube set so the caller can log or inspect it; the
/// charger result is logged here and otherwise unused by the demo.
pub async fn locate_objects<R: Robot>(
    robot: &R,
    config: &DemoConfig,
) -> Result<CubeSet, RobotError> {
    let charger = locate_charger(robot, config.charger_timeout).await?;
    info!(location = %charger, "charger location");

    let cubes = locate_cubes(robot, config.cube_count, config.cube_timeout).await?;
    for cube in &cubes {
        info!(id = %cube.id, position = %cube.position, "cube sighted");
    }

    flash_cubes(robot, &cubes, config.flash_cycles, config.flash_hold).await?;
    Ok(cubes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumo_hal::SimRobot;
    use lumo_types::{CubeId, CubeSighting, Pose, Position};

    fn sighting(n: u8) -> CubeSighting {
        CubeSighting {
            id: CubeId(n),
            position: Position::new(f32::from(n) * 50.0, 0.0, 0.0),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn known_comparable_charger_skips_the_search() {
        let dock = Position::new(300.0, -120.0, 0.0);
        let robot = SimRobot::builder()
            .pose(Pose::new(Position::new(0.0, 0.0, 0.0), 0.0, 1))
            .known_charger(Pose::new(dock, 0.0, 1))
            .build();

        let location = locate_charger(&robot, CHARGER_SEARCH_TIMEOUT).await.unwrap();

        assert_eq!(location, ChargerLocation::Known(dock));
        assert_eq!(robot.behavior_starts(), 0);
        assert_eq!(robot.behavior_stops(), 0);
        assert!(robot.spoken().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_charger_pose_triggers_a_search() {
        // Charger recorded in frame 1 while the robot now lives in
        // frame 2: the stored pose must not be trusted.
        let robot = SimRobot::builder()
            .pose(Pose::new(Position::new(0.0, 0.0, 0.0), 0.0, 2))
            .known_charger(Pose::new(Position::new(300.0, 0.0, 0.0), 0.0, 1))
            .charger_observed_after(Duration::from_secs(5), Position::new(280.0, 10.0, 0.0))
            .build();

        let location = locate_charger(&robot, CHARGER_SEARCH_TIMEOUT).await.unwrap();

        assert_eq!(
            location,
            ChargerLocation::Known(Position::new(280.0, 10.0, 0.0))
        );
        assert_eq!(robot.behavior_starts(), 1);
        assert_eq!(robot.behavior_stops(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_charger_observed_mid_search() {
        let robot = SimRobot::builder()
            .charger_observed_after(Duration::from_secs(5), Position::new(200.0, 0.0, 0.0))
            .build();

        let location = locate_charger(&robot, CHARGER_SEARCH_TIMEOUT).await.unwrap();

        assert_eq!(
            location,
            ChargerLocation::Known(Position::new(200.0, 0.0, 0.0))
        );
        assert_eq!(robot.behavior_starts(), 1);
        assert_eq!(robot.behavior_stops(), 1);
        assert_eq!(robot.spoken(), vec!["found it".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn charger_search_timeout_yields_unknown() {
        let robot = SimRobot::builder().build();

        let location = locate_charger(&robot, CHARGER_SEARCH_TIMEOUT).await.unwrap();

        assert_eq!(location, ChargerLocation::Unknown);
        assert_eq!(robot.behavior_starts(), 1);
        assert_eq!(robot.behavior_stops(), 1);
        assert!(robot.spoken().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cube_search_finds_all_three() {
        let robot = SimRobot::builder()
            .cube_observed_after(Duration::from_secs(2), sighting(1))
            .cube_observed_after(Duration::from_secs(5), sighting(2))
            .cube_observed_after(Duration::from_secs(9), sighting(3))
            .build();

        let cubes = locate_cubes(&robot, CUBE_COUNT, CUBE_SEARCH_TIMEOUT)
            .await
            .unwrap();

        assert_eq!(cubes.len(), 3);
        assert!(cubes.is_complete());
        assert_eq!(robot.behavior_starts(), 1);
        assert_eq!(robot.behavior_stops(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cube_search_returns_partial_set_on_timeout() {
        let robot = SimRobot::builder()
            .cube_observed_after(Duration::from_secs(2), sighting(1))
            .cube_observed_after(Duration::from_secs(70), sighting(2)) // past the deadline
            .build();

        let cubes = locate_cubes(&robot, CUBE_COUNT, CUBE_SEARCH_TIMEOUT)
            .await
            .unwrap();

        assert_eq!(cubes.len(), 1);
        assert!(!cubes.is_complete());
        assert_eq!(robot.behavior_starts(), 1);
        assert_eq!(robot.behavior_stops(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn flash_sets_twenty_patterns_per_cube() {
        let robot = SimRobot::builder()
            .cube_observed_after(Duration::from_secs(1), sighting(1))
            .cube_observed_after(Duration::from_secs(2), sighting(2))
            .cube_observed_after(Duration::from_secs(3), sighting(3))
            .build();
        let cubes = locate_cubes(&robot, CUBE_COUNT, CUBE_SEARCH_TIMEOUT)
            .await
            .unwrap();

        flash_cubes(&robot, &cubes, FLASH_CYCLES, FLASH_HOLD)
            .await
            .unwrap();

        let pattern = CornerLights::diagonal(LightColor::GREEN, LightColor::RED);
        for cube in &cubes {
            let calls = robot.light_calls(cube.id);
            assert_eq!(calls.len(), 20);
            // Strict A, B, A, B alternation.
            for (i, call) in calls.iter().enumerate() {
                let expected = if i % 2 == 0 { pattern } else { pattern.inverted() };
                assert_eq!(*call, expected);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn flash_with_no_cubes_is_a_no_op() {
        let robot = SimRobot::builder().build();
        let cubes = CubeSet::new(Vec::new(), CUBE_COUNT);

        let start = tokio::time::Instant::now();
        flash_cubes(&robot, &cubes, FLASH_CYCLES, FLASH_HOLD)
            .await
            .unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
