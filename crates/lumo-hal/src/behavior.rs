//! [`BehaviorGuard`] – scoped start/stop for background behaviors.
//!
//! A background behavior (e.g. look-around-in-place) keeps the robot
//! moving while the caller waits on a world-model event. Leaving one
//! running after the wait finishes – or after the wait's future is
//! dropped because an error propagated – leaves the robot spinning in
//! place indefinitely. The guard ties the behavior's lifetime to a
//! scope: start ≅ acquire, stop ≅ release, and the release runs on
//! every exit path, including early `return` and `?`.
//!
//! # Example
//!
//! ```no_run
//! # use std::time::Duration;
//! # use lumo_hal::{BehaviorGuard, Robot};
//! # use lumo_types::{BehaviorKind, RobotError};
//! # async fn search(robot: &impl Robot) -> Result<(), RobotError> {
//! let _guard = BehaviorGuard::start(robot, BehaviorKind::LookAroundInPlace)?;
//! let _outcome = robot.wait_for_charger(Duration::from_secs(30)).await?;
//! // the guard drops here and stops the behavior, success or not.
//! # Ok(())
//! # }
//! ```

use lumo_types::{BehaviorId, BehaviorKind, RobotError};
use tracing::debug;

use crate::robot::Robot;

/// Keeps a background behavior running exactly as long as the guard is
/// alive.
///
/// The stop is issued at most once by the guard itself ([`stop`][Self::stop]
/// marks the guard so `Drop` does not repeat it), and
/// [`Robot::stop_behavior`] is in any case idempotent, so the behavior
/// is never double-stopped regardless of how the scope exits.
#[must_use = "dropping the guard immediately would stop the behavior before any wait runs"]
pub struct BehaviorGuard<'r, R: Robot> {
    robot: &'r R,
    id: BehaviorId,
    stopped: bool,
}

impl<'r, R: Robot> BehaviorGuard<'r, R> {
    /// Start `kind` on `robot` and return the guard holding it.
    pub fn start(robot: &'r R, kind: BehaviorKind) -> Result<Self, RobotError> {
        let id = robot.start_behavior(kind)?;
        debug!(behavior = %kind, %id, "background behavior started");
        Ok(Self {
            robot,
            id,
            stopped: false,
        })
    }

    /// Identifier of the running behavior.
    pub fn id(&self) -> BehaviorId {
        self.id
    }

    /// Stop the behavior now instead of waiting for the guard to drop.
    ///
    /// Safe to call more than once.
    pub fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.robot.stop_behavior(self.id);
            debug!(id = %self.id, "background behavior stopped");
        }
    }
}

impl<R: Robot> Drop for BehaviorGuard<'_, R> {
    fn drop(&mut self) {
        self.stop();
    }
}
