//! # Motion control module
//!
//! Motion control provides the closed-loop drive behaviors of the robot:
//!
//! - [`AimToHeading`] - rotate in place to a target heading.
//! - [`AimToObject`] - rotate in place to face a vision-detected object.
//! - [`DriveDistance`] - drive straight for a fixed distance.
//! - [`RotateByAngle`] - rotate in place by a fixed relative angle.
//! - [`GoToPoint`] - drive and steer simultaneously to a 2D point.
//!
//! Each behavior implements the [`Behavior`] lifecycle and is ticked by an
//! external scheduler at a fixed control period. A tick is bounded,
//! synchronous arithmetic over the latest [`SensorData`] snapshot; behaviors
//! never block, sleep or spawn work. "Waiting" (for example for a fresh
//! camera detection) is expressed by returning a stopped, not-yet-complete
//! result each tick.
//!
//! The scheduler guarantees that exactly one behavior owns the drive
//! actuator at a time, and that `halt` runs exactly once whether a behavior
//! completes normally or is interrupted.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod aim_to_heading;
mod aim_to_object;
mod drive_distance;
mod go_to_point;
mod params;
mod rotate_by_angle;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use std::fmt;

// Internal
pub use aim_to_heading::AimToHeading;
pub use aim_to_object::AimToObject;
pub use drive_distance::DriveDistance;
pub use go_to_point::GoToPoint;
pub use params::{AimParams, GoToPointParams, MotionCtrlParams};
pub use rotate_by_angle::RotateByAngle;

use crate::sense::SensorData;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Largest relative angle accepted by [`RotateByAngle`].
///
/// Open-loop speed with a closed-loop stop condition is unreliable over
/// larger sweeps, which must use [`AimToHeading`] instead.
pub const MAX_ROTATE_BY_DEG: f64 = 135.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An arcade-style actuation command for the differential drivetrain.
///
/// Both components are normalised to [-1, 1]. `(0, 0)` means "no motion".
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct DriveCmd {
    /// Forward translation demand, positive drives forwards.
    pub forward: f64,

    /// Rotation demand, positive yaws counter-clockwise (heading increases).
    pub rotate: f64,
}

/// Monitoring quantities produced by a behavior's tick.
///
/// The report is the behavior's only telemetry output; publishing it (to a
/// log, dashboard or archive) is the caller's business, which keeps the tick
/// itself a pure function of snapshot and state.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// Signed heading error towards the current target, degrees.
    pub heading_error_deg: f64,

    /// Commanded turn speed magnitude, normalised.
    pub turn_speed: f64,

    /// Commanded translation speed, normalised.
    pub translate_speed: f64,

    /// Straight-line distance remaining to the target, meters. Zero for
    /// rotation-only behaviors.
    pub distance_remaining_m: f64,

    /// True once the behavior has resolved and locked its target.
    pub target_locked: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors raised when constructing a motion behavior.
///
/// Construction-time validation fails fast: a behavior which would be
/// nonsensical to run is rejected before it ever reaches the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum MotionCtrlError {
    #[error("RotateByAngle requires a strictly positive angle, got {0} degrees \
        (use a negative speed to turn the other way)")]
    NonPositiveRotation(f64),

    #[error("RotateByAngle only supports angles under 135 degrees, \
        got {0} (use AimToHeading for large turns)")]
    RotationTooLarge(f64),
}

/// A target heading which is either fixed or supplied by a dynamic source.
///
/// A dynamic source is evaluated exactly once, when the behavior activates,
/// and the result is locked for the remainder of that activation.
pub enum HeadingTarget {
    /// A fixed heading in degrees.
    Fixed(f64),

    /// A heading source queried at activation.
    Dynamic(Box<dyn Fn() -> f64 + Send>),
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// The lifecycle every motion behavior exposes to the external scheduler.
///
/// The scheduler drives an active behavior as:
///
/// 1. `activate` once, when the behavior is scheduled.
/// 2. `tick` then `is_complete` once per control period.
/// 3. `halt` exactly once, on completion or interruption.
///
/// Every method returns the actuation command to apply; behaviors never
/// touch the actuator themselves, so the scheduler remains the single
/// writer and a tick stays free of I/O.
pub trait Behavior {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Called once when scheduled. Resolves dynamic targets and snapshots
    /// the initial state. The returned command is always a stop.
    fn activate(&mut self, sensors: &SensorData) -> DriveCmd;

    /// Called once per control period while active. Runs the behavior's
    /// control law over the snapshot and returns the actuation command for
    /// this cycle along with monitoring data.
    fn tick(&mut self, sensors: &SensorData) -> (DriveCmd, StatusReport);

    /// Called after `tick`. True exactly when the behavior's completion
    /// condition holds for this snapshot.
    fn is_complete(&self, sensors: &SensorData) -> bool;

    /// Called exactly once when the behavior stops, normally or through
    /// external interruption. Idempotent: repeated calls return the same
    /// stop command with no further effect.
    fn halt(&mut self, _interrupted: bool) -> DriveCmd {
        DriveCmd::STOP
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveCmd {
    /// The zero command, meaning "no motion".
    pub const STOP: DriveCmd = DriveCmd {
        forward: 0.0,
        rotate: 0.0,
    };

    /// Build a command, clamping both components into [-1, 1].
    pub fn arcade(forward: f64, rotate: f64) -> Self {
        Self {
            forward: util::maths::clamp(&forward, &-1.0, &1.0),
            rotate: util::maths::clamp(&rotate, &-1.0, &1.0),
        }
    }
}

impl HeadingTarget {
    /// A target evaluated from the given source at activation.
    pub fn dynamic<F: Fn() -> f64 + Send + 'static>(source: F) -> Self {
        HeadingTarget::Dynamic(Box::new(source))
    }

    /// Resolve the target into a heading angle in degrees.
    pub fn resolve(&self) -> f64 {
        match self {
            HeadingTarget::Fixed(deg) => *deg,
            HeadingTarget::Dynamic(source) => source(),
        }
    }
}

impl From<f64> for HeadingTarget {
    fn from(deg: f64) -> Self {
        HeadingTarget::Fixed(deg)
    }
}

impl fmt::Debug for HeadingTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HeadingTarget::Fixed(deg) => write!(f, "Fixed({})", deg),
            HeadingTarget::Dynamic(_) => write!(f, "Dynamic(<source>)"),
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Proportional turn-speed shaping shared by all aiming behaviors.
///
/// The magnitude is `k_p_rotate * |error|`, capped at `max_speed` and floored
/// at the minimum effective turn speed: a demand below the floor would not
/// reliably move the motors, so it is raised rather than left ineffective.
pub(crate) fn shape_turn_speed(params: &AimParams, error_deg: f64, max_speed: f64) -> f64 {
    let mut speed = max_speed;

    let proportional = params.k_p_rotate * error_deg.abs();
    if proportional < speed {
        speed = proportional;
    }
    if speed < params.min_turn_speed {
        speed = params.min_turn_speed;
    }

    speed
}
