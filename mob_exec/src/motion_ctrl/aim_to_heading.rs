//! Aim-to-heading behavior

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;

// Internal
use super::{shape_turn_speed, AimParams, Behavior, DriveCmd, HeadingTarget, StatusReport};
use crate::loc::Heading;
use crate::sense::SensorData;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Rotate in place until a target heading is reached and rotation has
/// settled.
///
/// The target is either a fixed heading or a dynamic source evaluated once
/// at activation. Turn speed is proportional to the remaining error, floored
/// at the minimum effective turn speed and capped at the commanded maximum.
///
/// Completion requires both the heading error and the angular velocity to be
/// inside their tolerances: the angle check alone would report success while
/// the robot is still swinging through the target.
pub struct AimToHeading {
    params: AimParams,

    /// The commanded target, resolved into `target` on activation.
    target_source: HeadingTarget,

    max_speed: f64,

    /// The fixed target for the current activation.
    target: Option<Heading>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AimToHeading {
    /// Create a new behavior aiming at the given target with the given
    /// maximum turn speed.
    pub fn new<T: Into<HeadingTarget>>(target: T, max_speed: f64, params: &AimParams) -> Self {
        Self {
            params: params.clone(),
            target_source: target.into(),
            max_speed: max_speed.abs().min(1.0),
            target: None,
        }
    }

    /// Per-tick control law shared with [`super::AimToObject`]: proportional
    /// rotation towards `target`, no translation.
    pub(crate) fn turn_towards(
        params: &AimParams,
        max_speed: f64,
        target: Heading,
        sensors: &SensorData,
    ) -> (DriveCmd, StatusReport) {
        let error_deg = target - sensors.pose.heading;

        let turn_speed = shape_turn_speed(params, error_deg, max_speed);

        // If the target is to the left (positive error) turn left, otherwise
        // turn right
        let cmd = DriveCmd::arcade(0.0, turn_speed.copysign(error_deg));

        debug!(
            "Aim: {:.2} deg remaining, turn speed {:.3}",
            error_deg, cmd.rotate
        );

        (
            cmd,
            StatusReport {
                heading_error_deg: error_deg,
                turn_speed,
                target_locked: true,
                ..StatusReport::default()
            },
        )
    }

    /// Completion rule shared with [`super::AimToObject`]: error inside the
    /// angle tolerance AND angular velocity inside the settling tolerance.
    pub(crate) fn settled(params: &AimParams, target: Heading, sensors: &SensorData) -> bool {
        let error_deg = target - sensors.pose.heading;

        error_deg.abs() < params.angle_tolerance_deg
            && sensors.ang_vel_degs.abs() < params.ang_vel_tolerance_degs
    }
}

impl Behavior for AimToHeading {
    fn name(&self) -> &'static str {
        "AimToHeading"
    }

    fn activate(&mut self, _sensors: &SensorData) -> DriveCmd {
        // Resolve the target exactly once, a dynamic source is not
        // re-invoked mid-activation
        self.target = Some(Heading::from_degrees(self.target_source.resolve()));

        DriveCmd::STOP
    }

    fn tick(&mut self, sensors: &SensorData) -> (DriveCmd, StatusReport) {
        match self.target {
            Some(target) => Self::turn_towards(&self.params, self.max_speed, target, sensors),
            None => (DriveCmd::STOP, StatusReport::default()),
        }
    }

    fn is_complete(&self, sensors: &SensorData) -> bool {
        match self.target {
            Some(target) => Self::settled(&self.params, target, sensors),
            None => false,
        }
    }
}
