//! Go-to-point behavior

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Point2;

// Internal
use super::{
    shape_turn_speed, AimParams, Behavior, DriveCmd, GoToPointParams, MotionCtrlParams,
    StatusReport,
};
use crate::loc::Heading;
use crate::sense::SensorData;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Fraction of the minimum effective translate speed under which the
/// proportional speed demand counts as "would no longer move the robot",
/// ending the approach when stopping at the end is requested.
const ARRIVAL_SPEED_FRACTION: f64 = 0.5;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drive to a target point, blending steering and translation.
///
/// While the heading error towards the target exceeds the point-turn
/// threshold the behavior rotates in place; once within it, a
/// "good direction" flag latches so that brief excursions back over the
/// threshold do not drop the robot back into pure rotation.
///
/// With a good direction held, the steering target is biased by a capped
/// fraction of the drift between the current bearing to the target and the
/// bearing recorded at activation (oversteer adjustment), which counteracts
/// the straight-line drive converging too slowly onto the true bearing.
///
/// Completion is either arrival (the proportional translate demand has
/// shrunk below the point of moving the robot, when stopping at the end) or
/// the overshoot guard: the robot has travelled at least as far from its
/// start point as it originally had to go, wherever it ended up. The guard
/// stops the behavior orbiting or drifting past a target it will never
/// converge on.
pub struct GoToPoint {
    aim_params: AimParams,
    params: GoToPointParams,

    /// The target position.
    ///
    /// Units: meters
    target_m: Point2<f64>,

    max_speed: f64,

    /// If true, slow to a stop on arrival; otherwise fly through the target
    /// at full speed.
    stop_at_end: bool,

    /// Snapshot taken at activation.
    start: Option<StartState>,

    /// Latched once the robot has pointed to within the point-turn
    /// threshold of the target bearing.
    good_direction: bool,
}

/// Activation-time snapshot used by the oversteer adjustment and the
/// overshoot guard.
struct StartState {
    position_m: Point2<f64>,
    bearing: Heading,
    distance_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GoToPoint {
    /// Create a new behavior driving to `target_m` at up to `max_speed`.
    pub fn new(
        target_m: Point2<f64>,
        max_speed: f64,
        stop_at_end: bool,
        params: &MotionCtrlParams,
    ) -> Self {
        Self {
            aim_params: params.aim.clone(),
            params: params.go_to_point.clone(),
            target_m,
            max_speed: max_speed.abs().min(1.0),
            stop_at_end,
            start: None,
            good_direction: false,
        }
    }

    /// The translation speed demand for the given remaining distance:
    /// proportional when stopping at the end, otherwise flat out, floored at
    /// the minimum effective speed and capped at the max.
    fn shape_translate_speed(&self, distance_remaining_m: f64) -> f64 {
        let mut speed = if self.stop_at_end {
            self.params.k_p_translate * distance_remaining_m
        } else {
            self.max_speed
        };

        if speed < self.params.min_translate_speed {
            speed = self.params.min_translate_speed;
        }
        if speed > self.max_speed {
            speed = self.max_speed;
        }

        speed
    }
}

impl Behavior for GoToPoint {
    fn name(&self) -> &'static str {
        "GoToPoint"
    }

    fn activate(&mut self, sensors: &SensorData) -> DriveCmd {
        self.start = Some(StartState {
            position_m: sensors.pose.position_m,
            bearing: sensors.pose.bearing_to(&self.target_m),
            distance_m: sensors.pose.distance_to_m(&self.target_m),
        });
        self.good_direction = false;

        DriveCmd::STOP
    }

    fn tick(&mut self, sensors: &SensorData) -> (DriveCmd, StatusReport) {
        let start = match self.start {
            Some(ref s) => s,
            None => return (DriveCmd::STOP, StatusReport::default()),
        };

        // 1. Which direction should we be pointing?
        let bearing = sensors.pose.bearing_to(&self.target_m);
        let mut error_deg = bearing - sensors.pose.heading;

        // 2. Pointing somewhere very different: rotate in place towards the
        //    target until a good direction is acquired
        if !self.good_direction {
            if error_deg.abs() > self.params.point_turn_threshold_deg {
                let turn_speed = shape_turn_speed(&self.aim_params, error_deg, self.max_speed);

                debug!(
                    "GoToPoint: point turn, {:.2} deg off the target bearing",
                    error_deg
                );

                return (
                    DriveCmd::arcade(0.0, turn_speed.copysign(error_deg)),
                    StatusReport {
                        heading_error_deg: error_deg,
                        turn_speed,
                        distance_remaining_m: sensors.pose.distance_to_m(&self.target_m),
                        target_locked: true,
                        ..StatusReport::default()
                    },
                );
            }

            // Within the threshold: latch, so a brief excursion back over it
            // doesn't re-trigger pure rotation
            self.good_direction = true;
        }

        // 3. Bias the steering target against the drift from the activation
        //    bearing, capped to avoid oscillation
        if self.params.oversteer_factor != 0.0 {
            let drift_deg = bearing - start.bearing;
            let adjustment_deg = util::maths::clamp(
                &(self.params.oversteer_factor * drift_deg),
                &-self.params.oversteer_cap_deg,
                &self.params.oversteer_cap_deg,
            );
            let adjusted = bearing.rotate_by(adjustment_deg);
            error_deg = adjusted - sensors.pose.heading;
        }

        // 4. Turn speed from the (possibly adjusted) error
        let turn_speed = shape_turn_speed(&self.aim_params, error_deg, self.max_speed);

        // 5. Translation speed from the remaining distance
        let distance_remaining_m = sensors.pose.distance_to_m(&self.target_m);
        let translate_speed = self.shape_translate_speed(distance_remaining_m);

        debug!(
            "GoToPoint: {:.3} m remaining, {:.2} deg off, fwd {:.3} rot {:.3}",
            distance_remaining_m,
            error_deg,
            translate_speed,
            turn_speed.copysign(error_deg)
        );

        // 6. Drive while turning, rotation signed by the error direction
        (
            DriveCmd::arcade(translate_speed, turn_speed.copysign(error_deg)),
            StatusReport {
                heading_error_deg: error_deg,
                turn_speed,
                translate_speed,
                distance_remaining_m,
                target_locked: true,
            },
        )
    }

    fn is_complete(&self, sensors: &SensorData) -> bool {
        let start = match self.start {
            Some(ref s) => s,
            None => return false,
        };

        // Arrived: any further proportional demand would be too small to
        // actually move the robot
        if self.stop_at_end {
            let distance_remaining_m = sensors.pose.distance_to_m(&self.target_m);
            if self.params.k_p_translate * distance_remaining_m
                < ARRIVAL_SPEED_FRACTION * self.params.min_translate_speed
            {
                return true;
            }
        }

        // Overshoot guard: travelled at least as far as we originally had to
        let from_start_m = (sensors.pose.position_m - start.position_m).norm();
        from_start_m >= start.distance_m
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::loc::Pose;

    /// Tuning with a hot rotation gain so max-speed clamping is observable.
    fn test_params() -> MotionCtrlParams {
        let mut params = MotionCtrlParams::default();
        params.aim.k_p_rotate = 0.02;
        params
    }

    fn snapshot(x_m: f64, y_m: f64, heading_deg: f64) -> SensorData {
        SensorData::from_pose(Pose::new(x_m, y_m, heading_deg))
    }

    #[test]
    fn test_point_turn_phase_then_latch() {
        let params = test_params();
        let mut goto = GoToPoint::new(Point2::new(10.0, 0.0), 1.0, true, &params);
        goto.activate(&snapshot(0.0, 0.0, 80.0));

        // 80 degrees off the target bearing: rotate only, no translation,
        // turn speed clamped to the commanded max (0.02 * 80 = 1.6)
        let (cmd, _) = goto.tick(&snapshot(0.0, 0.0, 80.0));
        assert_eq!(cmd.forward, 0.0);
        assert_eq!(cmd.rotate, -1.0);

        // Within the threshold: drives, and the good direction latches
        let (cmd, _) = goto.tick(&snapshot(0.0, 0.0, 20.0));
        assert!(cmd.forward > 0.0);

        // Error grows past the threshold again: still drives, no re-trigger
        // of pure rotation
        let (cmd, _) = goto.tick(&snapshot(0.0, 0.0, 80.0));
        assert!(cmd.forward > 0.0);
    }

    #[test]
    fn test_oversteer_adjustment_is_capped() {
        let params = test_params();
        let mut goto = GoToPoint::new(Point2::new(0.0, 10.0), 1.0, true, &params);

        // Activation bearing is straight up the Y axis (90 degrees)
        goto.activate(&snapshot(0.0, 0.0, 90.0));
        goto.tick(&snapshot(0.0, 0.0, 90.0));

        // From (2, 9) the bearing to the target has drifted well past
        // cap / factor, so the adjustment saturates at the cap
        let sensors = snapshot(2.0, 9.0, 150.0);
        let bearing_deg = sensors.pose.bearing_to(&Point2::new(0.0, 10.0)).degrees();
        let (_, report) = goto.tick(&sensors);

        let expected = (bearing_deg + params.go_to_point.oversteer_cap_deg) - 150.0;
        assert!((report.heading_error_deg - expected).abs() < 1e-9);
    }

    #[test]
    fn test_overshoot_guard() {
        let params = test_params();
        let mut goto = GoToPoint::new(Point2::new(3.0, 0.0), 1.0, false, &params);
        goto.activate(&snapshot(0.0, 0.0, 0.0));

        // Lateral drift: 3 m from the start, still 3 m-ish off target, but
        // we have travelled the initial distance so the guard fires
        assert!(goto.is_complete(&snapshot(0.0, 3.0, 0.0)));

        // Short of the initial distance: keep going
        assert!(!goto.is_complete(&snapshot(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_arrival_slowdown_completion() {
        let params = test_params();
        let gtp = &params.go_to_point;

        // Remaining distance where the proportional demand dips under half
        // the minimum effective speed
        let arrival_m = 0.9 * ARRIVAL_SPEED_FRACTION * gtp.min_translate_speed / gtp.k_p_translate;

        let mut stopping = GoToPoint::new(Point2::new(5.0, 0.0), 1.0, true, &params);
        stopping.activate(&snapshot(0.0, 0.0, 0.0));
        assert!(stopping.is_complete(&snapshot(5.0 - arrival_m, 0.0, 0.0)));

        // Fly-through mode ignores the arrival rule and relies on the guard
        let mut flythrough = GoToPoint::new(Point2::new(5.0, 0.0), 1.0, false, &params);
        flythrough.activate(&snapshot(0.0, 0.0, 0.0));
        assert!(!flythrough.is_complete(&snapshot(5.0 - arrival_m, 0.0, 0.0)));
    }

    #[test]
    fn test_translate_speed_shaping() {
        let params = test_params();
        let gtp = &params.go_to_point;
        let mut goto = GoToPoint::new(Point2::new(10.0, 0.0), 1.0, true, &params);
        goto.activate(&snapshot(0.0, 0.0, 0.0));

        // Far away: capped at the max speed
        let (cmd, _) = goto.tick(&snapshot(0.0, 0.0, 0.0));
        assert_eq!(cmd.forward, 1.0);

        // Close in: floored at the minimum effective speed
        let (cmd, _) = goto.tick(&snapshot(9.9, 0.0, 0.0));
        assert_eq!(cmd.forward, gtp.min_translate_speed);
    }
}
