//! Drive-distance behavior

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Point2;

// Internal
use super::{Behavior, DriveCmd, StatusReport};
use crate::sense::SensorData;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drive straight at a constant speed until a commanded distance has been
/// covered, measured from the position at activation.
///
/// The speed is intentionally open-loop; only the stopping condition is
/// closed-loop, on the straight-line displacement from the start point.
pub struct DriveDistance {
    speed: f64,

    /// Commanded distance to travel.
    ///
    /// Units: meters
    distance_m: f64,

    /// Position at activation, the origin for distance measurement.
    start_m: Option<Point2<f64>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveDistance {
    /// Create a new behavior driving at `speed` for `distance_m` meters.
    pub fn new(speed: f64, distance_m: f64) -> Self {
        Self {
            speed,
            distance_m,
            start_m: None,
        }
    }
}

impl Behavior for DriveDistance {
    fn name(&self) -> &'static str {
        "DriveDistance"
    }

    fn activate(&mut self, sensors: &SensorData) -> DriveCmd {
        self.start_m = Some(sensors.pose.position_m);

        DriveCmd::STOP
    }

    fn tick(&mut self, sensors: &SensorData) -> (DriveCmd, StatusReport) {
        let travelled_m = match self.start_m {
            Some(start) => (sensors.pose.position_m - start).norm(),
            None => 0.0,
        };

        debug!(
            "DriveDistance: {:.3} of {:.3} m travelled",
            travelled_m, self.distance_m
        );

        (
            DriveCmd::arcade(self.speed, 0.0),
            StatusReport {
                translate_speed: self.speed,
                distance_remaining_m: (self.distance_m - travelled_m).max(0.0),
                target_locked: true,
                ..StatusReport::default()
            },
        )
    }

    fn is_complete(&self, sensors: &SensorData) -> bool {
        match self.start_m {
            Some(start) => (sensors.pose.position_m - start).norm() >= self.distance_m,
            None => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::loc::Pose;

    fn snapshot(x_m: f64, y_m: f64) -> SensorData {
        SensorData::from_pose(Pose::new(x_m, y_m, 0.0))
    }

    #[test]
    fn test_constant_speed_no_rotation() {
        let mut drive = DriveDistance::new(0.9, 10.0);
        assert_eq!(drive.activate(&snapshot(0.0, 0.0)), DriveCmd::STOP);

        let (cmd, _) = drive.tick(&snapshot(4.0, 0.0));
        assert_eq!(cmd, DriveCmd::arcade(0.9, 0.0));
    }

    #[test]
    fn test_completes_at_commanded_distance() {
        let mut drive = DriveDistance::new(0.9, 10.0);
        drive.activate(&snapshot(0.0, 0.0));

        // Just short of the target: not complete
        assert!(!drive.is_complete(&snapshot(9.99, 0.0)));

        // At the target exactly: complete
        assert!(drive.is_complete(&snapshot(10.0, 0.0)));

        // Displacement is straight-line, not along-track
        assert!(drive.is_complete(&snapshot(8.0, 6.0)));
    }

    #[test]
    fn test_halt_is_idempotent() {
        let mut drive = DriveDistance::new(0.5, 1.0);
        drive.activate(&snapshot(0.0, 0.0));
        drive.tick(&snapshot(0.1, 0.0));

        assert_eq!(drive.halt(true), DriveCmd::STOP);
        assert_eq!(drive.halt(true), DriveCmd::STOP);
    }
}
