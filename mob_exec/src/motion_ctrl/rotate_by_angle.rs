//! Rotate-by-angle behavior

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;

// Internal
use super::{Behavior, DriveCmd, MotionCtrlError, StatusReport, MAX_ROTATE_BY_DEG};
use crate::loc::Heading;
use crate::sense::SensorData;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Rotate in place at a constant speed until a commanded relative angle has
/// been swept.
///
/// The angle must be strictly positive and under [`MAX_ROTATE_BY_DEG`]; the
/// sign of the speed picks the turn direction. Like [`super::DriveDistance`]
/// the speed is open-loop and only the stop condition is closed-loop, on the
/// shortest-path angular displacement from the heading at activation.
pub struct RotateByAngle {
    speed: f64,

    /// Commanded sweep, always positive.
    ///
    /// Units: degrees
    angle_deg: f64,

    /// Heading at activation, the origin for the sweep measurement.
    start_heading: Option<Heading>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RotateByAngle {
    /// Create a new behavior rotating at `speed` through `angle_deg` degrees.
    ///
    /// Fails fast on a non-positive angle or one at or above
    /// [`MAX_ROTATE_BY_DEG`], both of which this open-loop approach cannot
    /// execute reliably.
    pub fn new(speed: f64, angle_deg: f64) -> Result<Self, MotionCtrlError> {
        if angle_deg <= 0.0 {
            return Err(MotionCtrlError::NonPositiveRotation(angle_deg));
        }
        if angle_deg >= MAX_ROTATE_BY_DEG {
            return Err(MotionCtrlError::RotationTooLarge(angle_deg));
        }

        Ok(Self {
            speed,
            angle_deg,
            start_heading: None,
        })
    }

    fn swept_deg(&self, sensors: &SensorData) -> f64 {
        match self.start_heading {
            Some(start) => (sensors.pose.heading - start).abs(),
            None => 0.0,
        }
    }
}

impl Behavior for RotateByAngle {
    fn name(&self) -> &'static str {
        "RotateByAngle"
    }

    fn activate(&mut self, sensors: &SensorData) -> DriveCmd {
        self.start_heading = Some(sensors.pose.heading);

        DriveCmd::STOP
    }

    fn tick(&mut self, sensors: &SensorData) -> (DriveCmd, StatusReport) {
        let swept_deg = self.swept_deg(sensors);

        debug!(
            "RotateByAngle: {:.2} of {:.2} deg swept",
            swept_deg, self.angle_deg
        );

        (
            DriveCmd::arcade(0.0, self.speed),
            StatusReport {
                heading_error_deg: (self.angle_deg - swept_deg).max(0.0),
                turn_speed: self.speed.abs(),
                target_locked: true,
                ..StatusReport::default()
            },
        )
    }

    fn is_complete(&self, sensors: &SensorData) -> bool {
        self.start_heading.is_some() && self.swept_deg(sensors) >= self.angle_deg
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::loc::Pose;

    fn snapshot(heading_deg: f64) -> SensorData {
        SensorData::from_pose(Pose::new(0.0, 0.0, heading_deg))
    }

    #[test]
    fn test_construction_validation() {
        assert!(matches!(
            RotateByAngle::new(0.5, 0.0),
            Err(MotionCtrlError::NonPositiveRotation(_))
        ));
        assert!(matches!(
            RotateByAngle::new(0.5, -10.0),
            Err(MotionCtrlError::NonPositiveRotation(_))
        ));
        assert!(matches!(
            RotateByAngle::new(0.5, 150.0),
            Err(MotionCtrlError::RotationTooLarge(_))
        ));
        assert!(RotateByAngle::new(0.5, 45.0).is_ok());
    }

    #[test]
    fn test_sweeps_commanded_angle() {
        let mut rotate = RotateByAngle::new(-0.4, 90.0).unwrap();
        rotate.activate(&snapshot(10.0));

        // The speed is passed through as given, sign included
        let (cmd, _) = rotate.tick(&snapshot(10.0));
        assert_eq!(cmd, DriveCmd::arcade(0.0, -0.4));

        assert!(!rotate.is_complete(&snapshot(-60.0)));
        assert!(rotate.is_complete(&snapshot(-80.0)));
    }

    #[test]
    fn test_sweep_across_wrap_point() {
        let mut rotate = RotateByAngle::new(0.4, 30.0).unwrap();
        rotate.activate(&snapshot(170.0));

        // 170 -> -175 is a 15 degree sweep the short way round
        assert!(!rotate.is_complete(&snapshot(-175.0)));

        // 170 -> -160 is 30 degrees
        assert!(rotate.is_complete(&snapshot(-160.0)));
    }
}
