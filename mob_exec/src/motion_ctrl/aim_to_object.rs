//! Aim-to-object behavior

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;

// Internal
use super::{AimParams, AimToHeading, Behavior, DriveCmd, StatusReport};
use crate::loc::Heading;
use crate::sense::SensorData;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Rotate in place to face whatever object the camera reports next.
///
/// On activation the current detection index becomes a floor: anything at or
/// below it is a stale detection left over from before this activation and
/// is ignored, so the behavior cannot immediately re-target an old sighting.
/// Until a fresh detection with a present bearing arrives the robot stays
/// stopped and incomplete.
///
/// The first fresh detection is resolved into an absolute target heading and
/// locked; from then on the behavior is [`AimToHeading`] against that
/// heading, and later detector updates are ignored.
pub struct AimToObject {
    params: AimParams,
    max_speed: f64,

    /// Detections with index at or below this floor are stale.
    index_floor: u64,

    /// The locked absolute target heading, once acquired.
    target: Option<Heading>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AimToObject {
    /// Create a new behavior with the given maximum turn speed.
    pub fn new(max_speed: f64, params: &AimParams) -> Self {
        Self {
            params: params.clone(),
            max_speed: max_speed.abs().min(1.0),
            index_floor: 0,
            target: None,
        }
    }

    /// True once a fresh detection has been resolved into a target heading.
    pub fn target_locked(&self) -> bool {
        self.target.is_some()
    }
}

impl Behavior for AimToObject {
    fn name(&self) -> &'static str {
        "AimToObject"
    }

    fn activate(&mut self, sensors: &SensorData) -> DriveCmd {
        self.target = None;

        // Whatever the camera is holding right now predates this activation
        self.index_floor = match sensors.detection {
            Some(d) => d.index,
            None => 0,
        };

        DriveCmd::STOP
    }

    fn tick(&mut self, sensors: &SensorData) -> (DriveCmd, StatusReport) {
        // Until a target is locked, watch the camera for a fresh detection
        if self.target.is_none() {
            let bearing_deg = match sensors.detection {
                Some(d) if d.index > self.index_floor => d.bearing_deg,
                _ => None,
            };

            match bearing_deg {
                Some(bearing_deg) => {
                    // A positive bearing means the object is to the right,
                    // which is a negative rotation of the heading
                    let target = sensors.pose.heading.rotate_by(-bearing_deg);
                    debug!(
                        "AimToObject: locked target {:.2} deg (bearing {:.2} deg)",
                        target.degrees(),
                        bearing_deg
                    );
                    self.target = Some(target);
                }
                // No fresh object yet: stop and look again next tick
                None => return (DriveCmd::STOP, StatusReport::default()),
            }
        }

        // Can't be None here, locked above
        let target = self.target.unwrap_or_default();
        AimToHeading::turn_towards(&self.params, self.max_speed, target, sensors)
    }

    fn is_complete(&self, sensors: &SensorData) -> bool {
        match self.target {
            Some(target) => AimToHeading::settled(&self.params, target, sensors),
            // Never finishes while unlocked
            None => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::loc::Pose;
    use crate::sense::ObjectDetection;

    fn detection(index: u64, bearing_deg: Option<f64>) -> ObjectDetection {
        ObjectDetection {
            timestamp_s: index as f64,
            index,
            bearing_deg,
            size_px: bearing_deg.map(|_| 40.0),
        }
    }

    fn snapshot(heading_deg: f64, det: Option<ObjectDetection>) -> SensorData {
        let mut sensors = SensorData::from_pose(Pose::new(0.0, 0.0, heading_deg));
        sensors.detection = det;
        sensors
    }

    #[test]
    fn test_ignores_stale_detection() {
        let params = AimParams::default();
        let mut aim = AimToObject::new(1.0, &params);

        // A detection is already sitting in the pipeline at activation
        aim.activate(&snapshot(0.0, Some(detection(5, Some(-20.0)))));

        // The same detection is still there: must stay stopped and unlocked
        let (cmd, report) = aim.tick(&snapshot(0.0, Some(detection(5, Some(-20.0)))));
        assert_eq!(cmd, DriveCmd::STOP);
        assert!(!report.target_locked);
        assert!(!aim.target_locked());
        assert!(!aim.is_complete(&snapshot(0.0, Some(detection(5, Some(-20.0))))));

        // A fresh detection above the floor is accepted
        let (cmd, report) = aim.tick(&snapshot(0.0, Some(detection(6, Some(-30.0)))));
        assert!(aim.target_locked());
        assert!(report.target_locked);
        // Object at -30 deg bearing is to the left: turn left
        assert!(cmd.rotate > 0.0);
        assert_eq!(report.heading_error_deg, 30.0);
    }

    #[test]
    fn test_waits_when_no_object_tracked() {
        let params = AimParams::default();
        let mut aim = AimToObject::new(1.0, &params);
        aim.activate(&snapshot(0.0, None));

        // No detection at all
        let (cmd, _) = aim.tick(&snapshot(0.0, None));
        assert_eq!(cmd, DriveCmd::STOP);

        // Fresh index but absent bearing: still nothing to aim at
        let (cmd, _) = aim.tick(&snapshot(0.0, Some(detection(3, None))));
        assert_eq!(cmd, DriveCmd::STOP);
        assert!(!aim.target_locked());
    }

    #[test]
    fn test_locked_target_survives_detector_updates() {
        let params = AimParams::default();
        let mut aim = AimToObject::new(1.0, &params);
        aim.activate(&snapshot(0.0, None));

        aim.tick(&snapshot(0.0, Some(detection(1, Some(-40.0)))));
        let (_, report_before) = aim.tick(&snapshot(0.0, Some(detection(1, Some(-40.0)))));

        // A newer detection arrives; the locked target must not move
        let (_, report_after) = aim.tick(&snapshot(0.0, Some(detection(2, Some(90.0)))));
        assert_eq!(
            report_before.heading_error_deg,
            report_after.heading_error_deg
        );
    }

    #[test]
    fn test_completes_like_aim_to_heading_once_locked() {
        let params = AimParams::default();
        let mut aim = AimToObject::new(1.0, &params);
        aim.activate(&snapshot(0.0, None));

        // Lock onto an object 10 degrees to the left
        aim.tick(&snapshot(0.0, Some(detection(1, Some(-10.0)))));

        // Within tolerance and settled
        let mut sensors = snapshot(9.0, None);
        sensors.ang_vel_degs = 5.0;
        assert!(aim.is_complete(&sensors));

        // Within tolerance but still rotating fast
        sensors.ang_vel_degs = 80.0;
        assert!(!aim.is_complete(&sensors));
    }
}
