//! # Sensor snapshot types
//!
//! Behaviors never talk to hardware directly. Once per control cycle the
//! executive gathers a single consistent [`SensorData`] snapshot from the
//! drivetrain and camera and passes it into the active behavior, so a
//! behavior sees no torn reads within one tick.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use crate::loc::Pose;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object detection reported by the camera's vision pipeline.
///
/// Detections carry a monotonically increasing index so a consumer can tell
/// a fresh detection from a stale one left over in the pipeline. A missing
/// bearing means the pipeline is running but no object is currently tracked,
/// which is a normal state rather than an error.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ObjectDetection {
    /// Time at which this detection was made, seconds since camera start.
    pub timestamp_s: f64,

    /// Monotonically increasing detection counter.
    pub index: u64,

    /// Bearing from the camera axis to the object, or `None` if no object is
    /// tracked.
    ///
    /// Positive values mean the object is to the right of the camera axis.
    ///
    /// Units: degrees
    pub bearing_deg: Option<f64>,

    /// Apparent size of the object, or `None` if no object is tracked.
    ///
    /// Units: pixels
    pub size_px: Option<f64>,
}

/// A single-cycle snapshot of all the sensing a behavior may read.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct SensorData {
    /// The current pose from the drivetrain's odometry.
    pub pose: Pose,

    /// Angular velocity about the yaw axis from the gyroscope.
    ///
    /// Units: degrees/second
    pub ang_vel_degs: f64,

    /// The most recent detection from the camera, or `None` if the camera
    /// has not reported anything yet.
    pub detection: Option<ObjectDetection>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SensorData {
    /// Build a snapshot with the given pose, no rotation and no detection.
    pub fn from_pose(pose: Pose) -> Self {
        Self {
            pose,
            ang_vel_degs: 0.0,
            detection: None,
        }
    }
}
