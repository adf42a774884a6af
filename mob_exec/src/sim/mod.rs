//! # Kinematic simulation module
//!
//! A minimal differential-drive kinematic model which stands in for the real
//! drivetrain and camera. It integrates [`DriveCmd`]s into a pose at a fixed
//! timestep and produces the same [`SensorData`] snapshots the hardware
//! would, which lets the demo executive and the closed-loop tests run the
//! motion behaviors without a robot attached.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use crate::loc::Pose;
use crate::motion_ctrl::DriveCmd;
use crate::sense::{ObjectDetection, SensorData};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the simulated drivetrain, as loaded from `sim.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimParams {
    /// Translation speed at a full forward demand.
    ///
    /// Units: meters/second
    pub max_speed_ms: f64,

    /// Yaw rate at a full rotation demand.
    ///
    /// Units: degrees/second
    pub max_yaw_rate_degs: f64,
}

/// The simulated drivetrain and camera.
pub struct SimDrivetrain {
    params: SimParams,

    pose: Pose,

    /// Yaw rate commanded on the last step.
    ///
    /// Units: degrees/second
    ang_vel_degs: f64,

    /// Detection the simulated camera is currently holding.
    detection: Option<ObjectDetection>,

    /// Detections scheduled to appear at a future simulated time.
    pending_detections: Vec<(f64, ObjectDetection)>,

    /// Simulated time since start.
    ///
    /// Units: seconds
    elapsed_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            max_speed_ms: 0.5,
            max_yaw_rate_degs: 180.0,
        }
    }
}

impl SimDrivetrain {
    /// Create a new simulated drivetrain at the origin.
    pub fn new(params: SimParams) -> Self {
        Self {
            params,
            pose: Pose::default(),
            ang_vel_degs: 0.0,
            detection: None,
            pending_detections: Vec::new(),
            elapsed_s: 0.0,
        }
    }

    /// Place the robot at the given pose.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Make the simulated camera report the given detection.
    pub fn feed_detection(&mut self, detection: ObjectDetection) {
        self.detection = Some(detection);
    }

    /// Make the simulated camera report the given detection once the
    /// simulated time reaches `at_s`.
    pub fn schedule_detection(&mut self, at_s: f64, detection: ObjectDetection) {
        self.pending_detections.push((at_s, detection));
    }

    /// Integrate one actuation command over a timestep.
    pub fn apply(&mut self, cmd: &DriveCmd, dt_s: f64) {
        let forward_ms = util::maths::clamp(&cmd.forward, &-1.0, &1.0) * self.params.max_speed_ms;
        let yaw_degs = util::maths::clamp(&cmd.rotate, &-1.0, &1.0) * self.params.max_yaw_rate_degs;

        // Simple forward Euler: rotate, then translate along the new heading
        self.pose.heading = self.pose.heading.rotate_by(yaw_degs * dt_s);
        self.pose.position_m += self.pose.heading.unit_vector() * forward_ms * dt_s;

        self.ang_vel_degs = yaw_degs;
        self.elapsed_s += dt_s;

        // Surface any detection whose time has come
        let elapsed_s = self.elapsed_s;
        let mut due: Vec<ObjectDetection> = Vec::new();
        self.pending_detections.retain(|(at_s, det)| {
            if *at_s <= elapsed_s {
                due.push(*det);
                false
            } else {
                true
            }
        });
        if let Some(det) = due.into_iter().last() {
            self.detection = Some(det);
        }
    }

    /// Take the sensor snapshot for this cycle.
    pub fn sensors(&self) -> SensorData {
        SensorData {
            pose: self.pose,
            ang_vel_degs: self.ang_vel_degs,
            detection: self.detection,
        }
    }

    /// Simulated elapsed time in seconds.
    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }
}
