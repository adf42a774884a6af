//! # Localisation types
//!
//! This module provides the pose and heading representations shared by all
//! motion behaviors. The pose itself is owned and updated by the drivetrain
//! (odometry plus gyroscope); behaviors only ever read a snapshot of it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

// Internal
use util::maths::{ang_dist_deg, wrap_deg};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The heading of the robot, an angle in degrees wrapped to (-180, 180].
///
/// Zero degrees points along the positive X axis of the odometry frame, with
/// positive angles rotating counter-clockwise (towards positive Y).
///
/// Subtracting two headings yields the shortest signed rotation between them
/// in degrees, never the naive difference.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading(f64);

/// The current pose (position and heading in the odometry frame) of the robot.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// The position in the odometry frame.
    ///
    /// Units: meters
    pub position_m: Point2<f64>,

    /// The heading in the odometry frame.
    pub heading: Heading,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Heading {
    /// Create a heading from an angle in degrees, wrapping it into the
    /// canonical range.
    pub fn from_degrees(angle_deg: f64) -> Self {
        Self(wrap_deg(angle_deg))
    }

    /// Return the heading angle in degrees, in (-180, 180].
    pub fn degrees(&self) -> f64 {
        self.0
    }

    /// Return this heading rotated by the given angle in degrees.
    pub fn rotate_by(&self, angle_deg: f64) -> Self {
        Self::from_degrees(self.0 + angle_deg)
    }

    /// Return the unit vector pointing along this heading.
    pub fn unit_vector(&self) -> Vector2<f64> {
        let rad = self.0.to_radians();
        Vector2::new(rad.cos(), rad.sin())
    }
}

impl std::ops::Sub for Heading {
    type Output = f64;

    /// The shortest signed rotation in degrees which takes `rhs` onto `self`.
    fn sub(self, rhs: Self) -> f64 {
        ang_dist_deg(rhs.0, self.0)
    }
}

impl Pose {
    /// Build a pose from a position in meters and a heading in degrees.
    pub fn new(x_m: f64, y_m: f64, heading_deg: f64) -> Self {
        Self {
            position_m: Point2::new(x_m, y_m),
            heading: Heading::from_degrees(heading_deg),
        }
    }

    /// Straight-line distance from this pose to the given point.
    pub fn distance_to_m(&self, point_m: &Point2<f64>) -> f64 {
        (point_m - self.position_m).norm()
    }

    /// Absolute bearing from this pose's position to the given point.
    ///
    /// If the point coincides with the position the bearing is zero.
    pub fn bearing_to(&self, point_m: &Point2<f64>) -> Heading {
        let delta = point_m - self.position_m;
        Heading::from_degrees(delta[1].atan2(delta[0]).to_degrees())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_heading_wraps() {
        assert_eq!(Heading::from_degrees(270.0).degrees(), -90.0);
        assert_eq!(Heading::from_degrees(-180.0).degrees(), 180.0);
        assert_eq!(Heading::from_degrees(170.0).rotate_by(20.0).degrees(), -170.0);
    }

    #[test]
    fn test_heading_difference_is_shortest_path() {
        let a = Heading::from_degrees(170.0);
        let b = Heading::from_degrees(-170.0);

        // From a to b is +20 degrees, not -340
        assert_eq!(b - a, 20.0);
        assert_eq!(a - b, -20.0);
    }

    #[test]
    fn test_bearing_to() {
        let pose = Pose::new(1.0, 1.0, 0.0);

        assert_eq!(pose.bearing_to(&Point2::new(2.0, 1.0)).degrees(), 0.0);
        assert!((pose.bearing_to(&Point2::new(1.0, 2.0)).degrees() - 90.0).abs() < 1e-9);
        assert!((pose.bearing_to(&Point2::new(0.0, 1.0)).degrees().abs() - 180.0).abs() < 1e-9);

        // Degenerate case: bearing to our own position is defined as zero
        assert_eq!(pose.bearing_to(&Point2::new(1.0, 1.0)).degrees(), 0.0);
    }

    #[test]
    fn test_distance_to() {
        let pose = Pose::new(0.0, 0.0, 45.0);
        assert!((pose.distance_to_m(&Point2::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }
}
