//! # Scamp mobility executive library
//!
//! This library implements the autonomous motion-control layer of the Scamp
//! robot, a small camera-equipped differential-drive platform. It provides a
//! set of closed-loop behaviors ([`motion_ctrl`]) which turn the robot to a
//! heading, drive it a fixed distance, rotate it by a fixed angle, steer it
//! toward a vision-detected object, and navigate it to a 2D point.
//!
//! Behaviors are ticked by an external scheduler (the `mob_exec` binary
//! provides a simple one for the kinematic simulation in [`sim`]) and hold
//! exclusive ownership of the drive actuator while active.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod loc;
pub mod motion_ctrl;
pub mod sense;
pub mod sim;
