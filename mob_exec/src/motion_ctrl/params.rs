//! Motion control parameters
//!
//! Gains and tolerances are data, not literals in the control laws: each
//! behavior is handed its parameter struct at construction, so tests can
//! vary the tuning per case and the deployed tuning lives in
//! `params/motion_ctrl.toml`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the aiming behaviors (rotation in place).
#[derive(Debug, Clone, Deserialize)]
pub struct AimParams {
    /// Proportional gain from heading error to turn speed.
    ///
    /// Units: 1/degrees
    pub k_p_rotate: f64,

    /// Minimum effective turn speed. Demands below this would not reliably
    /// spin the motors and are raised to it.
    ///
    /// Units: normalised speed
    pub min_turn_speed: f64,

    /// Heading error magnitude under which the target counts as reached.
    ///
    /// Units: degrees
    pub angle_tolerance_deg: f64,

    /// Angular velocity magnitude under which the robot counts as settled.
    /// Required alongside the angle tolerance so that swinging through the
    /// target is not declared success.
    ///
    /// Units: degrees/second
    pub ang_vel_tolerance_degs: f64,
}

/// Parameters for the go-to-point behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct GoToPointParams {
    /// Proportional gain from remaining distance to translation speed.
    ///
    /// Units: 1/meters
    pub k_p_translate: f64,

    /// Minimum effective translation speed.
    ///
    /// Units: normalised speed
    pub min_translate_speed: f64,

    /// Fraction of the bearing drift (current target bearing minus the
    /// bearing recorded at activation) fed back into the steering target to
    /// counteract slow convergence onto the line to the target.
    pub oversteer_factor: f64,

    /// Cap on the magnitude of the oversteer adjustment, to avoid
    /// oscillation.
    ///
    /// Units: degrees
    pub oversteer_cap_deg: f64,

    /// Heading error above which the behavior rotates in place instead of
    /// driving, until a good pointing direction has been acquired.
    ///
    /// Units: degrees
    pub point_turn_threshold_deg: f64,
}

/// All motion control parameters, as loaded from `motion_ctrl.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MotionCtrlParams {
    pub aim: AimParams,
    pub go_to_point: GoToPointParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for AimParams {
    fn default() -> Self {
        Self {
            k_p_rotate: 0.002,
            min_turn_speed: 0.15,
            angle_tolerance_deg: 3.0,
            ang_vel_tolerance_degs: 50.0,
        }
    }
}

impl Default for GoToPointParams {
    fn default() -> Self {
        Self {
            k_p_translate: 1.5,
            min_translate_speed: 0.3,
            oversteer_factor: 0.5,
            oversteer_cap_deg: 30.0,
            point_turn_threshold_deg: 45.0,
        }
    }
}
