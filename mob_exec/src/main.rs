//! Mobility executive entry point.
//!
//! Runs a scripted sequence of motion behaviors against the kinematic
//! simulation, standing in for the scheduler and hardware of the real robot:
//!
//!     - Initialise session, logging and parameters
//!     - For each behavior in the sequence:
//!         - Activate it
//!         - Tick it once per control period over the latest sensor
//!           snapshot, applying the returned actuation command
//!         - Check completion after each tick
//!         - Halt it on completion or timeout
//!
//! The executive is the single writer of actuation: behaviors only ever
//! return commands.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{info, warn};
use nalgebra::Point2;

// Internal
use mob_lib::{
    motion_ctrl::{
        AimToHeading, AimToObject, Behavior, DriveDistance, GoToPoint, MotionCtrlParams,
        RotateByAngle,
    },
    sense::ObjectDetection,
    sim::{SimDrivetrain, SimParams},
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one control cycle.
const CYCLE_PERIOD_S: f64 = 0.02;

/// Time after which a behavior that hasn't completed is interrupted.
///
/// A behavior which never meets its completion condition is not a fault, it
/// simply runs until the scheduler times it out.
const BEHAVIOR_TIMEOUT_S: f64 = 30.0;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("mob_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Scamp Mobility Executive\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let motion_params: MotionCtrlParams =
        util::params::load("motion_ctrl.toml").wrap_err("Could not load motion ctrl params")?;

    let sim_params: SimParams =
        util::params::load("sim.toml").wrap_err("Could not load sim params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE SIMULATION ----

    let mut sim = SimDrivetrain::new(sim_params);

    // The simulated camera will sight an object 25 degrees to the right of
    // the camera axis once the aim-to-object behavior is already watching
    sim.schedule_detection(
        8.0,
        ObjectDetection {
            timestamp_s: 8.0,
            index: 1,
            bearing_deg: Some(25.0),
            size_px: Some(60.0),
        },
    );

    // ---- BEHAVIOR SEQUENCE ----

    let behaviors: Vec<Box<dyn Behavior>> = vec![
        Box::new(AimToHeading::new(90.0, 1.0, &motion_params.aim)),
        Box::new(DriveDistance::new(0.8, 1.0)),
        Box::new(RotateByAngle::new(-0.4, 60.0).wrap_err("Invalid rotation command")?),
        Box::new(AimToObject::new(1.0, &motion_params.aim)),
        Box::new(GoToPoint::new(
            Point2::new(0.0, 0.0),
            1.0,
            true,
            &motion_params,
        )),
    ];

    for mut behavior in behaviors {
        run_behavior(behavior.as_mut(), &mut sim);
    }

    let pose = sim.sensors().pose;
    info!(
        "Sequence finished at ({:.3}, {:.3}) m, heading {:.2} deg",
        pose.position_m[0],
        pose.position_m[1],
        pose.heading.degrees()
    );

    Ok(())
}

/// Run a single behavior to completion or timeout against the simulation.
fn run_behavior(behavior: &mut dyn Behavior, sim: &mut SimDrivetrain) {
    info!("Activating {}", behavior.name());

    let cmd = behavior.activate(&sim.sensors());
    sim.apply(&cmd, CYCLE_PERIOD_S);

    let deadline_s = sim.elapsed_s() + BEHAVIOR_TIMEOUT_S;

    loop {
        let sensors = sim.sensors();

        let (cmd, _report) = behavior.tick(&sensors);
        sim.apply(&cmd, CYCLE_PERIOD_S);

        if behavior.is_complete(&sim.sensors()) {
            let cmd = behavior.halt(false);
            sim.apply(&cmd, CYCLE_PERIOD_S);
            info!("{} complete at t = {:.2} s", behavior.name(), sim.elapsed_s());
            break;
        }

        if sim.elapsed_s() >= deadline_s {
            let cmd = behavior.halt(true);
            sim.apply(&cmd, CYCLE_PERIOD_S);
            warn!("{} timed out, interrupted", behavior.name());
            break;
        }
    }
}
