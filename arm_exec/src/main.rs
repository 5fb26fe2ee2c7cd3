//! Main arm simulator executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Goal request acquisition, from a script or the parameters
//!         - Goal loop processing:
//!             - Finished detection and next goal dispatch
//!             - Inverse kinematics, once per goal
//!             - Joint control and integration
//!         - Archive writing
//!         - Cycle management
//!
//! # Usage
//!
//! ```text
//! arm_exec [script_path]
//! ```
//!
//! With no argument the goals listed in `arm_exec.toml` are requested on the
//! first cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use arm_lib::{
    data_store::DataStore,
    goal_loop::{self, GoalLoop},
    goal_script::{GoalScript, PendingGoals},
    params::ArmExecParams,
    point::Point,
};
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Per-module log levels. The goal loop already logs the chosen targets, so
/// the solver's own candidate listing is kept out of the debug log.
const LOG_MODULE_LEVELS: &[(&str, LevelFilter)] = &[
    ("arm_lib::arm_ctrl::inverse_kinematics", LevelFilter::Info),
];

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("arm_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, LOG_MODULE_LEVELS, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Arm Simulator Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: ArmExecParams =
        util::params::load("arm_exec.toml").wrap_err("Could not load exec params")?;

    if !(exec_params.cycle_frequency_hz > 0.0) {
        return Err(eyre!(
            "Cycle frequency must be positive, found {} Hz",
            exec_params.cycle_frequency_hz
        ));
    }

    info!("Exec parameters loaded");

    // ---- INITIALISE GOAL SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let mut goal_source = match args.len() {
        // If we have a single argument use it as the script path
        2 => {
            info!("Loading script from \"{}\"", &args[1]);

            let script = GoalScript::new(&args[1]).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} goals\n",
                script.duration_s(),
                script.num_goals()
            );

            GoalSource::Script(script)
        }
        1 => {
            info!(
                "No script provided, requesting the {} goals from the parameters\n",
                exec_params.goals.len()
            );
            GoalSource::Params(exec_params.goals.clone())
        }
        n => {
            return Err(eyre!(
                "Expected either zero or one argument, found {}",
                n - 1
            ))
        }
    };

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let goal_loop = GoalLoop::init(
        goal_loop::InitData {
            params_path: String::from("goal_loop.toml"),
            cycle_period_s: exec_params.cycle_period_s(),
        },
        &session,
    )
    .wrap_err("Failed to initialise GoalLoop")?;
    info!("GoalLoop init complete");

    let mut ds = DataStore::new(&exec_params, goal_loop);
    ds.attach_archives(&session)
        .wrap_err("Failed to initialise the DataStore archives")?;

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s());

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // ---- GOAL REQUESTS ----

        let script_over = match goal_source {
            GoalSource::Params(ref mut goals) => {
                // Parameter goals are all queued on the first cycle
                for goal in goals.drain(..) {
                    ds.queue_goal(goal);
                }
                true
            }
            GoalSource::Script(ref mut script) => match script.pending_goals(ds.sim_time_s) {
                PendingGoals::None => false,
                PendingGoals::Some(goals) => {
                    for goal in goals {
                        ds.request_goal(goal);
                    }
                    false
                }
                PendingGoals::EndOfScript => true,
            },
        };

        // ---- SIMULATION ----

        ds.tick();

        if ds.is_1_hz_cycle {
            info!(
                "t = {:.2} s, {}, tip at {} m ({} px), {} goals queued",
                ds.sim_time_s,
                ds.goal_loop_status_rpt.state,
                ds.goal_loop.arm().endpoint(),
                ds.tip_px(),
                ds.goal_queue.len()
            );
        }

        // ---- WRITE ARCHIVES ----

        ds.write().wrap_err("Failed to write the archives")?;

        // ---- EXIT CONDITIONS ----

        if script_over && ds.is_idle() {
            info!("All goals processed, stopping");
            break;
        }

        if ds.num_cycles >= exec_params.max_cycles {
            warn!("Maximum number of cycles ({}) reached, stopping", exec_params.max_cycles);
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        if exec_params.realtime {
            let cycle_dur = Instant::now() - cycle_start_instant;

            // Get sleep duration
            match cycle_period.checked_sub(cycle_dur) {
                Some(d) => thread::sleep(d),
                None => warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                ),
            }
        }
    }

    // ---- SHUTDOWN ----

    let summary = ds.summary();
    info!(
        "Reached {} of {} goals in {:.2} s ({} cycles)",
        summary.goals_reached,
        ds.goals_accepted(),
        summary.sim_time_s,
        summary.num_cycles
    );

    debug!(
        "Final arm configuration: {}",
        serde_json::to_string(&summary.final_config)
            .wrap_err("Failed to serialise the final configuration")?
    );

    session
        .save_json("summary.json", &summary)
        .wrap_err("Failed to save the run summary")?;

    info!("End of execution");

    Ok(())
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Sources of goal requests.
enum GoalSource {
    /// Goals listed in the parameters, all queued at once.
    Params(Vec<Point>),

    /// Request goals from a script as they fall due.
    Script(GoalScript),
}
