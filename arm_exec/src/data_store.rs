//! # Data Store
//!
//! The simulation context owned by the executable (or a test harness). All
//! state shared between the parts of one cycle lives here and is passed by
//! reference, there are no globals.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::VecDeque;

// Internal
use crate::{
    arm_ctrl::ArmConfig,
    goal_loop::{self, GoalLoop, LoopState},
    params::ArmExecParams,
    point::Point,
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    session::Session,
    time::seconds_to_cycles,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Data store for the simulation.
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u64,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Simulation elapsed time
    pub sim_time_s: f64,

    cycle_frequency_hz: f64,

    // Goal intake
    /// Accepted goals not yet given to the goal loop, oldest first.
    pub goal_queue: VecDeque<Point>,

    /// Cycles left before another goal request is accepted.
    pub goal_cooldown_cycles: u64,

    /// Cooldown applied after each accepted request.
    debounce_cycles: u64,

    pub goals_requested: usize,
    pub goals_rejected: usize,
    pub goals_reached: usize,

    // GoalLoop
    pub goal_loop: GoalLoop,
    pub goal_loop_input: goal_loop::InputData,
    pub goal_loop_output: ArmConfig,
    pub goal_loop_status_rpt: goal_loop::StatusReport,

    // Display
    pub pixels_per_meter: f64,

    arch_cycle: Archiver,
}

/// One row of the cycle archive.
#[derive(Debug, Clone, Copy, Serialize)]
struct CycleRecord {
    num_cycles: u64,
    sim_time_s: f64,
    state: LoopState,
    goal_x_m: Option<f64>,
    goal_y_m: Option<f64>,
    tip_x_m: f64,
    tip_y_m: f64,
    queued_goals: usize,
}

/// Summary of a run, saved when the executable exits.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub finished_at: DateTime<Utc>,
    pub num_cycles: u64,
    pub sim_time_s: f64,
    pub goals_requested: usize,
    pub goals_rejected: usize,
    pub goals_reached: usize,
    pub goals_outstanding: usize,
    pub final_state: LoopState,
    pub final_tip_m: Point,
    pub final_config: ArmConfig,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Build the data store around an initialised goal loop.
    pub fn new(exec_params: &ArmExecParams, goal_loop: GoalLoop) -> Self {
        let goal_loop_output = goal_loop.arm().config();

        Self {
            num_cycles: 0,
            is_1_hz_cycle: true,
            sim_time_s: 0.0,
            cycle_frequency_hz: exec_params.cycle_frequency_hz,
            goal_queue: VecDeque::new(),
            goal_cooldown_cycles: 0,
            debounce_cycles: seconds_to_cycles(
                exec_params.goal_debounce_s,
                exec_params.cycle_frequency_hz,
            ),
            goals_requested: 0,
            goals_rejected: 0,
            goals_reached: 0,
            goal_loop,
            goal_loop_input: goal_loop::InputData::default(),
            goal_loop_output,
            goal_loop_status_rpt: goal_loop::StatusReport::default(),
            pixels_per_meter: exec_params.pixels_per_meter,
            arch_cycle: Archiver::default(),
        }
    }

    /// Open the data store's own archive in the session.
    pub fn attach_archives(&mut self, session: &Session) -> Result<(), ArchiveError> {
        self.arch_cycle = Archiver::from_path(session, "cycles.csv")?;
        Ok(())
    }

    /// Request a new goal.
    ///
    /// The goal is clamped into the arm's reachable space and queued. Requests
    /// arriving within the debounce time of the last accepted one are
    /// rejected, returns `true` if the goal was queued.
    pub fn request_goal(&mut self, goal: Point) -> bool {
        self.goals_requested += 1;

        if self.goal_cooldown_cycles > 0 {
            warn!(
                "Goal {} rejected, requests blocked for {} more cycles",
                goal, self.goal_cooldown_cycles
            );
            self.goals_rejected += 1;
            return false;
        }

        self.push_goal(goal);
        self.goal_cooldown_cycles = self.debounce_cycles;

        true
    }

    /// Clamp a goal into the arm's reachable space and queue it, ignoring the
    /// debounce. The goal still counts as requested.
    pub fn queue_goal(&mut self, goal: Point) {
        self.goals_requested += 1;
        self.push_goal(goal);
    }

    /// Number of goals accepted into the queue so far.
    pub fn goals_accepted(&self) -> usize {
        self.goals_requested - self.goals_rejected
    }

    fn push_goal(&mut self, goal: Point) {
        let clamped = self.goal_loop.arm().clamp_goal(goal);
        if clamped != goal {
            debug!("Goal {} clamped to {}", goal, clamped);
        }

        info!("Goal {} queued", clamped);
        self.goal_queue.push_back(clamped);
    }

    /// Execute one simulation cycle.
    pub fn tick(&mut self) {
        self.cycle_start();

        // ---- FINISHED DETECTION ----

        if self.goal_loop.state() == LoopState::Tracking && self.goal_loop.is_arm_stopped() {
            self.goal_loop.set_state(LoopState::Finished);
            self.goals_reached += 1;
            info!(
                "Goal reached at {:.2} s, tip at {}",
                self.sim_time_s,
                self.goal_loop.arm().endpoint()
            );
        }

        // ---- DISPATCH ----

        if self.goal_loop.state() != LoopState::Tracking {
            self.goal_loop_input.goal = self.goal_queue.pop_front();
        }

        // ---- GOAL LOOP PROCESSING ----

        match self.goal_loop.proc(&self.goal_loop_input) {
            Ok((o, r)) => {
                self.goal_loop_output = o;
                self.goal_loop_status_rpt = r;
            }
            Err(e) => {
                // A dropped goal does not stop the simulation
                warn!("Error during GoalLoop processing: {}", e);
                self.goal_loop_output = self.goal_loop.arm().config();
                self.goal_loop_status_rpt = self.goal_loop.report();
            }
        }

        self.cycle_end();
    }

    /// True when nothing is queued and the loop is not tracking a goal.
    pub fn is_idle(&self) -> bool {
        self.goal_queue.is_empty() && self.goal_loop.state() != LoopState::Tracking
    }

    /// Tip of the arm in display units.
    pub fn tip_px(&self) -> Point {
        self.goal_loop.arm().elbow().endpoint_scaled(self.pixels_per_meter)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            finished_at: Utc::now(),
            num_cycles: self.num_cycles,
            sim_time_s: self.sim_time_s,
            goals_requested: self.goals_requested,
            goals_rejected: self.goals_rejected,
            goals_reached: self.goals_reached,
            goals_outstanding: self.goal_queue.len(),
            final_state: self.goal_loop.state(),
            final_tip_m: self.goal_loop.arm().endpoint(),
            final_config: self.goal_loop_output,
        }
    }

    /// Clear the per-cycle items and set the 1Hz cycle flag.
    fn cycle_start(&mut self) {
        let cycles_per_s = (self.cycle_frequency_hz.round() as u64).max(1);
        self.is_1_hz_cycle = self.num_cycles % cycles_per_s == 0;

        self.goal_loop_input = goal_loop::InputData::default();
    }

    /// Advance the cycle counters and the debounce cooldown.
    fn cycle_end(&mut self) {
        self.goal_cooldown_cycles = self.goal_cooldown_cycles.saturating_sub(1);
        self.num_cycles += 1;
        self.sim_time_s = self.num_cycles as f64 / self.cycle_frequency_hz;
    }
}

impl Archived for DataStore {
    fn write(&mut self) -> Result<(), ArchiveError> {
        let tip = self.goal_loop.arm().endpoint();
        let goal = self.goal_loop.goal();

        self.arch_cycle.serialise(CycleRecord {
            num_cycles: self.num_cycles,
            sim_time_s: self.sim_time_s,
            state: self.goal_loop.state(),
            goal_x_m: goal.map(|g| g.x),
            goal_y_m: goal.map(|g| g.y),
            tip_x_m: tip.x,
            tip_y_m: tip.y,
            queued_goals: self.goal_queue.len(),
        })?;

        self.goal_loop.write()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
