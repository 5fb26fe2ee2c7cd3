//! Implementations for the GoalLoop state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use serde::Serialize;

// Internal
use super::{GoalLoopError, LoopState, Params};
use crate::{
    arm_ctrl::{ArmConfig, JointTargets, TwoJointArm},
    point::Point,
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Goal tracking module state
pub struct GoalLoop {
    pub(crate) params: Params,

    pub(crate) arm: TwoJointArm,

    /// The goal currently or last tracked.
    pub(crate) goal: Option<Point>,

    pub(crate) state: LoopState,

    /// Joint angles solved for the current goal, `None` until the first cycle
    /// spent tracking it.
    pub(crate) targets: Option<JointTargets>,

    pub(crate) report: StatusReport,
    arch_report: Archiver,
    arch_shoulder: Archiver,
    arch_elbow: Archiver,
}

/// Data required to initialise the GoalLoop.
#[derive(Debug, Clone)]
pub struct InitData {
    /// Path to the parameter file, relative to the parameters directory.
    pub params_path: String,

    /// Duration of one simulation cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,
}

/// Input data to the GoalLoop.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputData {
    /// A new goal to track, or `None` if there is no new goal on this cycle.
    pub goal: Option<Point>,
}

/// Status report for GoalLoop processing.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusReport {
    pub state: LoopState,

    /// A new goal was accepted this cycle.
    pub new_goal: bool,

    /// Joint targets have been solved for the current goal.
    pub targets_solved: bool,

    pub shoulder_stopped: bool,
    pub elbow_stopped: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for GoalLoop {
    type InitData = InitData;
    type InitError = GoalLoopError;

    type InputData = InputData;
    type OutputData = ArmConfig;
    type StatusReport = StatusReport;
    type ProcError = GoalLoopError;

    /// Initialise the GoalLoop module, loading the parameters and opening the
    /// archives in the session.
    fn init(init_data: Self::InitData, session: &Session) -> Result<Self, Self::InitError> {
        let params: Params =
            params::load(&init_data.params_path).map_err(GoalLoopError::ParamLoadError)?;

        let mut goal_loop = Self::new(params, init_data.cycle_period_s)?;

        goal_loop.arch_report = Archiver::from_path(session, "goal_loop/status_report.csv")
            .map_err(GoalLoopError::ArchiveError)?;
        goal_loop.arch_shoulder = Archiver::from_path(session, "goal_loop/shoulder.csv")
            .map_err(GoalLoopError::ArchiveError)?;
        goal_loop.arch_elbow = Archiver::from_path(session, "goal_loop/elbow.csv")
            .map_err(GoalLoopError::ArchiveError)?;

        Ok(goal_loop)
    }

    /// Perform cyclic processing of the goal loop.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        // Check to see if there's a new goal
        if let Some(goal) = input_data.goal {
            self.set_goal(goal);
            self.report.new_goal = true;
        }

        self.on_loop()?;

        self.report.state = self.state;
        self.report.targets_solved = self.targets.is_some();
        self.report.shoulder_stopped = self.arm.shoulder().is_stopped();
        self.report.elbow_stopped = self.arm.elbow().is_stopped();

        Ok((self.arm.config(), self.report))
    }
}

impl GoalLoop {
    /// Build a loop in the `Waiting` state with no archives attached.
    pub fn new(params: Params, cycle_period_s: f64) -> Result<Self, GoalLoopError> {
        if !(params.angle_tolerance_rad > 0.0) {
            return Err(GoalLoopError::InvalidTolerance(params.angle_tolerance_rad));
        }

        let arm =
            TwoJointArm::new(&params.arm(), cycle_period_s).map_err(GoalLoopError::ArmBuildError)?;

        Ok(Self {
            params,
            arm,
            goal: None,
            state: LoopState::Waiting,
            targets: None,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
            arch_shoulder: Archiver::default(),
            arch_elbow: Archiver::default(),
        })
    }

    /// Start tracking a new goal.
    ///
    /// Any goal being tracked is dropped immediately. The goal is expected to
    /// be inside the arm's reachable space already.
    pub fn set_goal(&mut self, goal: Point) {
        if self.state == LoopState::Tracking {
            if let Some(old) = self.goal {
                info!("Goal {} replaced by {} while tracking", old, goal);
            }
        } else {
            info!("New goal {}", goal);
        }

        self.goal = Some(goal);
        self.targets = None;
        self.arm.resume();
        if self.params.reset_integral_on_new_goal {
            self.arm.reset_controllers();
        }

        self.set_state(LoopState::Tracking);
    }

    /// Move the loop into the given state.
    ///
    /// Entering `Finished` forgets the solved targets so the next goal is
    /// solved from the arm's angles at that point.
    pub fn set_state(&mut self, state: LoopState) {
        if state != self.state {
            info!("GoalLoop {} -> {}", self.state, state);
        }

        if state == LoopState::Finished {
            self.targets = None;
        }

        self.state = state;
    }

    /// Run one cycle of the current state.
    ///
    /// The arm is only stepped while tracking, in the other states it holds
    /// its last pose.
    pub fn on_loop(&mut self) -> Result<(), GoalLoopError> {
        match self.state {
            LoopState::Waiting | LoopState::Finished => Ok(()),
            LoopState::Tracking => {
                let goal = match self.goal {
                    Some(g) => g,
                    None => {
                        warn!("GoalLoop tracking with no goal, waiting instead");
                        self.set_state(LoopState::Waiting);
                        return Ok(());
                    }
                };

                let targets = match self.targets {
                    Some(t) => t,
                    None => self.solve_targets(goal)?,
                };

                self.arm.drive_to(targets, self.params.angle_tolerance_rad);

                trace!("GoalLoop tip at {}", self.arm.endpoint());

                Ok(())
            }
        }
    }

    /// True once both joints have stopped.
    pub fn is_arm_stopped(&self) -> bool {
        self.arm.is_stopped()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn goal(&self) -> Option<Point> {
        self.goal
    }

    pub fn targets(&self) -> Option<JointTargets> {
        self.targets
    }

    pub fn arm(&self) -> &TwoJointArm {
        &self.arm
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn report(&self) -> StatusReport {
        self.report
    }

    /// Solve and cache the joint targets for the current goal.
    ///
    /// On failure the goal is dropped and the loop goes back to waiting.
    fn solve_targets(&mut self, goal: Point) -> Result<JointTargets, GoalLoopError> {
        match self.arm.solve(goal) {
            Ok(t) => {
                debug!(
                    "Targets for {}: shoulder {:.4} rad, elbow {:.4} rad",
                    goal, t.shoulder_rad, t.elbow_rad
                );
                self.targets = Some(t);
                Ok(t)
            }
            Err(e) => {
                warn!("Dropping goal {}: {}", goal, e);
                self.goal = None;
                self.set_state(LoopState::Waiting);
                Err(GoalLoopError::SolveError(e))
            }
        }
    }
}

impl Archived for GoalLoop {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(self.report)?;
        self.arch_shoulder.serialise(self.arm.shoulder().telemetry())?;
        self.arch_elbow.serialise(self.arm.elbow().telemetry())?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f64 = 1.0 / 50.0;
    const MAX_CYCLES: usize = 50 * 20;

    fn loop_params() -> Params {
        Params::reference()
    }

    fn goal_loop() -> GoalLoop {
        GoalLoop::new(loop_params(), DT).unwrap()
    }

    /// Process cycles until the arm stops, returning the number of cycles.
    fn run_until_stopped(gl: &mut GoalLoop) -> usize {
        for i in 0..MAX_CYCLES {
            gl.proc(&InputData::default()).unwrap();
            if gl.is_arm_stopped() {
                return i + 1;
            }
        }

        panic!("Arm did not stop within {} cycles", MAX_CYCLES);
    }

    #[test]
    fn test_starts_waiting_and_holds() {
        let mut gl = goal_loop();
        let before = gl.arm().endpoint();

        let (out, report) = gl.proc(&InputData::default()).unwrap();

        assert_eq!(report.state, LoopState::Waiting);
        assert_eq!(report.state.to_string(), "waiting");
        assert!(!report.targets_solved);
        assert_eq!(gl.arm().endpoint(), before);
        assert_eq!(out.shoulder().voltage_v, 0.0);
    }

    #[test]
    fn test_invalid_tolerance() {
        let mut params = loop_params();
        params.angle_tolerance_rad = 0.0;

        assert!(matches!(
            GoalLoop::new(params, DT),
            Err(GoalLoopError::InvalidTolerance(_))
        ));
    }

    #[test]
    fn test_tracks_goal_to_stop() {
        let mut gl = goal_loop();
        let goal = gl.arm().clamp_goal(Point::new(0.375, 1.0));

        let (_, report) = gl.proc(&InputData { goal: Some(goal) }).unwrap();
        assert!(report.new_goal);
        assert!(report.targets_solved);
        assert_eq!(report.state, LoopState::Tracking);
        let targets = gl.targets().unwrap();

        run_until_stopped(&mut gl);

        // Targets are only solved once per goal
        assert_eq!(gl.targets(), Some(targets));
        assert!(gl.arm().endpoint().distance(&goal) < 0.1);

        gl.set_state(LoopState::Finished);
        assert_eq!(gl.targets(), None);

        // Finished holds the arm where it stopped
        let at_stop = gl.arm().endpoint();
        let (_, report) = gl.proc(&InputData::default()).unwrap();
        assert_eq!(report.state.label(), "finished");
        assert_eq!(gl.arm().endpoint(), at_stop);
    }

    #[test]
    fn test_new_goal_after_finish_moves_again() {
        let mut gl = goal_loop();
        let first = gl.arm().clamp_goal(Point::new(0.375, 1.0));
        let second = gl.arm().clamp_goal(Point::new(-1.0, 0.5));

        gl.set_goal(first);
        run_until_stopped(&mut gl);
        gl.set_state(LoopState::Finished);

        let (_, report) = gl.proc(&InputData { goal: Some(second) }).unwrap();
        assert_eq!(report.state, LoopState::Tracking);
        assert!(!report.shoulder_stopped);
        assert!(!report.elbow_stopped);

        run_until_stopped(&mut gl);
        assert!(gl.arm().endpoint().distance(&second) < 0.1);
    }

    #[test]
    fn test_goal_overwritten_while_tracking() {
        let mut gl = goal_loop();
        let first = gl.arm().clamp_goal(Point::new(0.375, 1.0));
        let second = gl.arm().clamp_goal(Point::new(1.2, -0.4));

        gl.set_goal(first);
        for _ in 0..10 {
            gl.proc(&InputData::default()).unwrap();
        }
        let first_targets = gl.targets().unwrap();

        gl.proc(&InputData { goal: Some(second) }).unwrap();
        assert_eq!(gl.goal(), Some(second));
        assert_eq!(gl.state(), LoopState::Tracking);
        assert_ne!(gl.targets(), Some(first_targets));

        run_until_stopped(&mut gl);
        assert!(gl.arm().endpoint().distance(&second) < 0.1);
    }

    #[test]
    fn test_unreachable_goal_returns_to_waiting() {
        let mut gl = goal_loop();

        let res = gl.proc(&InputData { goal: Some(Point::new(5.0, 0.0)) });

        assert!(matches!(res, Err(GoalLoopError::SolveError(_))));
        assert_eq!(gl.state(), LoopState::Waiting);
        assert_eq!(gl.goal(), None);
    }

    #[test]
    fn test_reset_integral_on_new_goal() {
        let mut params = loop_params();
        params.shoulder.pid.k_i = 0.01;
        params.reset_integral_on_new_goal = true;
        let mut gl = GoalLoop::new(params, DT).unwrap();

        gl.set_goal(gl.arm().clamp_goal(Point::new(0.375, 1.0)));
        for _ in 0..5 {
            gl.proc(&InputData::default()).unwrap();
        }
        assert!(gl.arm().shoulder().pid().error_sum() != 0.0);

        gl.set_goal(gl.arm().clamp_goal(Point::new(1.0, 0.75)));
        assert_relative_eq!(gl.arm().shoulder().pid().error_sum(), 0.0);
    }

    #[test]
    fn test_integral_kept_by_default() {
        let mut gl = goal_loop();

        gl.set_goal(gl.arm().clamp_goal(Point::new(0.375, 1.0)));
        for _ in 0..5 {
            gl.proc(&InputData::default()).unwrap();
        }
        let sum = gl.arm().shoulder().pid().error_sum();
        assert!(sum != 0.0);

        gl.set_goal(gl.arm().clamp_goal(Point::new(1.0, 0.75)));
        assert_eq!(gl.arm().shoulder().pid().error_sum(), sum);
    }
}
