//! Implementations for the Joint state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::{JointError, JointParams, StopPolicy, STOP_VEL_FRACTION};
use crate::{
    motor::{rpm_to_rads, Motor, MAX_VOLTAGE_V},
    pid::PidController,
    point::Point,
};
use util::maths::{clamp, lin_map};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single rotating joint.
#[derive(Debug, Clone)]
pub struct Joint {
    // ---- CONFIGURATION ----
    pub(crate) length_m: f64,
    pub(crate) mass_kg: f64,
    pub(crate) gear_ratio: f64,
    pub(crate) num_motors: u32,
    pub(crate) motor: Motor,
    pub(crate) stop_policy: StopPolicy,
    pub(crate) pid: PidController,

    /// Duration of one simulation cycle.
    ///
    /// Units: seconds
    pub(crate) cycle_period_s: f64,

    // ---- DERIVED ----
    /// Torque constant of all motors combined.
    ///
    /// Units: newton meters/amp
    pub(crate) kt_nm_per_a: f64,

    /// Free speed of the link at the gearbox output.
    ///
    /// Units: radians/second
    pub(crate) max_vel_rads: f64,

    /// Moment of inertia of the link about its pivot.
    ///
    /// Units: kilogram meters^2
    pub(crate) moi_kgm2: f64,

    // ---- SIMULATION STATE ----
    /// Position of the pivot.
    pub(crate) start: Point,

    /// Absolute angle of the parent link, zero for a joint fixed to the
    /// ground.
    ///
    /// Units: radians
    pub(crate) parent_angle_rad: f64,

    /// Units: radians, counterclockwise from the parent link
    pub(crate) angle_rad: f64,

    /// Units: radians/second
    pub(crate) vel_rads: f64,

    /// Units: radians/second^2
    pub(crate) acc_rads2: f64,

    /// Voltage applied at the last update, after limiting.
    ///
    /// Units: volts
    pub(crate) voltage_v: f64,

    pub(crate) stopped: bool,
}

/// Snapshot of a joint's state, suitable for archiving and display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct JointTelemetry {
    pub angle_rad: f64,
    pub angle_deg: f64,
    pub vel_rads: f64,
    pub acc_rads2: f64,
    pub voltage_v: f64,
    pub end_x_m: f64,
    pub end_y_m: f64,
    pub stopped: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Joint {
    /// Build a new joint at rest from its parameters.
    ///
    /// The motor name must exist in the motor catalog.
    pub fn new(params: &JointParams, cycle_period_s: f64) -> Result<Self, JointError> {
        let motor = Motor::from_name(&params.motor).map_err(JointError::InvalidMotor)?;

        Self::with_motor(params, motor, cycle_period_s)
    }

    /// Build a new joint using an explicit motor instead of a catalog name.
    pub fn with_motor(
        params: &JointParams,
        motor: Motor,
        cycle_period_s: f64,
    ) -> Result<Self, JointError> {
        check_positive("length", params.length_m)?;
        check_positive("mass", params.mass_kg)?;
        check_positive("gear ratio", params.gear_ratio)?;
        check_positive("motor count", params.num_motors as f64)?;
        if !(cycle_period_s.is_finite() && cycle_period_s > 0.0) {
            return Err(JointError::InvalidCyclePeriod(cycle_period_s));
        }

        let kt_nm_per_a =
            params.num_motors as f64 * motor.stall_torque_nm / motor.stall_current_a;
        let max_vel_rads = rpm_to_rads(motor.free_speed_rpm / params.gear_ratio);
        let moi_kgm2 = params.mass_kg * params.length_m.powi(2) / 3.0;

        Ok(Self {
            length_m: params.length_m,
            mass_kg: params.mass_kg,
            gear_ratio: params.gear_ratio,
            num_motors: params.num_motors,
            motor,
            stop_policy: params.stop_policy,
            pid: PidController::new(params.pid),
            cycle_period_s,
            kt_nm_per_a,
            max_vel_rads,
            moi_kgm2,
            start: Point::ORIGIN,
            parent_angle_rad: 0.0,
            angle_rad: params.initial_angle_rad,
            vel_rads: 0.0,
            acc_rads2: 0.0,
            voltage_v: 0.0,
            stopped: false,
        })
    }

    // ---- DRIVE MODES ----

    /// Drive the joint open loop at a fraction of the maximum voltage, then
    /// step the simulation.
    ///
    /// `percent` is normally between -1 and +1.
    pub fn drive_open_loop(&mut self, percent: f64) {
        self.voltage_v = lin_map((-1.0, 1.0), (-MAX_VOLTAGE_V, MAX_VOLTAGE_V), percent);
        self.update();
    }

    /// Drive the joint towards `setpoint` using feedback only, then step the
    /// simulation.
    pub fn drive_pid(&mut self, setpoint: f64, current: f64, tolerance: f64) {
        if !self.check_stopped() {
            self.voltage_v = MAX_VOLTAGE_V * self.feedback(setpoint, current, tolerance);
        }
        self.update();
    }

    /// Drive the joint towards `setpoint` using feedback plus the gravity
    /// holding voltage, then step the simulation.
    pub fn drive_pid_feedforward(&mut self, setpoint: f64, current: f64, tolerance: f64) {
        if !self.check_stopped() {
            self.voltage_v = MAX_VOLTAGE_V * self.feedback(setpoint, current, tolerance)
                + self.feedforward_voltage();
        }
        self.update();
    }

    /// Allow a stopped joint to be driven again.
    ///
    /// Also clears the controller's at-target flag, otherwise the flag left
    /// from the previous target would stop the joint on its next drive.
    pub fn resume(&mut self) {
        self.stopped = false;
        self.pid.clear_at_target();
    }

    /// Clear the controller's accumulated integral and derivative memory.
    pub fn reset_controller(&mut self) {
        self.pid.reset();
    }

    // ---- GEOMETRY ----

    /// Position of the tip of the link using this joint's own angle.
    pub fn endpoint(&self) -> Point {
        self.start.offset_polar(self.length_m, self.angle_rad)
    }

    /// Position of the tip of the link when attached to a parent link at
    /// `parent_angle_rad`.
    pub fn endpoint_given_parent_angle(&self, parent_angle_rad: f64) -> Point {
        self.start
            .offset_polar(self.length_m, parent_angle_rad + self.angle_rad)
    }

    /// Tip position in display units, `scale` display units per meter.
    pub fn endpoint_scaled(&self, scale: f64) -> Point {
        self.endpoint_given_parent_angle(self.parent_angle_rad).scaled(scale)
    }

    pub fn set_start(&mut self, start: Point) {
        self.start = start;
    }

    pub fn set_parent_angle(&mut self, parent_angle_rad: f64) {
        self.parent_angle_rad = parent_angle_rad;
    }

    // ---- ACCESSORS ----

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn length_m(&self) -> f64 {
        self.length_m
    }

    pub fn mass_kg(&self) -> f64 {
        self.mass_kg
    }

    pub fn gear_ratio(&self) -> f64 {
        self.gear_ratio
    }

    pub fn num_motors(&self) -> u32 {
        self.num_motors
    }

    pub fn motor(&self) -> &Motor {
        &self.motor
    }

    pub fn pid(&self) -> &PidController {
        &self.pid
    }

    pub fn angle_rad(&self) -> f64 {
        self.angle_rad
    }

    pub fn angle_deg(&self) -> f64 {
        self.angle_rad.to_degrees()
    }

    /// Angle of the link relative to the horizontal.
    pub fn abs_angle_rad(&self) -> f64 {
        self.parent_angle_rad + self.angle_rad
    }

    pub fn vel_rads(&self) -> f64 {
        self.vel_rads
    }

    pub fn acc_rads2(&self) -> f64 {
        self.acc_rads2
    }

    pub fn voltage_v(&self) -> f64 {
        self.voltage_v
    }

    pub fn max_vel_rads(&self) -> f64 {
        self.max_vel_rads
    }

    pub fn kt_nm_per_a(&self) -> f64 {
        self.kt_nm_per_a
    }

    pub fn moi_kgm2(&self) -> f64 {
        self.moi_kgm2
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn telemetry(&self) -> JointTelemetry {
        let end = self.endpoint_given_parent_angle(self.parent_angle_rad);

        JointTelemetry {
            angle_rad: self.angle_rad,
            angle_deg: self.angle_deg(),
            vel_rads: self.vel_rads,
            acc_rads2: self.acc_rads2,
            voltage_v: self.voltage_v,
            end_x_m: end.x,
            end_y_m: end.y,
            stopped: self.stopped,
        }
    }

    // ---- PRIVATE ----

    /// Latch the stopped flag if the controller is at its target and the
    /// joint has slowed down, returning the flag.
    fn check_stopped(&mut self) -> bool {
        if self.pid.is_at_target()
            && self.vel_rads.abs() < STOP_VEL_FRACTION * self.max_vel_rads
        {
            self.stopped = true;
        }

        self.stopped
    }

    /// Controller output limited to [-1, 1].
    fn feedback(&mut self, setpoint: f64, current: f64, tolerance: f64) -> f64 {
        clamp(self.pid.evaluate(setpoint, current, tolerance), -1.0, 1.0)
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), JointError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(JointError::NonPositiveParam(name, value))
    }
}
