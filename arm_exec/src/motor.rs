//! # DC motor model
//!
//! Static electromechanical characteristics of a brushed DC motor, along with
//! the constants derived from them which are used by the joint dynamics.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use serde::Serialize;
use std::f64::consts::PI;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Maximum supply voltage available to the motors.
///
/// Units: volts
pub const MAX_VOLTAGE_V: f64 = 12.0;

/// Characteristics of the CIM motor, in the order stall torque (Nm), stall
/// current (A), free speed (RPM), free current (A).
const CIM: (f64, f64, f64, f64) = (2.42, 133.0, 5330.0, 2.7);

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A DC motor.
///
/// The zero-valued default is the "inert" motor returned by [`motor_for`] for
/// unknown names, every constant on it is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Motor {
    /// Units: newton meters
    pub stall_torque_nm: f64,

    /// Units: amps
    pub stall_current_a: f64,

    /// Units: revolutions per minute
    pub free_speed_rpm: f64,

    /// Units: amps
    pub free_current_a: f64,

    /// Armature resistance, `MAX_VOLTAGE_V / stall_current_a`.
    ///
    /// Units: ohms
    pub resistance_ohm: f64,

    /// Velocity constant, free speed over the back-EMF voltage at free speed.
    ///
    /// Units: radians/second/volt
    pub kv_rads_per_v: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MotorError {
    #[error("No motor named \"{0}\" in the motor catalog")]
    UnknownMotor(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Motor {
    /// Build a motor from its datasheet values, deriving the resistance and
    /// velocity constant.
    pub fn new(
        stall_torque_nm: f64,
        stall_current_a: f64,
        free_speed_rpm: f64,
        free_current_a: f64,
    ) -> Self {
        let resistance_ohm = MAX_VOLTAGE_V / stall_current_a;
        let kv_rads_per_v = rpm_to_rads(free_speed_rpm)
            / (MAX_VOLTAGE_V - resistance_ohm * free_current_a);

        Self {
            stall_torque_nm,
            stall_current_a,
            free_speed_rpm,
            free_current_a,
            resistance_ohm,
            kv_rads_per_v,
        }
    }

    /// Look up a motor in the catalog by (case-insensitive) name.
    pub fn from_name(name: &str) -> Result<Self, MotorError> {
        if name.eq_ignore_ascii_case("cim") {
            let (torque, stall_current, free_speed, free_current) = CIM;
            Ok(Motor::new(torque, stall_current, free_speed, free_current))
        } else {
            Err(MotorError::UnknownMotor(name.to_string()))
        }
    }

    /// True if this is the zero-valued motor.
    pub fn is_inert(&self) -> bool {
        *self == Motor::default()
    }

    /// Free speed of the motor shaft.
    ///
    /// Units: radians/second
    pub fn free_speed_rads(&self) -> f64 {
        rpm_to_rads(self.free_speed_rpm)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the motor with the given catalog name.
///
/// Unknown names give the zero-valued motor rather than an error, so any
/// constant derived from it will be zero or non-finite. Prefer
/// [`Motor::from_name`] wherever the error can be handled.
pub fn motor_for(name: &str) -> Motor {
    match Motor::from_name(name) {
        Ok(m) => m,
        Err(e) => {
            warn!("{}, using an inert motor", e);
            Motor::default()
        }
    }
}

/// Convert revolutions per minute into radians per second.
pub fn rpm_to_rads(rpm: f64) -> f64 {
    rpm / 60.0 * 2.0 * PI
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cim_constants() {
        let cim = motor_for("cim");

        assert_eq!(cim.stall_torque_nm, 2.42);
        assert_eq!(cim.stall_current_a, 133.0);
        assert_eq!(cim.free_speed_rpm, 5330.0);
        assert_eq!(cim.free_current_a, 2.7);

        assert_relative_eq!(cim.resistance_ohm, 12.0 / 133.0, epsilon = 1e-12);

        let expected_kv = (5330.0 / 60.0 * 2.0 * PI) / (12.0 - (12.0 / 133.0) * 2.7);
        assert_relative_eq!(cim.kv_rads_per_v, expected_kv, epsilon = 1e-9);
        assert!(!cim.is_inert());
    }

    #[test]
    fn test_name_is_case_insensitive() {
        assert_eq!(motor_for("CIM"), motor_for("cim"));
        assert_eq!(Motor::from_name("Cim"), Ok(motor_for("cim")));
    }

    #[test]
    fn test_unknown_motor() {
        let m = motor_for("falcon");
        assert!(m.is_inert());
        assert_eq!(m.resistance_ohm, 0.0);
        assert_eq!(m.kv_rads_per_v, 0.0);

        assert_eq!(
            Motor::from_name("falcon"),
            Err(MotorError::UnknownMotor(String::from("falcon")))
        );
    }

    #[test]
    fn test_rpm_to_rads() {
        assert_relative_eq!(rpm_to_rads(60.0), 2.0 * PI);
        assert_relative_eq!(motor_for("cim").free_speed_rads(), 5330.0 * PI / 30.0, epsilon = 1e-9);
    }
}
