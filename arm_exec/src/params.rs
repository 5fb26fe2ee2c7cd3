//! # Arm Executable Parameters
//!
//! This module provide parameters for the arm simulator executable.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::point::Point;

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmExecParams {
    /// Number of simulation cycles per simulated second.
    ///
    /// Units: hertz
    pub cycle_frequency_hz: f64,

    /// Sleep at the end of each cycle so the simulation runs in wall clock
    /// time.
    #[serde(default)]
    pub realtime: bool,

    /// Stop after this many cycles even if goals remain.
    pub max_cycles: u64,

    /// Minimum time between two accepted goal requests.
    ///
    /// Units: seconds
    pub goal_debounce_s: f64,

    /// Display scale used when reporting positions.
    ///
    /// Units: pixels/meter
    pub pixels_per_meter: f64,

    /// Goals requested at startup when no script is given.
    #[serde(default)]
    pub goals: Vec<Point>,
}

impl ArmExecParams {
    /// Duration of one cycle.
    ///
    /// Units: seconds
    pub fn cycle_period_s(&self) -> f64 {
        1.0 / self.cycle_frequency_hz
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::goal_loop;
    use approx::assert_relative_eq;

    #[test]
    fn test_shipped_params() {
        let exec: ArmExecParams =
            util::params::from_str(include_str!("../../params/arm_exec.toml")).unwrap();

        assert_relative_eq!(exec.cycle_frequency_hz, 50.0);
        assert_relative_eq!(exec.cycle_period_s(), 0.02);
        assert_relative_eq!(exec.goal_debounce_s, 0.25);
        assert_relative_eq!(exec.pixels_per_meter, 500.0);
        assert!(!exec.goals.is_empty());

        let gl: goal_loop::Params =
            util::params::from_str(include_str!("../../params/goal_loop.toml")).unwrap();

        assert_relative_eq!(gl.angle_tolerance_rad, 1f64.to_radians(), epsilon = 1e-9);
        assert!(!gl.reset_integral_on_new_goal);
        assert_relative_eq!(gl.shoulder.length_m, 1.0);
        assert_relative_eq!(gl.elbow.length_m, 0.8);
        assert_eq!(gl.shoulder.num_motors, 2);
        assert_eq!(gl.elbow.num_motors, 1);
        assert_eq!(gl.elbow.stop_policy, crate::joint::StopPolicy::Lock);
        assert_relative_eq!(gl.shoulder.pid.k_d, 0.04);
    }
}
