//! Parameters structure for GoalLoop

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::{arm_ctrl, joint::JointParams};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the goal tracking loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Each joint is at its target once within this angle of it.
    ///
    /// Units: radians
    pub angle_tolerance_rad: f64,

    /// Clear the joint controllers' integral and derivative memory whenever a
    /// new goal is set.
    #[serde(default)]
    pub reset_integral_on_new_goal: bool,

    pub shoulder: JointParams,

    pub elbow: JointParams,
}

impl Params {
    /// Parameters of the arm driven by the loop.
    pub fn arm(&self) -> arm_ctrl::Params {
        arm_ctrl::Params {
            shoulder: self.shoulder.clone(),
            elbow: self.elbow.clone(),
        }
    }
}

#[cfg(test)]
impl Params {
    /// Reference loop parameters: 1 degree tolerance on the reference arm.
    pub(crate) fn reference() -> Self {
        let arm = arm_ctrl::Params::reference();

        Self {
            angle_tolerance_rad: 1f64.to_radians(),
            reset_integral_on_new_goal: false,
            shoulder: arm.shoulder,
            elbow: arm.elbow,
        }
    }
}
