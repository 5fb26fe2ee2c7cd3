//! Arm Configuration structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::NUM_ROT_AXES;
use crate::joint::JointTelemetry;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Stores an arm configuration - the state of all rotational axes, shoulder
/// first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ArmConfig {
    /// All rotational axes
    pub rot_axes: [JointTelemetry; NUM_ROT_AXES],
}

/// Target angles for the arm's joints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JointTargets {
    /// Units: radians
    pub shoulder_rad: f64,

    /// Units: radians, relative to the shoulder link
    pub elbow_rad: f64,
}

impl ArmConfig {
    pub fn shoulder(&self) -> &JointTelemetry {
        &self.rot_axes[0]
    }

    pub fn elbow(&self) -> &JointTelemetry {
        &self.rot_axes[1]
    }
}
