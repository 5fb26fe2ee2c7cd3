//! Parameters structure for ArmCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::joint::JointParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the two joint arm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// The first joint, pivoting about the origin.
    pub shoulder: JointParams,

    /// The second joint, pivoting about the tip of the shoulder.
    pub elbow: JointParams,
}

#[cfg(test)]
impl Params {
    /// The reference arm: a 1.0 m shoulder on two CIMs and a 0.8 m elbow on
    /// one CIM, both locking once stopped.
    pub(crate) fn reference() -> Self {
        use crate::{joint::StopPolicy, pid::PidGains};

        Self {
            shoulder: JointParams {
                length_m: 1.0,
                mass_kg: 30.0,
                initial_angle_rad: 0.0,
                gear_ratio: 159.3,
                num_motors: 2,
                motor: String::from("cim"),
                pid: PidGains { k_p: 2.0, k_i: 0.0, k_d: 0.04 },
                stop_policy: StopPolicy::Lock,
            },
            elbow: JointParams {
                length_m: 0.8,
                mass_kg: 15.0,
                initial_angle_rad: 0.0,
                gear_ratio: 159.3,
                num_motors: 1,
                motor: String::from("cim"),
                pid: PidGains { k_p: 1.75, k_i: 0.0, k_d: 0.02 },
                stop_policy: StopPolicy::Lock,
            },
        }
    }
}
