//! Host platform utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::env;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Environment variable pointing at the root of the software checkout, the
/// directory containing `params/`.
pub const ROOT_ENV_VAR: &str = "ARM_SIM_ROOT";

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the software root directory from the `ARM_SIM_ROOT` environment
/// variable.
pub fn get_arm_sim_root() -> Result<PathBuf, env::VarError> {
    env::var(ROOT_ENV_VAR).map(PathBuf::from)
}
