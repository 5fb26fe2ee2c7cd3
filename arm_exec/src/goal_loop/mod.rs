//! Goal tracking module
//!
//! A state machine which drives a [`TwoJointArm`](crate::arm_ctrl::TwoJointArm)
//! towards one goal point at a time. The loop starts out `Waiting`, moves to
//! `Tracking` whenever a goal is set and is moved to `Finished` by its owner
//! once the arm has stopped.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
pub use params::*;
pub use state::*;

use crate::arm_ctrl::ArmCtrlError;
use util::{archive::ArchiveError, params::LoadError};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The state of the goal tracking loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopState {
    /// No goal has been given yet.
    Waiting,

    /// Driving the joints towards the current goal.
    Tracking,

    /// The arm stopped at the current goal.
    Finished,
}

/// Possible errors that can occur during GoalLoop operation.
#[derive(Debug, thiserror::Error)]
pub enum GoalLoopError {
    #[error("Could not load the goal loop parameters: {0}")]
    ParamLoadError(LoadError),

    #[error("Could not build the arm: {0}")]
    ArmBuildError(ArmCtrlError),

    #[error("Could not solve the joint angles for the goal: {0}")]
    SolveError(ArmCtrlError),

    #[error("Angle tolerance must be positive, found {0} rad")]
    InvalidTolerance(f64),

    #[error("Could not write the goal loop archives: {0}")]
    ArchiveError(ArchiveError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for LoopState {
    fn default() -> Self {
        LoopState::Waiting
    }
}

impl LoopState {
    /// Label of the state as shown to the operator.
    pub fn label(&self) -> &'static str {
        match self {
            LoopState::Waiting => "waiting",
            LoopState::Tracking => "tracking",
            LoopState::Finished => "finished",
        }
    }
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
