//! # Arm simulator library.
//!
//! This library allows the executable, the benchmarks and other crates in the
//! workspace to access the simulation modules.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Two joint arm control - the serial linkage and its inverse kinematics
pub mod arm_ctrl;

/// Data store - the simulation context shared by everything in one cycle
pub mod data_store;

/// Goal tracking loop - sequences the arm through one goal at a time
pub mod goal_loop;

/// Goal scripts - timed goal requests loaded from a file
pub mod goal_script;

/// Single joint model - link dynamics driven by DC motors
pub mod joint;

/// DC motor catalog
pub mod motor;

/// Executable parameters
pub mod params;

/// PID position controller
pub mod pid;

/// Planar point type
pub mod point;
