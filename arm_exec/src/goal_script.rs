//! # Goal script module
//!
//! Goal scripts give the arm a timed sequence of goals to move to. Each goal
//! is one line of the form
//!
//! ```text
//! <time_s>: <x_m>, <y_m>;
//! ```
//!
//! where the time is the simulation time at which the goal is requested.
//! Anything not matching this form, for example `#` comments, is ignored.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

// Internal
use crate::point::Point;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A goal which is scripted to be requested at a specific time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedGoal {
    /// Simulation time at which the goal is requested.
    ///
    /// Units: seconds
    pub request_time_s: f64,

    pub goal: Point,
}

/// A goal script.
///
/// After loading use `.pending_goals` each cycle to acquire the goals which
/// are now due.
#[derive(Debug, Clone)]
pub struct GoalScript {
    goals: VecDeque<ScriptedGoal>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error("Script contains an invalid timestamp: {0}. Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid goal at {0} s: {1:?}. Should be \"x, y\"")]
    InvalidGoal(f64, String),

    #[error("Script goals must be in time order, found {1} s after {0} s")]
    OutOfOrder(f64, f64),

    #[error("Could not build the script regex: {0}")]
    RegexError(regex::Error),
}

/// Goals due at a given time.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingGoals {
    None,
    Some(Vec<Point>),
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GoalScript {
    /// Load a script from the given path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        let path = script_path.as_ref();

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path.display().to_string()));
        }

        let script = fs::read_to_string(path).map_err(ScriptError::ScriptLoadError)?;

        script.parse()
    }

    /// Return the goals due at or before `sim_time_s`, removing them from the
    /// script.
    pub fn pending_goals(&mut self, sim_time_s: f64) -> PendingGoals {
        // If the queue is empty the script is over
        if self.goals.is_empty() {
            return PendingGoals::EndOfScript;
        }

        let mut due = vec![];

        while let Some(g) = self.goals.front() {
            if g.request_time_s > sim_time_s {
                break;
            }
            due.push(g.goal);
            self.goals.pop_front();
        }

        if due.is_empty() {
            PendingGoals::None
        } else {
            PendingGoals::Some(due)
        }
    }

    /// Number of goals still to be requested.
    pub fn num_goals(&self) -> usize {
        self.goals.len()
    }

    /// Request time of the last goal in the script.
    pub fn duration_s(&self) -> f64 {
        match self.goals.back() {
            Some(g) => g.request_time_s,
            None => 0.0,
        }
    }
}

impl FromStr for GoalScript {
    type Err = ScriptError;

    /// Parse a script from its text.
    fn from_str(script: &str) -> Result<Self, Self::Err> {
        let mut goals: VecDeque<ScriptedGoal> = VecDeque::new();

        let re = RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .map_err(ScriptError::RegexError)?;

        for cap in re.captures_iter(script) {
            let time_str = cap.get(1).map_or("", |m| m.as_str());
            let payload = cap.get(3).map_or("", |m| m.as_str());

            let request_time_s: f64 = time_str
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            let goal = parse_goal(payload)
                .ok_or_else(|| ScriptError::InvalidGoal(request_time_s, payload.to_string()))?;

            if let Some(last) = goals.back() {
                if request_time_s < last.request_time_s {
                    return Err(ScriptError::OutOfOrder(last.request_time_s, request_time_s));
                }
            }

            goals.push_back(ScriptedGoal {
                request_time_s,
                goal,
            });
        }

        if goals.is_empty() {
            return Err(ScriptError::ScriptEmpty);
        }

        Ok(GoalScript { goals })
    }
}

/// Parse `"x, y"` into a point.
fn parse_goal(payload: &str) -> Option<Point> {
    let mut parts = payload.split(',').map(|s| s.trim().parse::<f64>());

    let x = parts.next()?.ok()?;
    let y = parts.next()?.ok()?;

    if parts.next().is_some() || !x.is_finite() || !y.is_finite() {
        return None;
    }

    Some(Point::new(x, y))
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const SCRIPT: &str = "\
# Demo goals
0.0: 0.375, 1.0;
2.5: -1.0, 0.5;
  2.5 : 1.2,-0.4;
10: 0.0, 1.5;
";

    #[test]
    fn test_parse() {
        let script = GoalScript::from_str(SCRIPT).unwrap();

        assert_eq!(script.num_goals(), 4);
        assert_eq!(script.duration_s(), 10.0);
    }

    #[test]
    fn test_pending_goals() {
        let mut script = GoalScript::from_str(SCRIPT).unwrap();

        assert_eq!(
            script.pending_goals(0.0),
            PendingGoals::Some(vec![Point::new(0.375, 1.0)])
        );
        assert_eq!(script.pending_goals(1.0), PendingGoals::None);
        assert_eq!(
            script.pending_goals(3.0),
            PendingGoals::Some(vec![Point::new(-1.0, 0.5), Point::new(1.2, -0.4)])
        );
        assert_eq!(script.pending_goals(9.98), PendingGoals::None);
        assert_eq!(
            script.pending_goals(10.0),
            PendingGoals::Some(vec![Point::new(0.0, 1.5)])
        );
        assert_eq!(script.pending_goals(10.02), PendingGoals::EndOfScript);
    }

    #[test]
    fn test_bad_scripts() {
        assert!(matches!(
            GoalScript::from_str("# nothing here\n"),
            Err(ScriptError::ScriptEmpty)
        ));
        assert!(matches!(
            GoalScript::from_str("1.0: 0.5;"),
            Err(ScriptError::InvalidGoal(t, _)) if t == 1.0
        ));
        assert!(matches!(
            GoalScript::from_str("1.0: 0.5, 0.2, 0.1;"),
            Err(ScriptError::InvalidGoal(_, _))
        ));
        assert!(matches!(
            GoalScript::from_str("1.0: one, two;"),
            Err(ScriptError::InvalidGoal(_, _))
        ));
        assert!(matches!(
            GoalScript::from_str("2.0: 0.5, 0.5;\n1.0: 0.5, 0.5;"),
            Err(ScriptError::OutOfOrder(_, _))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            GoalScript::new("/definitely/not/a/real/script.goals"),
            Err(ScriptError::ScriptNotFound(_))
        ));
    }

    #[test]
    fn test_shipped_demo_script() {
        let script = GoalScript::from_str(include_str!("../../scripts/demo.goals")).unwrap();

        assert!(script.num_goals() > 0);
    }
}
