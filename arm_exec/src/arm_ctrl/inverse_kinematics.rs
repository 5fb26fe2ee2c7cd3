//! Arm inverse kinematics calculations
//!
//! A goal for the tip of the elbow link is converted into a pair of joint
//! angles. For any goal strictly inside the reachable annulus there are two
//! solutions, mirror images of each other about the line from the origin to
//! the goal. The solution which needs the least total joint travel from the
//! current angles is chosen.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use ordered_float::OrderedFloat;

// Internal
use super::*;
use crate::point::Point;
use util::maths::{clamp, sq};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Calculate the joint angles which place the tip of the arm at `goal`.
///
/// `goal` must already lie within the reachable space, see
/// [`clamp_to_reachable_space`]. Outside of it the elbow angle is undefined
/// and both returned angles will be `NaN`. Use [`solve_inverse_kinematics`]
/// for a checked version.
pub fn inverse_kinematics(
    goal: Point,
    current_shoulder_rad: f64,
    current_elbow_rad: f64,
    shoulder_length_m: f64,
    elbow_length_m: f64,
) -> JointTargets {
    let cos_elbow = (goal.to_vector().norm_squared()
        - sq(shoulder_length_m)
        - sq(elbow_length_m))
        / (2.0 * shoulder_length_m * elbow_length_m);

    select_solution(
        goal,
        cos_elbow.acos(),
        current_shoulder_rad,
        current_elbow_rad,
        shoulder_length_m,
        elbow_length_m,
    )
}

/// Checked inverse kinematics.
///
/// Rejects goals outside the closed annulus `[|l1 - l2|, l1 + l2]`. Goals on
/// its boundary are accepted, with rounding errors in the elbow cosine
/// absorbed.
pub fn solve_inverse_kinematics(
    goal: Point,
    current_shoulder_rad: f64,
    current_elbow_rad: f64,
    shoulder_length_m: f64,
    elbow_length_m: f64,
) -> Result<JointTargets, ArmCtrlError> {
    let (min_m, max_m) = reachable_radii(shoulder_length_m, elbow_length_m);
    let distance_m = goal.norm();

    if !(distance_m >= min_m && distance_m <= max_m) {
        return Err(ArmCtrlError::Unreachable {
            goal,
            distance_m,
            min_m,
            max_m,
        });
    }

    let cos_elbow = (sq(distance_m) - sq(shoulder_length_m) - sq(elbow_length_m))
        / (2.0 * shoulder_length_m * elbow_length_m);

    Ok(select_solution(
        goal,
        clamp(cos_elbow, -1.0, 1.0).acos(),
        current_shoulder_rad,
        current_elbow_rad,
        shoulder_length_m,
        elbow_length_m,
    ))
}

/// Calculate the position of the tip of the arm for the given joint angles.
pub fn forward_kinematics(
    shoulder_length_m: f64,
    elbow_length_m: f64,
    shoulder_rad: f64,
    elbow_rad: f64,
) -> Point {
    Point::ORIGIN
        .offset_polar(shoulder_length_m, shoulder_rad)
        .offset_polar(elbow_length_m, shoulder_rad + elbow_rad)
}

/// Keep a point within the arm's reachable space.
///
/// Points strictly inside the annulus `(|l1 - l2|, l1 + l2)` are returned
/// unchanged. Any other point is moved along the line from the origin onto the
/// nearest boundary, pulled slightly inside it.
pub fn clamp_to_reachable_space(
    point: Point,
    shoulder_length_m: f64,
    elbow_length_m: f64,
) -> Point {
    let (min_m, max_m) = reachable_radii(shoulder_length_m, elbow_length_m);
    let dist_sq = point.to_vector().norm_squared();

    if dist_sq > sq(min_m) && dist_sq < sq(max_m) {
        return point;
    }

    let radius_m = if dist_sq <= sq(min_m) {
        min_m * INNER_CLAMP_SCALE
    } else {
        max_m * OUTER_CLAMP_SCALE
    };

    Point::ORIGIN.offset_polar(radius_m, point.heading_rad())
}

/// True if the point lies strictly inside the reachable space.
pub fn is_reachable(point: Point, shoulder_length_m: f64, elbow_length_m: f64) -> bool {
    clamp_to_reachable_space(point, shoulder_length_m, elbow_length_m) == point
}

/// Inner and outer radius of the reachable space.
pub fn reachable_radii(shoulder_length_m: f64, elbow_length_m: f64) -> (f64, f64) {
    (
        (shoulder_length_m - elbow_length_m).abs(),
        shoulder_length_m + elbow_length_m,
    )
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Build both solutions for the given elbow angle magnitude and pick the one
/// with the least joint travel. Ties go to the positive elbow solution.
fn select_solution(
    goal: Point,
    elbow_rad: f64,
    current_shoulder_rad: f64,
    current_elbow_rad: f64,
    shoulder_length_m: f64,
    elbow_length_m: f64,
) -> JointTargets {
    let goal_heading_rad = goal.heading_rad();

    // Angle between the shoulder link and the line to the goal
    let offset_rad = (elbow_length_m * elbow_rad.sin())
        .atan2(shoulder_length_m + elbow_length_m * elbow_rad.cos())
        .abs();

    let solutions = [
        JointTargets {
            shoulder_rad: goal_heading_rad - offset_rad,
            elbow_rad,
        },
        JointTargets {
            shoulder_rad: goal_heading_rad + offset_rad,
            elbow_rad: -elbow_rad,
        },
    ];

    let travel = |s: &JointTargets| {
        OrderedFloat(
            (s.shoulder_rad - current_shoulder_rad).abs()
                + (s.elbow_rad - current_elbow_rad).abs(),
        )
    };

    let chosen = *solutions
        .iter()
        .min_by_key(|s| travel(*s))
        .unwrap_or(&solutions[0]);

    debug!(
        "IK for {}: candidates {:?}, chose shoulder = {:.4}, elbow = {:.4}",
        goal, solutions, chosen.shoulder_rad, chosen.elbow_rad
    );

    chosen
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    const L1: f64 = 1.0;
    const L2: f64 = 0.8;

    #[test]
    fn test_ik_reference_goal() {
        let goal = Point::new(0.375, 1.0);

        let t = inverse_kinematics(goal, 1.0, 0.8, L1, L2);
        let end = forward_kinematics(L1, L2, t.shoulder_rad, t.elbow_rad);

        assert!((end.x - goal.x).abs() < 1.0 && (end.y - goal.y).abs() < 1.0);
        assert!(end.distance(&goal) < 1e-3);

        // Positive elbow is the closer solution from these angles
        assert!(t.elbow_rad > 0.0);
    }

    #[test]
    fn test_ik_round_trip_sweep() {
        let currents = [(0.0, 0.0), (1.0, 0.8), (2.5, -1.5), (-1.0, 3.0)];

        for i in 0..24 {
            let heading = i as f64 * PI / 12.0;
            for radius in &[0.25, 0.6, 1.0, 1.4, 1.75] {
                let goal = Point::ORIGIN.offset_polar(*radius, heading);

                for (c1, c2) in currents.iter() {
                    let t = inverse_kinematics(goal, *c1, *c2, L1, L2);
                    let end = forward_kinematics(L1, L2, t.shoulder_rad, t.elbow_rad);
                    assert!(
                        end.distance(&goal) < 1e-6,
                        "goal {} from ({}, {}) reached {}",
                        goal, c1, c2, end
                    );
                }
            }
        }
    }

    #[test]
    fn test_branch_minimises_travel() {
        let goal = Point::new(0.375, 1.0);

        let from_up = inverse_kinematics(goal, 1.0, 0.8, L1, L2);
        let from_down = inverse_kinematics(goal, 2.0, -1.9, L1, L2);

        assert!(from_up.elbow_rad > 0.0);
        assert!(from_down.elbow_rad < 0.0);
        assert_relative_eq!(from_up.elbow_rad, -from_down.elbow_rad, epsilon = 1e-12);
        assert!(from_down.shoulder_rad > from_up.shoulder_rad);
    }

    #[test]
    fn test_unreachable_goal() {
        let goal = Point::new(2.0, 0.75);

        let t = inverse_kinematics(goal, 0.0, 0.0, L1, L2);
        assert!(t.shoulder_rad.is_nan() && t.elbow_rad.is_nan());

        assert!(matches!(
            solve_inverse_kinematics(goal, 0.0, 0.0, L1, L2),
            Err(ArmCtrlError::Unreachable { .. })
        ));
        assert!(solve_inverse_kinematics(Point::new(0.08, 0.11), 0.0, 0.0, L1, L2).is_err());
    }

    #[test]
    fn test_checked_ik_accepts_boundary() {
        let t = solve_inverse_kinematics(Point::new(1.8, 0.0), 0.0, 0.0, L1, L2).unwrap();
        assert_relative_eq!(t.shoulder_rad, 0.0, epsilon = 1e-6);
        assert_relative_eq!(t.elbow_rad, 0.0, epsilon = 1e-6);

        let t = solve_inverse_kinematics(Point::new(0.0, 0.2), 0.0, 0.0, L1, L2).unwrap();
        let end = forward_kinematics(L1, L2, t.shoulder_rad, t.elbow_rad);
        assert!(end.distance(&Point::new(0.0, 0.2)) < 1e-6);
    }

    #[test]
    fn test_forward_kinematics() {
        let end = forward_kinematics(L1, L2, PI / 2.0, -PI / 2.0);
        assert_relative_eq!(end.x, 0.8, epsilon = 1e-12);
        assert_relative_eq!(end.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_clamp_inside_is_unchanged() {
        let p = Point::new(1.0, 0.75);
        assert_eq!(clamp_to_reachable_space(p, L1, L2), p);
        assert!(is_reachable(p, L1, L2));

        for i in 0..15 {
            let p = Point::ORIGIN.offset_polar(0.25 + 0.1 * i as f64, i as f64);
            assert_eq!(clamp_to_reachable_space(p, L1, L2), p);
        }
    }

    #[test]
    fn test_clamp_outside() {
        let p = Point::new(2.0, 0.75);
        let c = clamp_to_reachable_space(p, L1, L2);
        assert!(c.x != p.x && c.y != p.y);
        assert!(c.norm() < 1.8);
        assert!(c.norm() > 0.2);
        assert_relative_eq!(c.heading_rad(), p.heading_rad(), epsilon = 1e-12);
        assert_relative_eq!(c.norm(), 1.8 * OUTER_CLAMP_SCALE, epsilon = 1e-12);
        assert!(!is_reachable(p, L1, L2));
    }

    #[test]
    fn test_clamp_inside_inner_radius() {
        let p = Point::new(0.08, 0.11);
        let c = clamp_to_reachable_space(p, L1, L2);
        assert!(c.x != p.x && c.y != p.y);
        assert!(c.norm() > 0.2);
        assert!(c.norm() < 1.8);
        assert_relative_eq!(c.norm(), 0.2 * INNER_CLAMP_SCALE, epsilon = 1e-12);
    }

    #[test]
    fn test_clamp_boundaries_and_origin() {
        let (min_m, max_m) = reachable_radii(L1, L2);

        // Exactly on a boundary counts as outside
        let c = clamp_to_reachable_space(Point::new(max_m, 0.0), L1, L2);
        assert!(c.norm() < max_m);

        let c = clamp_to_reachable_space(Point::new(0.0, min_m), L1, L2);
        assert!(c.norm() > min_m);

        // The origin has no direction, it is pushed out along +x
        let c = clamp_to_reachable_space(Point::ORIGIN, L1, L2);
        assert_relative_eq!(c.x, 0.2 * INNER_CLAMP_SCALE, epsilon = 1e-12);
        assert_eq!(c.y, 0.0);

        // Every clamped point can be solved
        for p in &[Point::new(5.0, -3.0), Point::new(0.01, 0.0), Point::new(-0.1, 0.1)] {
            let c = clamp_to_reachable_space(*p, L1, L2);
            let t = inverse_kinematics(c, 0.0, 0.0, L1, L2);
            assert!(t.shoulder_rad.is_finite() && t.elbow_rad.is_finite());
        }
    }
}
