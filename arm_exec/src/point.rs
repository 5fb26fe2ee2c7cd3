//! # Cartesian point
//!
//! Value type used for goal points and joint endpoints. All coordinates are
//! in meters, in the plane of the arm with the shoulder pivot at the origin.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A point in the plane of the arm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    ///
    /// Units: meters
    pub x: f64,

    /// Vertical coordinate, positive up.
    ///
    /// Units: meters
    pub y: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Point {
    /// The origin, where the shoulder pivot sits.
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidian distance between this point and another.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.to_vector() - other.to_vector()).norm()
    }

    /// Distance from the origin.
    pub fn norm(&self) -> f64 {
        self.to_vector().norm()
    }

    /// Angle of the point counterclockwise from the +x axis.
    ///
    /// Units: radians
    pub fn heading_rad(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Scale both coordinates by the given factor.
    ///
    /// Used by displays to go from meters into their own units, for example
    /// pixels.
    pub fn scaled(&self, factor: f64) -> Point {
        (self.to_vector() * factor).into()
    }

    /// Offset this point by a vector of the given length and angle.
    pub fn offset_polar(&self, length: f64, angle_rad: f64) -> Point {
        Point::new(
            self.x + length * angle_rad.cos(),
            self.y + length * angle_rad.sin(),
        )
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<Vector2<f64>> for Point {
    fn from(v: Vector2<f64>) -> Self {
        Point::new(v[0], v[1])
    }
}

impl From<Point> for Vector2<f64> {
    fn from(p: Point) -> Self {
        p.to_vector()
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_distance() {
        let a = Point::new(1.0, 0.75);
        assert_relative_eq!(a.norm(), 1.25, epsilon = 1e-12);
        assert_relative_eq!(a.distance(&Point::new(1.0, -0.25)), 1.0, epsilon = 1e-12);
        assert_eq!(Point::ORIGIN.norm(), 0.0);
    }

    #[test]
    fn test_scaled_and_polar() {
        assert_eq!(Point::new(0.5, -0.2).scaled(500.0), Point::new(250.0, -100.0));

        let p = Point::new(1.0, 0.0).offset_polar(0.8, FRAC_PI_2);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.8, epsilon = 1e-12);
        assert_relative_eq!(Point::new(0.0, 2.0).heading_rad(), FRAC_PI_2);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Point::new(0.375, 1.0)), "(0.375, 1.000)");
    }
}
