//! Law-of-cosines solver for the four-bar loop.
//!
//! Infeasible triangles are not errors here: they produce NaN, which the
//! sweep reads as the travel limit of the mechanism.
use crate::Point;

/// Convert degrees to radians.
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg.to_radians()
}

/// Convert radians to degrees.
#[inline]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad.to_degrees()
}

/// Angle opposite to side `opposite` in a triangle with adjacent sides `a`
/// and `b`.
///
/// Return NaN if the triangle inequality is violated.
pub fn angle_from_3_sides(a: f64, b: f64, opposite: f64) -> f64 {
    ((a * a + b * b - opposite * opposite) / (2. * a * b)).acos()
}

/// Side opposite to angle `theta` between sides `a` and `b`.
pub fn side_from_side_angle_side(a: f64, theta: f64, b: f64) -> f64 {
    (a * a + b * b - 2. * a * b * theta.cos()).sqrt()
}

/// Joint angles of the four-bar loop at a given input angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CouplerOutputAngle {
    /// Angle at the input-coupler joint
    pub input_coupler: f64,
    /// Angle at the output joint
    pub output: f64,
}

impl CouplerOutputAngle {
    /// Return true if the loop can be closed.
    pub fn is_feasible(&self) -> bool {
        !self.input_coupler.is_nan()
    }
}

/// Solve the coupler and output joint angles.
///
/// The diagonal from the output pivot to the input-coupler joint splits the
/// loop into two triangles. Each joint angle is the sum of its two triangle
/// angles on both sides of the diagonal.
///
/// + Fixed link `fixed`
/// + Input link `input`
/// + Coupler link `coupler`
/// + Output link `output`
/// + Input joint angle `input_angle`, measured from the fixed link
pub fn solve_coupler_and_output_angle(
    fixed: f64,
    input: f64,
    coupler: f64,
    output: f64,
    input_angle: f64,
) -> CouplerOutputAngle {
    let diagonal = side_from_side_angle_side(fixed, input_angle, input);
    CouplerOutputAngle {
        input_coupler: angle_from_3_sides(diagonal, input, fixed)
            + angle_from_3_sides(diagonal, coupler, output),
        output: angle_from_3_sides(diagonal, output, coupler)
            + angle_from_3_sides(diagonal, fixed, input),
    }
}

/// Rotate `p` around `pivot` by angle `a`.
pub fn rotate_point_around_point<P: Point>(p: &P, pivot: &P, a: f64) -> P {
    p.rotate_around(pivot, a)
}
