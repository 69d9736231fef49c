//! Quadrature rules for the unit hypercube `[0, 1]^D`.
//!
//! The rules are plain `f64` arrays so that they can be used independently of `q1map`. The
//! `q1map` crate converts them into `nalgebra` points of the desired scalar type.

pub mod tensor;
pub mod univariate;

/// A D-dimensional point.
pub type Point<const D: usize> = [f64; D];

/// A D-dimensional rule, stored as `(weights, points)`.
pub type Rule<const D: usize> = (Vec<f64>, Vec<Point<D>>);

/// A one-dimensional rule.
pub type Rule1d = Rule<1>;

/// A two-dimensional rule.
pub type Rule2d = Rule<2>;

/// A three-dimensional rule.
pub type Rule3d = Rule<3>;

/// Approximates the integral of `f` with the given rule.
pub fn integrate<const D: usize>(rule: &Rule<D>, f: impl Fn(&Point<D>) -> f64) -> f64 {
    let (weights, points) = rule;
    weights
        .iter()
        .zip(points)
        .map(|(w, p)| w * f(p))
        .sum()
}
