//! Quadrature rules for the unit interval.
use crate::quadrature::{convert_quadrature_rule_from_f64, QuadraturePair1d};
use crate::Real;
use q1map_quadrature::univariate;

/// Gauss-Legendre rule with `num_points` points on `[0, 1]`.
pub fn gauss<T: Real>(num_points: usize) -> QuadraturePair1d<T> {
    let (weights, points) = univariate::gauss(num_points);
    convert_quadrature_rule_from_f64((weights, points))
}
