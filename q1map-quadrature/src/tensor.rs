//! Rules on `[0, 1]^D` formed as tensor products of the univariate Gauss rule.
//!
//! The first coordinate varies fastest, matching the lexicographic ordering of the Q1 vertices.

use crate::univariate::gauss;
use crate::{Point, Rule};

/// A Gauss rule on the unit hypercube with `num_points_per_dim` points along each axis.
///
/// For `D == 0` this is the single-point rule with weight 1, which is what a face rule of a
/// one-dimensional cell looks like.
pub fn hypercube_gauss<const D: usize>(num_points_per_dim: usize) -> Rule<D> {
    let (weights1d, points1d) = gauss(num_points_per_dim);
    let n = num_points_per_dim;
    let total = n.pow(D as u32);

    let mut weights = Vec::with_capacity(total);
    let mut points = Vec::with_capacity(total);
    for flat in 0..total {
        let mut w = 1.0;
        let mut p: Point<D> = [0.0; D];
        let mut rest = flat;
        for coord in p.iter_mut() {
            let i = rest % n;
            rest /= n;
            w *= weights1d[i];
            *coord = points1d[i][0];
        }
        weights.push(w);
        points.push(p);
    }

    (weights, points)
}

/// A Gauss rule for the unit square.
pub fn quadrilateral_gauss(num_points_per_dim: usize) -> Rule<2> {
    hypercube_gauss(num_points_per_dim)
}

/// A Gauss rule for the unit cube.
pub fn hexahedron_gauss(num_points_per_dim: usize) -> Rule<3> {
    hypercube_gauss(num_points_per_dim)
}
