//! Quadrature rules for the unit interval `[0, 1]`.

use crate::Rule;
use std::f64::consts::PI;

/// Shifted Legendre polynomial `P~_n(t) = P_n(2t - 1)` evaluated at a point of `(0, 1)`,
/// together with `P~_{n-1}(t)`.
#[derive(Debug, Copy, Clone)]
struct ShiftedLegendre {
    n: usize,
    t: f64,
    value: f64,
    previous: f64,
}

impl ShiftedLegendre {
    fn at(n: usize, t: f64) -> Self {
        // m P~_m = (2m - 1)(2t - 1) P~_{m-1} - (m - 1) P~_{m-2}
        let x = 2.0 * t - 1.0;
        let (mut value, mut previous) = (1.0, 0.0);
        for m in 1..=n {
            let m = m as f64;
            let next = ((2.0 * m - 1.0) * x * value - (m - 1.0) * previous) / m;
            previous = value;
            value = next;
        }
        Self { n, t, value, previous }
    }

    /// The derivative with respect to `t`. Undefined at the end points of the interval.
    fn derivative(&self) -> f64 {
        let n = self.n as f64;
        let t = self.t;
        n * ((2.0 * t - 1.0) * self.value - self.previous) / (2.0 * t * (t - 1.0))
    }
}

/// Refines an estimate of a root of `P~_n` with Newton's method.
fn refine_root(n: usize, mut t: f64) -> (f64, f64) {
    const MAX_ITERATIONS: usize = 100;
    let mut p = ShiftedLegendre::at(n, t);
    for _ in 0..MAX_ITERATIONS {
        let dt = p.value / p.derivative();
        t -= dt;
        p = ShiftedLegendre::at(n, t);
        if dt.abs() <= 5e-16 {
            break;
        }
    }
    (t, p.derivative())
}

/// Gauss quadrature for the unit interval `[0, 1]`.
///
/// Given `n` points, the rule integrates polynomials of order up to `2 n - 1` exactly.
/// Points are returned in increasing order.
///
/// # Panics
///
/// Panics if zero points are requested.
pub fn gauss(num_points: usize) -> Rule<1> {
    let n = num_points;
    assert!(n > 0, "number of points must be positive");

    let mut points: Vec<[f64; 1]> = Vec::with_capacity(n);
    let mut weights = Vec::with_capacity(n);

    // Roots in the lower half, from a Chebyshev-like initial guess
    let lower_half = (n + 1) / 2;
    for i in 0..lower_half {
        let guess = 0.5 * (1.0 - (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos());
        let (t, dp) = refine_root(n, guess);
        points.push([t]);
        weights.push(1.0 / (t * (1.0 - t) * dp * dp));
    }

    // The rule is symmetric about 1/2
    for i in lower_half..n {
        let mirror = n - 1 - i;
        points.push([1.0 - points[mirror][0]]);
        weights.push(weights[mirror]);
    }

    (weights, points)
}
