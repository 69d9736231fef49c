//! Quadrature rules on the reference hypercube and its faces.
use crate::allocators::DimAllocator;
use crate::nalgebra::{convert, U1, U2, U3};
use crate::{Real, SmallDim};
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, OPoint, OVector, Scalar};
use num::Zero;
use std::ops::{AddAssign, Mul};

pub mod projector;
pub mod tensor;
pub mod univariate;

pub type QuadraturePair<T, D> = (Vec<T>, Vec<OPoint<T, D>>);
pub type QuadraturePair1d<T> = QuadraturePair<T, U1>;
pub type QuadraturePair2d<T> = QuadraturePair<T, U2>;
pub type QuadraturePair3d<T> = QuadraturePair<T, U3>;

/// A quadrature rule consisting of weights and points on a reference domain.
pub trait Quadrature<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    fn weights(&self) -> &[T];
    fn points(&self) -> &[OPoint<T, D>];

    /// The number of quadrature points.
    fn size(&self) -> usize {
        self.points().len()
    }

    /// Approximates the integral of the given function using this quadrature rule.
    fn integrate<U, Function>(&self, f: Function) -> U
    where
        Function: Fn(&OPoint<T, D>) -> U,
        U: Zero + Mul<T, Output = U> + AddAssign<U>,
    {
        let mut integral = U::zero();
        for (w, p) in self.weights().iter().zip(self.points()) {
            integral += f(p) * w.clone();
        }
        integral
    }
}

impl<T, D, A, B> Quadrature<T, D> for (A, B)
where
    T: Scalar,
    D: DimName,
    A: AsRef<[T]>,
    B: AsRef<[OPoint<T, D>]>,
    DefaultAllocator: Allocator<T, D>,
{
    fn weights(&self) -> &[T] {
        self.0.as_ref()
    }

    fn points(&self) -> &[OPoint<T, D>] {
        self.1.as_ref()
    }
}

impl<T, D, X> Quadrature<T, D> for &X
where
    T: Scalar,
    D: DimName,
    X: Quadrature<T, D>,
    DefaultAllocator: Allocator<T, D>,
{
    fn weights(&self) -> &[T] {
        X::weights(self)
    }

    fn points(&self) -> &[OPoint<T, D>] {
        X::points(self)
    }
}

/// A rule with the single given point and unit weight.
///
/// Used to evaluate the mapping at an arbitrary reference point.
pub fn single_point<T, D>(point: OPoint<T, D>) -> QuadraturePair<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    (vec![T::one()], vec![point])
}

/// The tensor-product Gauss rule with `num_points_per_dim` points per axis on `[0, 1]^D`.
///
/// The first coordinate varies fastest. For `D = 0` the rule consists of a single point with
/// unit weight, which is the rule used on the faces of one-dimensional cells.
///
/// # Panics
///
/// Panics if `D` is larger than 3.
pub fn hypercube_gauss<T, D>(num_points_per_dim: usize) -> QuadraturePair<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    use q1map_quadrature::tensor as rules;
    let n = num_points_per_dim;
    match D::dim() {
        0 => convert_quadrature_rule_from_f64(rules::hypercube_gauss::<0>(n)),
        1 => convert_quadrature_rule_from_f64(rules::hypercube_gauss::<1>(n)),
        2 => convert_quadrature_rule_from_f64(rules::hypercube_gauss::<2>(n)),
        3 => convert_quadrature_rule_from_f64(rules::hypercube_gauss::<3>(n)),
        d => panic!("tensor Gauss rules are only available up to dimension 3, got {d}"),
    }
}

/// Converts an `f64` rule of dimension `N` into `nalgebra` points of dimension `D`.
///
/// `N` must equal `D::dim()`.
fn convert_quadrature_rule_from_f64<T, D, const N: usize>(
    quadrature: q1map_quadrature::Rule<N>,
) -> QuadraturePair<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    debug_assert_eq!(N, D::dim());
    let (weights, points) = quadrature;
    let weights = weights.into_iter().map(convert).collect();
    let points = points
        .into_iter()
        .map(|p| OPoint::from(OVector::<T, D>::from_iterator(p.into_iter().map(convert))))
        .collect();
    (weights, points)
}
