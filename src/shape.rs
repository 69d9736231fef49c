//! The Q1 shape functions of the mapping.
//!
//! Shape function `k` is the tensor product of one-dimensional linear functions: along axis `i`
//! it is `x_i` if bit `i` of `k` is set and `1 - x_i` otherwise, so that it is one at reference
//! vertex `k` and zero at all other vertices.
use crate::allocators::DimAllocator;
use crate::{Real, SmallDim};
use nalgebra::{DefaultAllocator, OMatrix, OPoint, OVector};
use numeric_literals::replace_float_literals;

/// Number of Q1 shape functions in dimension `D`.
pub fn n_shape_functions<D: SmallDim>() -> usize {
    1 << D::dim()
}

#[replace_float_literals(T::from_f64(literal).unwrap())]
#[inline]
fn phi_linear_1d<T: Real>(upper: bool, x: T) -> T {
    if upper {
        x
    } else {
        1.0 - x
    }
}

#[replace_float_literals(T::from_f64(literal).unwrap())]
#[inline]
fn phi_linear_1d_grad<T: Real>(upper: bool) -> T {
    if upper {
        1.0
    } else {
        -1.0
    }
}

#[inline]
fn is_upper(k: usize, axis: usize) -> bool {
    k & (1 << axis) != 0
}

/// Product of the one-dimensional factors of shape function `k` over all axes not in `skip`.
fn product_except<T, D>(k: usize, xi: &OPoint<T, D>, skip: &[usize]) -> T
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    (0..D::dim())
        .filter(|i| !skip.contains(i))
        .fold(T::one(), |acc, i| acc * phi_linear_1d(is_upper(k, i), xi[i]))
}

/// Value of shape function `k` at `xi`.
pub fn value<T, D>(k: usize, xi: &OPoint<T, D>) -> T
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    product_except(k, xi, &[])
}

/// Gradient of shape function `k` at `xi` with respect to the reference coordinates.
pub fn gradient<T, D>(k: usize, xi: &OPoint<T, D>) -> OVector<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    OVector::<T, D>::from_fn(|j, _| phi_linear_1d_grad::<T>(is_upper(k, j)) * product_except(k, xi, &[j]))
}

/// Second derivatives of shape function `k` at `xi`.
///
/// The diagonal vanishes, since each shape function is linear along every axis.
pub fn hessian<T, D>(k: usize, xi: &OPoint<T, D>) -> OMatrix<T, D, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    OMatrix::<T, D, D>::from_fn(|j, l| {
        if j == l {
            T::zero()
        } else {
            phi_linear_1d_grad::<T>(is_upper(k, j))
                * phi_linear_1d_grad::<T>(is_upper(k, l))
                * product_except(k, xi, &[j, l])
        }
    })
}

/// Evaluates all shape functions at all given points.
///
/// Each buffer is either empty, in which case it is left untouched, or holds
/// `points.len() * n_shape_functions::<D>()` entries. Entry `q * n + k` belongs to point `q`
/// and shape function `k`.
///
/// # Panics
///
/// Panics if a non-empty buffer has the wrong length.
pub fn compute_shapes<T, D>(
    points: &[OPoint<T, D>],
    values: &mut [T],
    gradients: &mut [OVector<T, D>],
    hessians: &mut [OMatrix<T, D, D>],
) where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    let n = n_shape_functions::<D>();
    let expected = n * points.len();
    for (name, len) in [
        ("values", values.len()),
        ("gradients", gradients.len()),
        ("hessians", hessians.len()),
    ] {
        assert!(
            len == 0 || len == expected,
            "Shape {} buffer must be empty or hold {} entries, but holds {}",
            name,
            expected,
            len
        );
    }

    for (q, xi) in points.iter().enumerate() {
        for k in 0..n {
            if !values.is_empty() {
                values[q * n + k] = value(k, xi);
            }
            if !gradients.is_empty() {
                gradients[q * n + k] = gradient(k, xi);
            }
            if !hessians.is_empty() {
                hessians[q * n + k] = hessian(k, xi);
            }
        }
    }
}
