//! Cell fills.
use super::InternalData;
use crate::allocators::FaceAllocator;
use crate::cell::MappingCell;
use crate::error::{check_len, MappingError};
use crate::flags::UpdateFlags;
use crate::quadrature::Quadrature;
use crate::reference::ReferenceCell;
use crate::values::CellValues;
use crate::Real;
use itertools::izip;
use nalgebra::{DefaultAllocator, OMatrix, OPoint};

/// Checks that the shape arrays cover points `offset..offset + n_q_points`.
fn check_shape_range<T, D>(
    data: &InternalData<T, D>,
    flags: UpdateFlags,
    n_q_points: usize,
    offset: usize,
) -> Result<(), MappingError>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    let n = data.n_shape_functions();
    let end = offset + n_q_points;
    let available = if flags.contains(UpdateFlags::QUADRATURE_POINTS) {
        Some(data.shape_values.len() / n)
    } else if flags.contains(UpdateFlags::CONTRAVARIANT_TRANSFORMATION) {
        Some(data.shape_derivatives.len() / n)
    } else {
        None
    };
    match available {
        Some(available) if end > available && n_q_points > 0 => Err(MappingError::IndexOutOfBounds {
            what: "quadrature point",
            index: end - 1,
            bound: available,
        }),
        _ => Ok(()),
    }
}

/// Computes the quadrature points and Jacobians of `cell` at points
/// `offset..offset + n_q_points` of the rule `data` was built for.
///
/// Jacobians are stored in `data.contravariant` and their inverse transposes in
/// `data.covariant`, both indexed from zero.
pub(crate) fn compute_fill<T, D, C>(
    cell: &C,
    n_q_points: usize,
    offset: usize,
    data: &mut InternalData<T, D>,
    quadrature_points: &mut [OPoint<T, D>],
) -> Result<(), MappingError>
where
    T: Real,
    D: ReferenceCell,
    C: MappingCell<T, D>,
    DefaultAllocator: FaceAllocator<T, D>,
{
    use UpdateFlags as F;
    let flags = data.current_update_flags();

    if flags.contains(F::QUADRATURE_POINTS) {
        check_len("quadrature_points", quadrature_points, n_q_points)?;
    }
    if flags.contains(F::CONTRAVARIANT_TRANSFORMATION) {
        check_len("contravariant", &data.contravariant, n_q_points)?;
    }
    if flags.contains(F::COVARIANT_TRANSFORMATION) {
        check_len("covariant", &data.covariant, n_q_points)?;
    }
    check_shape_range(data, flags, n_q_points, offset)?;

    data.ensure_support_points(cell);
    let n = data.n_shape_functions();

    if flags.contains(F::QUADRATURE_POINTS) {
        for (point, x) in quadrature_points.iter_mut().enumerate() {
            *x = OPoint::origin();
            for (k, support) in data.mapping_support_points().iter().enumerate() {
                x.coords
                    .axpy(data.shape_values[(point + offset) * n + k], &support.coords, T::one());
            }
        }
    }

    if flags.contains(F::CONTRAVARIANT_TRANSFORMATION) {
        for point in 0..n_q_points {
            let mut jacobian = OMatrix::<T, D, D>::zeros();
            for (k, support) in data.mapping_support_points().iter().enumerate() {
                let gradient = &data.shape_derivatives[(point + offset) * n + k];
                jacobian.ger(T::one(), &support.coords, gradient, T::one());
            }
            data.contravariant[point] = jacobian;
        }
    }

    if flags.contains(F::COVARIANT_TRANSFORMATION) {
        for point in 0..n_q_points {
            let inverse = data.contravariant[point]
                .clone()
                .try_inverse()
                .ok_or(MappingError::SingularJacobian { point })?;
            data.covariant[point] = inverse.transpose();
        }
    }

    Ok(())
}

pub(crate) fn fill_cell<T, D, C>(
    cell: &C,
    quadrature: &impl Quadrature<T, D>,
    data: &mut InternalData<T, D>,
    values: &mut CellValues<T, D>,
) -> Result<(), MappingError>
where
    T: Real,
    D: ReferenceCell,
    C: MappingCell<T, D>,
    DefaultAllocator: FaceAllocator<T, D>,
{
    use UpdateFlags as F;
    let n_q_points = quadrature.size();
    let flags = data.current_update_flags();

    compute_fill(cell, n_q_points, 0, data, &mut values.quadrature_points)?;

    if flags.contains(F::JXW_VALUES) {
        check_len("JxW_values", &values.jxw_values, n_q_points)?;
        for (jxw, jacobian, w) in izip!(&mut values.jxw_values, &data.contravariant, quadrature.weights()) {
            *jxw = jacobian.determinant() * *w;
        }
    }

    if flags.contains(F::JACOBIANS) {
        check_len("jacobians", &values.jacobians, n_q_points)?;
        values.jacobians.clone_from_slice(&data.contravariant);
    }

    if flags.contains(F::JACOBIAN_GRADS) {
        check_len("jacobian_grads", &values.jacobian_grads, n_q_points)?;
        for (point, gradient) in values.jacobian_grads.iter_mut().enumerate() {
            for i in 0..D::dim() {
                let component = gradient.component_mut(i);
                component.fill(T::zero());
                for (k, support) in data.mapping_support_points().iter().enumerate() {
                    *component += data.second_derivative(point, k) * support[i];
                }
            }
        }
    }

    if flags.contains(F::INVERSE_JACOBIANS) {
        check_len("inverse_jacobians", &values.inverse_jacobians, n_q_points)?;
        for (inverse, covariant) in values.inverse_jacobians.iter_mut().zip(&data.covariant) {
            *inverse = covariant.transpose();
        }
    }

    Ok(())
}
