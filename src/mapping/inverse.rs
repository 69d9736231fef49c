//! Forward and inverse evaluation of the mapping at single points.
use super::{InternalData, Mapping, MappingQ1};
use crate::allocators::FaceAllocator;
use crate::cell::MappingCell;
use crate::error::MappingError;
use crate::flags::UpdateFlags;
use crate::optimize::calculus::{DifferentiableVectorFunction, VectorFunction};
use crate::optimize::newton::{newton, NewtonError, NewtonSettings};
use crate::quadrature::single_point;
use crate::reference::ReferenceCell;
use crate::Real;
use log::warn;
use nalgebra::{convert, DVector, DVectorView, DVectorViewMut, DefaultAllocator, OMatrix, OPoint, OVector};
use serde::{Deserialize, Serialize};
use std::error::Error;

/// Controls the Newton iteration of the inverse mapping.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct InverseMappingSettings {
    /// Maximum number of Newton updates.
    pub max_iterations: usize,
    /// The iteration stops once `|F(xi) - x| <= tolerance_factor * diameter(cell)`.
    pub tolerance_factor: f64,
}

impl Default for InverseMappingSettings {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            tolerance_factor: 1e-15,
        }
    }
}

/// Result of [`MappingQ1::transform_real_to_unit_cell_with`].
///
/// If the iteration did not converge within the allowed number of iterations, `point` holds the
/// last estimate and `residual_norm` its distance from the target in physical space.
#[derive(Debug, Clone, PartialEq)]
pub struct InverseMapping<T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    pub point: OPoint<T, D>,
    pub residual_norm: T,
    pub iterations: usize,
    pub converged: bool,
}

/// Evaluates the forward map at the single point `data` was built for.
fn map_single_point<T, D>(data: &InternalData<T, D>) -> OPoint<T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    let mut x = OPoint::<T, D>::origin();
    for (k, support) in data.mapping_support_points().iter().enumerate() {
        x.coords.axpy(data.shape(0, k), &support.coords, T::one());
    }
    x
}

fn single_point_jacobian<T, D>(data: &InternalData<T, D>) -> OMatrix<T, D, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    let mut jacobian = OMatrix::<T, D, D>::zeros();
    for (k, support) in data.mapping_support_points().iter().enumerate() {
        jacobian.ger(T::one(), &support.coords, data.derivative(0, k), T::one());
    }
    jacobian
}

pub(crate) fn unit_to_real<T, D, C>(mapping: &MappingQ1, cell: &C, p: &OPoint<T, D>) -> OPoint<T, D>
where
    T: Real,
    D: ReferenceCell,
    C: MappingCell<T, D>,
    DefaultAllocator: FaceAllocator<T, D>,
{
    let quadrature = single_point(p.clone());
    let mut data = <MappingQ1 as Mapping<T, D>>::get_data(mapping, UpdateFlags::TRANSFORMATION_VALUES, &quadrature);
    data.ensure_support_points(cell);
    map_single_point(&data)
}

/// The residual `F(xi) = T(xi) - x` of the forward map `T` with respect to a target point `x`.
struct ForwardMapResidual<'a, T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    data: &'a mut InternalData<T, D>,
    target: &'a OPoint<T, D>,
    /// The point the shape arrays of `data` are currently evaluated at.
    current: OPoint<T, D>,
}

impl<'a, T, D> ForwardMapResidual<'a, T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    fn move_to(&mut self, x: &DVectorView<T>) {
        let xi = OPoint::from(OVector::<T, D>::from_iterator(x.iter().copied()));
        if xi != self.current {
            self.data.compute_shapes_at(std::slice::from_ref(&xi));
            self.current = xi;
        }
    }
}

impl<'a, T, D> VectorFunction<T> for ForwardMapResidual<'a, T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    fn dimension(&self) -> usize {
        D::dim()
    }

    fn eval_into(&mut self, f: &mut DVectorViewMut<T>, x: &DVectorView<T>) {
        self.move_to(x);
        let mapped = map_single_point(self.data);
        for i in 0..D::dim() {
            f[i] = mapped[i] - self.target[i];
        }
    }
}

impl<'a, T, D> DifferentiableVectorFunction<T> for ForwardMapResidual<'a, T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    fn solve_jacobian_system(
        &mut self,
        sol: &mut DVectorViewMut<T>,
        x: &DVectorView<T>,
        rhs: &DVectorView<T>,
    ) -> Result<(), Box<dyn Error>> {
        self.move_to(x);
        let inverse = single_point_jacobian(self.data)
            .try_inverse()
            .ok_or(MappingError::SingularJacobian { point: 0 })?;
        let rhs = OVector::<T, D>::from_iterator(rhs.iter().copied());
        let solution = inverse * rhs;
        for i in 0..D::dim() {
            sol[i] = solution[i];
        }
        Ok(())
    }
}

impl MappingQ1 {
    /// Finds the reference point that `cell` maps to `p`, reporting how the iteration ended.
    ///
    /// Starts from the center of the reference cell and performs full Newton steps. Points
    /// outside the cell are mapped to points outside the reference cell, as long as the
    /// iteration converges.
    pub fn transform_real_to_unit_cell_with<T, D, C>(
        &self,
        cell: &C,
        p: &OPoint<T, D>,
        settings: &InverseMappingSettings,
    ) -> Result<InverseMapping<T, D>, MappingError>
    where
        T: Real,
        D: ReferenceCell,
        C: MappingCell<T, D>,
        DefaultAllocator: FaceAllocator<T, D>,
    {
        let center = OPoint::from(OVector::<T, D>::repeat(convert(0.5)));
        let quadrature = single_point(center.clone());
        let mut data = <Self as Mapping<T, D>>::get_data(
            self,
            UpdateFlags::TRANSFORMATION_VALUES | UpdateFlags::TRANSFORMATION_GRADIENTS,
            &quadrature,
        );
        data.ensure_support_points(cell);

        let mut xi = DVector::from_iterator(D::dim(), center.coords.iter().copied());
        let mut f = DVector::zeros(D::dim());
        let mut dx = DVector::zeros(D::dim());

        let newton_settings = NewtonSettings {
            max_iterations: Some(settings.max_iterations),
            tolerance: convert::<f64, T>(settings.tolerance_factor) * cell.diameter(),
        };
        let residual = ForwardMapResidual {
            data: &mut data,
            target: p,
            current: center,
        };

        let outcome = newton(residual, &mut xi, &mut f, &mut dx, newton_settings).map_err(|err| match err {
            NewtonError::JacobianError(err) => match err.downcast::<MappingError>() {
                Ok(err) => *err,
                Err(err) => MappingError::InverseMapping(err.to_string()),
            },
            err => MappingError::InverseMapping(err.to_string()),
        })?;

        if !outcome.converged {
            warn!(
                "Inverse mapping of {:?} did not converge after {} iterations (residual {})",
                p, outcome.iterations, outcome.residual_norm
            );
        }

        Ok(InverseMapping {
            point: OPoint::from(OVector::<T, D>::from_iterator(xi.iter().copied())),
            residual_norm: outcome.residual_norm,
            iterations: outcome.iterations,
            converged: outcome.converged,
        })
    }
}
