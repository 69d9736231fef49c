//! Caller-side output buffers for cell and face fills.
use crate::allocators::DimAllocator;
use crate::flags::UpdateFlags;
use crate::{Real, SmallDim};
use nalgebra::{DefaultAllocator, OMatrix, OPoint, OVector};
use std::ops::Index;

/// Derivatives of the Jacobian with respect to the reference coordinates.
///
/// Entry `(i, j, l)` is `d J_ij / d xi_l`.
#[derive(Debug, Clone, PartialEq)]
pub struct JacobianGradient<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    components: Vec<OMatrix<T, D, D>>,
}

impl<T, D> JacobianGradient<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub fn zeros() -> Self {
        Self {
            components: vec![OMatrix::<T, D, D>::zeros(); D::dim()],
        }
    }

    /// The matrix with entries `(j, l) = d J_ij / d xi_l`.
    pub fn component(&self, i: usize) -> &OMatrix<T, D, D> {
        &self.components[i]
    }

    pub(crate) fn component_mut(&mut self, i: usize) -> &mut OMatrix<T, D, D> {
        &mut self.components[i]
    }
}

impl<T, D> Default for JacobianGradient<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    fn default() -> Self {
        Self::zeros()
    }
}

impl<T, D> Index<(usize, usize, usize)> for JacobianGradient<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    type Output = T;

    fn index(&self, (i, j, l): (usize, usize, usize)) -> &T {
        &self.components[i][(j, l)]
    }
}

/// Outputs of a cell fill.
///
/// A buffer is only written if the corresponding flag is part of the resolved update flags, in
/// which case it must hold one entry per quadrature point.
#[derive(Debug, Clone, PartialEq)]
pub struct CellValues<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub quadrature_points: Vec<OPoint<T, D>>,
    pub jxw_values: Vec<T>,
    pub jacobians: Vec<OMatrix<T, D, D>>,
    pub jacobian_grads: Vec<JacobianGradient<T, D>>,
    pub inverse_jacobians: Vec<OMatrix<T, D, D>>,
}

impl<T, D> Default for CellValues<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    fn default() -> Self {
        Self {
            quadrature_points: Vec::new(),
            jxw_values: Vec::new(),
            jacobians: Vec::new(),
            jacobian_grads: Vec::new(),
            inverse_jacobians: Vec::new(),
        }
    }
}

fn sized<X: Clone>(flags: UpdateFlags, flag: UpdateFlags, n: usize, value: X) -> Vec<X> {
    if flags.contains(flag) {
        vec![value; n]
    } else {
        Vec::new()
    }
}

impl<T, D> CellValues<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// Allocates the buffers selected by `flags` for `n_points` quadrature points.
    ///
    /// Pass the resolved flags of the internal data, which may contain more quantities than
    /// were originally requested.
    pub fn for_flags(flags: UpdateFlags, n_points: usize) -> Self {
        use UpdateFlags as F;
        Self {
            quadrature_points: sized(flags, F::QUADRATURE_POINTS, n_points, OPoint::origin()),
            jxw_values: sized(flags, F::JXW_VALUES, n_points, T::zero()),
            jacobians: sized(flags, F::JACOBIANS, n_points, OMatrix::<T, D, D>::zeros()),
            jacobian_grads: sized(flags, F::JACOBIAN_GRADS, n_points, JacobianGradient::zeros()),
            inverse_jacobians: sized(flags, F::INVERSE_JACOBIANS, n_points, OMatrix::<T, D, D>::zeros()),
        }
    }
}

/// Outputs of a face or subface fill.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceValues<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub quadrature_points: Vec<OPoint<T, D>>,
    pub jxw_values: Vec<T>,
    pub boundary_forms: Vec<OVector<T, D>>,
    pub normal_vectors: Vec<OVector<T, D>>,
    pub cell_jxw_values: Vec<T>,
}

impl<T, D> Default for FaceValues<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    fn default() -> Self {
        Self {
            quadrature_points: Vec::new(),
            jxw_values: Vec::new(),
            boundary_forms: Vec::new(),
            normal_vectors: Vec::new(),
            cell_jxw_values: Vec::new(),
        }
    }
}

impl<T, D> FaceValues<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// Allocates the buffers selected by `flags` for `n_points` face quadrature points.
    pub fn for_flags(flags: UpdateFlags, n_points: usize) -> Self {
        use UpdateFlags as F;
        Self {
            quadrature_points: sized(flags, F::QUADRATURE_POINTS, n_points, OPoint::origin()),
            jxw_values: sized(flags, F::JXW_VALUES, n_points, T::zero()),
            boundary_forms: sized(flags, F::BOUNDARY_FORMS, n_points, OVector::<T, D>::zeros()),
            normal_vectors: sized(flags, F::NORMAL_VECTORS, n_points, OVector::<T, D>::zeros()),
            cell_jxw_values: sized(flags, F::CELL_JXW_VALUES, n_points, T::zero()),
        }
    }
}
