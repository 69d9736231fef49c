//! The Q1 mapping from the reference hypercube to a physical cell.
use crate::allocators::FaceAllocator;
use crate::cell::MappingCell;
use crate::error::MappingError;
use crate::flags::{update_each, update_once, UpdateFlags};
use crate::quadrature::projector::{project_to_all_faces, project_to_all_subfaces};
use crate::quadrature::Quadrature;
use crate::reference::ReferenceCell;
use crate::shape::n_shape_functions;
use crate::values::{CellValues, FaceValues};
use crate::Real;
use nalgebra::{DefaultAllocator, OMatrix, OPoint, OVector};

mod data;
mod face;
mod fill;
mod inverse;
mod transform;

pub use data::InternalData;
pub use inverse::{InverseMapping, InverseMappingSettings};

/// A geometric mapping from a reference cell of dimension `D` to physical cells.
///
/// The mapping keeps no per-cell state itself. Everything that depends on the quadrature rule
/// or on the current cell lives in [`Mapping::InternalData`], which is obtained from one of the
/// `get_*data` methods and then passed to the fills.
pub trait Mapping<T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    type InternalData;

    /// Builds the cache for cell fills with the given rule.
    fn get_data(&self, update_flags: UpdateFlags, quadrature: &impl Quadrature<T, D>) -> Self::InternalData;

    /// Builds the cache for face fills with the given face rule.
    fn get_face_data(
        &self,
        update_flags: UpdateFlags,
        quadrature: &impl Quadrature<T, D::FaceDim>,
    ) -> Self::InternalData;

    /// Builds the cache for subface fills with the given face rule.
    fn get_subface_data(
        &self,
        update_flags: UpdateFlags,
        quadrature: &impl Quadrature<T, D::FaceDim>,
    ) -> Self::InternalData;

    fn fill_fe_values<C>(
        &self,
        cell: &C,
        quadrature: &impl Quadrature<T, D>,
        data: &mut Self::InternalData,
        values: &mut CellValues<T, D>,
    ) -> Result<(), MappingError>
    where
        C: MappingCell<T, D>;

    fn fill_fe_face_values<C>(
        &self,
        cell: &C,
        face: usize,
        quadrature: &impl Quadrature<T, D::FaceDim>,
        data: &mut Self::InternalData,
        values: &mut FaceValues<T, D>,
    ) -> Result<(), MappingError>
    where
        C: MappingCell<T, D>;

    fn fill_fe_subface_values<C>(
        &self,
        cell: &C,
        face: usize,
        subface: usize,
        quadrature: &impl Quadrature<T, D::FaceDim>,
        data: &mut Self::InternalData,
        values: &mut FaceValues<T, D>,
    ) -> Result<(), MappingError>
    where
        C: MappingCell<T, D>;

    /// Maps a point of the reference cell to the physical cell.
    fn transform_unit_to_real_cell<C>(&self, cell: &C, p: &OPoint<T, D>) -> Result<OPoint<T, D>, MappingError>
    where
        C: MappingCell<T, D>;

    /// Finds the reference point that is mapped to the given physical point.
    fn transform_real_to_unit_cell<C>(&self, cell: &C, p: &OPoint<T, D>) -> Result<OPoint<T, D>, MappingError>
    where
        C: MappingCell<T, D>;

    /// Computes `output[i] = C_i input[i + offset]` with `C_i` the inverse transposed Jacobian at
    /// point `i` of the last fill.
    fn transform_covariant(
        &self,
        input: &[OVector<T, D>],
        offset: usize,
        output: &mut [OVector<T, D>],
        data: &Self::InternalData,
    ) -> Result<(), MappingError>;

    /// Computes `output[i] = input[i + offset] C_i^T`.
    fn transform_covariant_tensors(
        &self,
        input: &[OMatrix<T, D, D>],
        offset: usize,
        output: &mut [OMatrix<T, D, D>],
        data: &Self::InternalData,
    ) -> Result<(), MappingError>;

    /// Computes `output[i] = J_i input[i + offset]` with `J_i` the Jacobian at point `i` of the
    /// last fill.
    fn transform_contravariant(
        &self,
        input: &[OVector<T, D>],
        offset: usize,
        output: &mut [OVector<T, D>],
        data: &Self::InternalData,
    ) -> Result<(), MappingError>;

    /// Computes `output[i] = J_i input[i + offset]` for rank-2 tensors.
    fn transform_contravariant_tensors(
        &self,
        input: &[OMatrix<T, D, D>],
        offset: usize,
        output: &mut [OMatrix<T, D, D>],
        data: &Self::InternalData,
    ) -> Result<(), MappingError>;
}

/// The bilinear (2D) or trilinear (3D) mapping defined by the vertices of a cell.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct MappingQ1;

impl MappingQ1 {
    pub fn new() -> Self {
        Self
    }

    /// Sizes the buffers of `data` for `flags` and evaluates the shape functions at the
    /// points of `quadrature`.
    ///
    /// `n_original_q_points` is the number of points filled at a time. It is smaller than the
    /// size of `quadrature` when the rule holds the lifted points of all faces.
    fn compute_data<T, D>(
        &self,
        flags: UpdateFlags,
        quadrature: &impl Quadrature<T, D>,
        n_original_q_points: usize,
    ) -> InternalData<T, D>
    where
        T: Real,
        D: ReferenceCell,
        DefaultAllocator: FaceAllocator<T, D>,
    {
        use UpdateFlags as F;
        let n_shape = n_shape_functions::<D>();
        let n_q_points = quadrature.size();
        let mut data = InternalData::new(n_shape);
        data.set_flags(update_once(flags), update_each(flags));
        let all = data.update_flags();

        if all.contains(F::TRANSFORMATION_VALUES) {
            data.shape_values = vec![T::zero(); n_shape * n_q_points];
        }
        if all.contains(F::TRANSFORMATION_GRADIENTS) {
            data.shape_derivatives = vec![OVector::<T, D>::zeros(); n_shape * n_q_points];
        }
        if all.contains(F::COVARIANT_TRANSFORMATION) {
            data.covariant = vec![OMatrix::<T, D, D>::zeros(); n_original_q_points];
        }
        if all.contains(F::CONTRAVARIANT_TRANSFORMATION) {
            data.contravariant = vec![OMatrix::<T, D, D>::zeros(); n_original_q_points];
        }
        if all.contains(F::JACOBIAN_GRADS) {
            data.shape_second_derivatives = vec![OMatrix::<T, D, D>::zeros(); n_shape * n_q_points];
        }

        data.compute_shapes_at(quadrature.points());
        data
    }

    /// Like [`compute_data`](Self::compute_data), plus the face tangentials needed for boundary
    /// forms.
    fn compute_face_data<T, D>(
        &self,
        flags: UpdateFlags,
        quadrature: &impl Quadrature<T, D>,
        n_original_q_points: usize,
    ) -> InternalData<T, D>
    where
        T: Real,
        D: ReferenceCell,
        DefaultAllocator: FaceAllocator<T, D>,
    {
        let mut data = self.compute_data(flags, quadrature, n_original_q_points);
        if data.update_flags().contains(UpdateFlags::BOUNDARY_FORMS) && D::dim() > 1 {
            data.aux = vec![OVector::<T, D>::zeros(); (D::dim() - 1) * n_original_q_points];
            data.unit_tangentials = D::unit_tangentials();
        }
        data
    }
}

impl<T, D> Mapping<T, D> for MappingQ1
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    type InternalData = InternalData<T, D>;

    fn get_data(&self, update_flags: UpdateFlags, quadrature: &impl Quadrature<T, D>) -> Self::InternalData {
        self.compute_data(update_flags, quadrature, quadrature.size())
    }

    fn get_face_data(
        &self,
        update_flags: UpdateFlags,
        quadrature: &impl Quadrature<T, D::FaceDim>,
    ) -> Self::InternalData {
        let projected = project_to_all_faces::<T, D>(quadrature);
        self.compute_face_data(update_flags, &projected, quadrature.size())
    }

    fn get_subface_data(
        &self,
        update_flags: UpdateFlags,
        quadrature: &impl Quadrature<T, D::FaceDim>,
    ) -> Self::InternalData {
        let projected = project_to_all_subfaces::<T, D>(quadrature);
        self.compute_face_data(update_flags, &projected, quadrature.size())
    }

    fn fill_fe_values<C>(
        &self,
        cell: &C,
        quadrature: &impl Quadrature<T, D>,
        data: &mut Self::InternalData,
        values: &mut CellValues<T, D>,
    ) -> Result<(), MappingError>
    where
        C: MappingCell<T, D>,
    {
        fill::fill_cell(cell, quadrature, data, values)
    }

    fn fill_fe_face_values<C>(
        &self,
        cell: &C,
        face: usize,
        quadrature: &impl Quadrature<T, D::FaceDim>,
        data: &mut Self::InternalData,
        values: &mut FaceValues<T, D>,
    ) -> Result<(), MappingError>
    where
        C: MappingCell<T, D>,
    {
        face::fill_face(cell, face, None, quadrature, data, values)
    }

    fn fill_fe_subface_values<C>(
        &self,
        cell: &C,
        face: usize,
        subface: usize,
        quadrature: &impl Quadrature<T, D::FaceDim>,
        data: &mut Self::InternalData,
        values: &mut FaceValues<T, D>,
    ) -> Result<(), MappingError>
    where
        C: MappingCell<T, D>,
    {
        face::fill_face(cell, face, Some(subface), quadrature, data, values)
    }

    fn transform_unit_to_real_cell<C>(&self, cell: &C, p: &OPoint<T, D>) -> Result<OPoint<T, D>, MappingError>
    where
        C: MappingCell<T, D>,
    {
        Ok(inverse::unit_to_real(self, cell, p))
    }

    fn transform_real_to_unit_cell<C>(&self, cell: &C, p: &OPoint<T, D>) -> Result<OPoint<T, D>, MappingError>
    where
        C: MappingCell<T, D>,
    {
        self.transform_real_to_unit_cell_with(cell, p, &InverseMappingSettings::default())
            .map(|result| result.point)
    }

    fn transform_covariant(
        &self,
        input: &[OVector<T, D>],
        offset: usize,
        output: &mut [OVector<T, D>],
        data: &Self::InternalData,
    ) -> Result<(), MappingError> {
        transform::apply_covariant(input, offset, output, data, |c, v| c * v)
    }

    fn transform_covariant_tensors(
        &self,
        input: &[OMatrix<T, D, D>],
        offset: usize,
        output: &mut [OMatrix<T, D, D>],
        data: &Self::InternalData,
    ) -> Result<(), MappingError> {
        transform::apply_covariant(input, offset, output, data, |c, t| t * c.transpose())
    }

    fn transform_contravariant(
        &self,
        input: &[OVector<T, D>],
        offset: usize,
        output: &mut [OVector<T, D>],
        data: &Self::InternalData,
    ) -> Result<(), MappingError> {
        transform::apply_contravariant(input, offset, output, data, |j, v| j * v)
    }

    fn transform_contravariant_tensors(
        &self,
        input: &[OMatrix<T, D, D>],
        offset: usize,
        output: &mut [OMatrix<T, D, D>],
        data: &Self::InternalData,
    ) -> Result<(), MappingError> {
        transform::apply_contravariant(input, offset, output, data, |j, t| j * t)
    }
}
