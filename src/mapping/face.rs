//! Face and subface fills.
use super::fill::compute_fill;
use super::InternalData;
use crate::allocators::FaceAllocator;
use crate::cell::{face_orientation_of, MappingCell};
use crate::error::{check_len, MappingError};
use crate::flags::UpdateFlags;
use crate::quadrature::projector::DataSetDescriptor;
use crate::quadrature::Quadrature;
use crate::reference::ReferenceCell;
use crate::values::FaceValues;
use crate::Real;
use nalgebra::{convert, DefaultAllocator, DimName};

/// Fills `values` for face `face` of `cell`, or for one of its children if `subface` is given.
pub(crate) fn fill_face<T, D, C>(
    cell: &C,
    face: usize,
    subface: Option<usize>,
    quadrature: &impl Quadrature<T, D::FaceDim>,
    data: &mut InternalData<T, D>,
    values: &mut FaceValues<T, D>,
) -> Result<(), MappingError>
where
    T: Real,
    D: ReferenceCell,
    C: MappingCell<T, D>,
    DefaultAllocator: FaceAllocator<T, D>,
{
    if D::dim() == 1 {
        return Err(MappingError::NotImplemented("face values of one-dimensional cells"));
    }

    if face >= D::faces_per_cell() {
        return Err(MappingError::IndexOutOfBounds {
            what: "face",
            index: face,
            bound: D::faces_per_cell(),
        });
    }

    let n_q_points = quadrature.size();
    let orientation = face_orientation_of(cell, face);
    let (descriptor, area_ratio) = match subface {
        None => (DataSetDescriptor::face::<D>(face, orientation, n_q_points)?, T::one()),
        Some(subface) => {
            let case = cell.subface_case(face);
            let descriptor = DataSetDescriptor::subface::<D>(face, subface, orientation, case, n_q_points)?;
            (descriptor, convert(case.subface_ratio(D::FaceDim::dim())))
        }
    };

    compute_fill_face(
        cell,
        face,
        n_q_points,
        descriptor.offset(),
        quadrature.weights(),
        area_ratio,
        data,
        values,
    )
}

/// Computes the face quantities from the Jacobians at the points of the given data set.
///
/// `area_ratio` scales the integration weights of a subface relative to its parent face.
#[allow(clippy::too_many_arguments)]
fn compute_fill_face<T, D, C>(
    cell: &C,
    face: usize,
    n_q_points: usize,
    offset: usize,
    weights: &[T],
    area_ratio: T,
    data: &mut InternalData<T, D>,
    values: &mut FaceValues<T, D>,
) -> Result<(), MappingError>
where
    T: Real,
    D: ReferenceCell,
    C: MappingCell<T, D>,
    DefaultAllocator: FaceAllocator<T, D>,
{
    use UpdateFlags as F;
    compute_fill(cell, n_q_points, offset, data, &mut values.quadrature_points)?;

    let flags = data.current_update_flags();
    let d = D::dim();

    if flags.contains(F::BOUNDARY_FORMS) {
        check_len("boundary_forms", &values.boundary_forms, n_q_points)?;
        if flags.contains(F::NORMAL_VECTORS) {
            check_len("normal_vectors", &values.normal_vectors, n_q_points)?;
        }
        if flags.contains(F::JXW_VALUES) {
            check_len("JxW_values", &values.jxw_values, n_q_points)?;
        }
        check_len("aux", &data.aux, (d - 1) * n_q_points)?;

        let faces = D::faces_per_cell();
        for point in 0..n_q_points {
            for j in 0..d - 1 {
                let tangential = &data.unit_tangentials[j * faces + face];
                data.aux[point * (d - 1) + j] = &data.contravariant[point] * tangential;
            }
        }

        for (point, form) in values.boundary_forms.iter_mut().enumerate() {
            let tangentials = &data.aux[point * (d - 1)..(point + 1) * (d - 1)];
            *form = D::boundary_form(tangentials).ok_or(MappingError::NotImplemented(
                "boundary forms of one-dimensional cells",
            ))?;
        }

        if flags.intersects(F::JXW_VALUES | F::NORMAL_VECTORS) {
            for point in 0..n_q_points {
                let form = &values.boundary_forms[point];
                let norm = form.norm();
                if flags.contains(F::JXW_VALUES) {
                    values.jxw_values[point] = norm * weights[point] * area_ratio;
                }
                if flags.contains(F::NORMAL_VECTORS) {
                    values.normal_vectors[point] = form / norm;
                }
            }
        }
    }

    if flags.contains(F::CELL_JXW_VALUES) {
        if !flags.contains(F::CONTRAVARIANT_TRANSFORMATION) {
            return Err(MappingError::UninitializedField("contravariant_transformation"));
        }
        check_len("cell_JxW_values", &values.cell_jxw_values, n_q_points)?;
        check_len("contravariant", &data.contravariant, n_q_points)?;
        check_len("weights", weights, n_q_points)?;
        for point in 0..n_q_points {
            values.cell_jxw_values[point] = data.contravariant[point].determinant() * weights[point];
        }
    }

    Ok(())
}
