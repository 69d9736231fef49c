//! Push-forward of vector and tensor fields with the Jacobians of the last fill.
use super::InternalData;
use crate::allocators::FaceAllocator;
use crate::error::MappingError;
use crate::flags::UpdateFlags;
use crate::reference::ReferenceCell;
use crate::Real;
use nalgebra::{DefaultAllocator, OMatrix};

fn check_ranges<X, Y>(input: &[X], offset: usize, output: &[Y], tensors: usize) -> Result<(), MappingError> {
    if output.len() + offset > input.len() {
        return Err(MappingError::DimensionMismatch {
            field: "input",
            expected: output.len() + offset,
            actual: input.len(),
        });
    }
    if output.len() > tensors {
        return Err(MappingError::DimensionMismatch {
            field: "output",
            expected: tensors,
            actual: output.len(),
        });
    }
    Ok(())
}

fn apply<T, D, X>(
    input: &[X],
    offset: usize,
    output: &mut [X],
    tensors: &[OMatrix<T, D, D>],
    op: impl Fn(&OMatrix<T, D, D>, &X) -> X,
) -> Result<(), MappingError>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    check_ranges(input, offset, output, tensors.len())?;
    for (i, out) in output.iter_mut().enumerate() {
        *out = op(&tensors[i], &input[i + offset]);
    }
    Ok(())
}

pub(crate) fn apply_covariant<T, D, X>(
    input: &[X],
    offset: usize,
    output: &mut [X],
    data: &InternalData<T, D>,
    op: impl Fn(&OMatrix<T, D, D>, &X) -> X,
) -> Result<(), MappingError>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    if !data.update_flags().contains(UpdateFlags::COVARIANT_TRANSFORMATION) {
        return Err(MappingError::UninitializedField("covariant_transformation"));
    }
    apply(input, offset, output, data.covariant(), op)
}

pub(crate) fn apply_contravariant<T, D, X>(
    input: &[X],
    offset: usize,
    output: &mut [X],
    data: &InternalData<T, D>,
    op: impl Fn(&OMatrix<T, D, D>, &X) -> X,
) -> Result<(), MappingError>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    if !data.update_flags().contains(UpdateFlags::CONTRAVARIANT_TRANSFORMATION) {
        return Err(MappingError::UninitializedField("contravariant_transformation"));
    }
    apply(input, offset, output, data.contravariant(), op)
}
