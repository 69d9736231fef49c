//! Errors reported by the mapping.
use thiserror::Error;

/// Errors returned by fills, transforms and the inverse mapping.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// An output buffer does not have the length required by the requested update flags.
    #[error("Dimension mismatch for `{field}`: expected {expected} entries, got {actual}")]
    DimensionMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    /// The quantity was not requested when the internal data was built.
    #[error("Access to uninitialized field `{0}`: it was not requested in the update flags")]
    UninitializedField(&'static str),
    /// The operation does not exist for the given dimension.
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
    /// The Jacobian of the mapping cannot be inverted.
    #[error("Singular Jacobian at quadrature point {point}")]
    SingularJacobian { point: usize },
    /// A face, subface or quadrature point index is outside the valid range.
    #[error("Index {index} for {what} is out of bounds (must be less than {bound})")]
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        bound: usize,
    },
    /// The Newton iteration of the inverse mapping broke down.
    #[error("Inverse mapping failed: {0}")]
    InverseMapping(String),
}

/// Checks that `buffer` has `expected` entries.
pub(crate) fn check_len<X>(field: &'static str, buffer: &[X], expected: usize) -> Result<(), MappingError> {
    if buffer.len() == expected {
        Ok(())
    } else {
        Err(MappingError::DimensionMismatch {
            field,
            expected,
            actual: buffer.len(),
        })
    }
}
