//! Helper traits for allocator trait bounds.
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, Scalar, U1};

/// An allocator for a single dimension.
///
/// Covers the vectors, square tensors and row vectors the mapping stores per quadrature point,
/// along with the index storage needed by the LU-based determinant and inverse.
pub trait DimAllocator<T: Scalar, D: DimName>:
    Allocator<T, D>
    + Allocator<T, D, D>
    + Allocator<T, U1, D>
    // Used by decompositions (determinants, inverses)
    + Allocator<usize, D>
    + Allocator<(usize, usize), D>
    + Allocator<f64, D>
    + Allocator<bool, D>
{
}

impl<T, D> DimAllocator<T, D> for DefaultAllocator
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>
        + Allocator<T, D, D>
        + Allocator<T, U1, D>
        + Allocator<usize, D>
        + Allocator<(usize, usize), D>
        + Allocator<f64, D>
        + Allocator<bool, D>,
{
}

/// An allocator for two dimensions.
///
/// Used where a cell dimension and its face dimension appear in the same signature.
pub trait BiDimAllocator<T: Scalar, D1: DimName, D2: DimName>:
    DimAllocator<T, D1> + DimAllocator<T, D2> + Allocator<T, D1, D2> + Allocator<T, D2, D1>
{
}

impl<T: Scalar, D1: DimName, D2: DimName> BiDimAllocator<T, D1, D2> for DefaultAllocator where
    DefaultAllocator: DimAllocator<T, D1> + DimAllocator<T, D2> + Allocator<T, D1, D2> + Allocator<T, D2, D1>
{
}
