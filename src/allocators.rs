//! Helper traits for allocator trait bounds.
use crate::reference::ReferenceCell;
use nalgebra::{DefaultAllocator, Scalar};

/// Allocator bounds for a cell dimension together with its face dimension.
pub trait FaceAllocator<T, D>: BiDimAllocator<T, D, D::FaceDim>
where
    T: Scalar,
    D: ReferenceCell,
{
}

impl<T, D> FaceAllocator<T, D> for DefaultAllocator
where
    T: Scalar,
    D: ReferenceCell,
    DefaultAllocator: BiDimAllocator<T, D, D::FaceDim>,
{
}

pub use q1map_traits::allocators::*;
