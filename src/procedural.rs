//! Basic procedural cell generation routines.
use crate::allocators::DimAllocator;
use crate::cell::{CellKey, HypercubeCell, MeshId};
use crate::reference::ReferenceCell;
use crate::Real;
use nalgebra::{convert, DefaultAllocator, OPoint, OVector};

/// The cells of a uniform subdivision of `[0, 1]^D` into `cells_per_dim^D` boxes.
///
/// All cells share a freshly generated [`MeshId`]. Cell indices run with the first coordinate
/// varying fastest.
pub fn unit_box_cells<T, D>(cells_per_dim: usize) -> Vec<HypercubeCell<T, D>>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: DimAllocator<T, D>,
{
    let mesh = MeshId::unique();
    let d = D::dim();
    let n_cells = cells_per_dim.pow(d as u32);
    let h = T::one() / convert::<f64, T>(cells_per_dim as f64);

    (0..n_cells)
        .map(|index| {
            let mut remainder = index;
            let mut lower = OVector::<T, D>::zeros();
            for i in 0..d {
                lower[i] = convert::<f64, T>((remainder % cells_per_dim) as f64) * h;
                remainder /= cells_per_dim;
            }
            let upper = lower.add_scalar(h);
            HypercubeCell::from_bounds(CellKey::new(mesh, index), &OPoint::from(lower), &OPoint::from(upper))
        })
        .collect()
}
