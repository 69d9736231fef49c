//! Strategies for property-based testing with `proptest`.
use crate::allocators::DimAllocator;
use crate::cell::{CellKey, HypercubeCell, MeshId};
use crate::flags::UpdateFlags;
use crate::reference::ReferenceCell;
use ::proptest::collection::vec;
use ::proptest::prelude::*;
use nalgebra::{DefaultAllocator, OPoint, OVector};

/// Points in the closed reference cell `[0, 1]^D`.
pub fn reference_point<D>() -> impl Strategy<Value = OPoint<f64, D>>
where
    D: ReferenceCell,
    DefaultAllocator: DimAllocator<f64, D>,
{
    vec(0.0..=1.0, D::dim()).prop_map(|coords| OPoint::from(OVector::<f64, D>::from_iterator(coords)))
}

/// Cells with positive Jacobian determinant everywhere in the reference cell.
///
/// Each vertex of the reference cell is displaced by at most `0.1` per coordinate, which keeps
/// every Jacobian close enough to the identity to be invertible. The result is then scaled
/// with positive factors along each axis and translated.
pub fn nondegenerate_cell<D>() -> impl Strategy<Value = HypercubeCell<f64, D>>
where
    D: ReferenceCell,
    DefaultAllocator: DimAllocator<f64, D>,
{
    let d = D::dim();
    let n_vertices = D::vertices_per_cell();
    (vec(-0.1..0.1, n_vertices * d), vec(0.5..2.0, d), vec(-10.0..10.0, d)).prop_filter_map(
        "vertex count must match the cell",
        move |(perturbation, scale, translation)| {
            let vertices = (0..n_vertices)
                .map(|k| {
                    let reference = D::unit_vertex::<f64>(k);
                    OPoint::from(OVector::<f64, D>::from_fn(|i, _| {
                        (reference[i] + perturbation[k * d + i]) * scale[i] + translation[i]
                    }))
                })
                .collect();
            HypercubeCell::from_vertices(CellKey::new(MeshId::unique(), 0), vertices).ok()
        },
    )
}

impl Arbitrary for UpdateFlags {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        any::<u32>().prop_map(UpdateFlags::from_bits_truncate).boxed()
    }
}
