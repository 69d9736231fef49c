//! Lifting of face quadrature rules to the faces and subfaces of the reference cell.
//!
//! The lifted rules contain one block of points per (orientation variant, face) or
//! (orientation variant, face, subface slot), each block as long as the face rule. The mapping
//! evaluates its shape functions once for all blocks and then picks the block of the face
//! currently being filled, located by a [`DataSetDescriptor`].
use crate::allocators::FaceAllocator;
use crate::error::MappingError;
use crate::quadrature::{Quadrature, QuadraturePair};
use crate::reference::{lift_to_face, FaceOrientation, ReferenceCell, SubfaceCase};
use crate::Real;
use nalgebra::{DefaultAllocator, DimName};

/// Refinement case and child index stored in each subface slot.
fn subface_slot_layout<D: ReferenceCell>() -> Vec<(SubfaceCase, usize)> {
    let face_dim = D::FaceDim::dim();
    let mut layout: Vec<_> = (0..SubfaceCase::Isotropic.n_subfaces(face_dim))
        .map(|subface| (SubfaceCase::Isotropic, subface))
        .collect();
    if face_dim == 2 {
        layout.extend((0..2).map(|subface| (SubfaceCase::CutX, subface)));
        layout.extend((0..2).map(|subface| (SubfaceCase::CutY, subface)));
    }
    debug_assert_eq!(layout.len(), D::SUBFACE_SLOTS);
    layout
}

/// Lifts the face rule onto every face of the reference cell, in every orientation variant.
pub fn project_to_all_faces<T, D>(face_quadrature: &impl Quadrature<T, D::FaceDim>) -> QuadraturePair<T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    let n_blocks = D::FACE_ORIENTATIONS * D::faces_per_cell();
    let mut weights = Vec::with_capacity(n_blocks * face_quadrature.size());
    let mut points = Vec::with_capacity(n_blocks * face_quadrature.size());

    for variant in 0..D::FACE_ORIENTATIONS {
        let orientation = FaceOrientation::from_index(variant);
        for face in 0..D::faces_per_cell() {
            for (w, p) in face_quadrature.weights().iter().zip(face_quadrature.points()) {
                weights.push(*w);
                points.push(lift_to_face::<T, D>(face, &orientation.apply(p)));
            }
        }
    }

    (weights, points)
}

/// Lifts the face rule onto every child of every face, in every orientation variant.
///
/// The weights are copied unchanged from the face rule. Scaling by the size of the subface is
/// left to the fill, see [`SubfaceCase::subface_ratio`].
pub fn project_to_all_subfaces<T, D>(face_quadrature: &impl Quadrature<T, D::FaceDim>) -> QuadraturePair<T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    let layout = subface_slot_layout::<D>();
    let n_blocks = D::FACE_ORIENTATIONS * D::faces_per_cell() * layout.len();
    let mut weights = Vec::with_capacity(n_blocks * face_quadrature.size());
    let mut points = Vec::with_capacity(n_blocks * face_quadrature.size());

    for variant in 0..D::FACE_ORIENTATIONS {
        let orientation = FaceOrientation::from_index(variant);
        for face in 0..D::faces_per_cell() {
            for (case, subface) in &layout {
                for (w, p) in face_quadrature.weights().iter().zip(face_quadrature.points()) {
                    let child = case.to_child(*subface, p);
                    weights.push(*w);
                    points.push(lift_to_face::<T, D>(face, &orientation.apply(&child)));
                }
            }
        }
    }

    (weights, points)
}

/// Locates a block of points in a rule lifted by [`project_to_all_faces`] or
/// [`project_to_all_subfaces`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DataSetDescriptor(usize);

impl DataSetDescriptor {
    /// The whole rule of a cell, which starts at offset zero.
    pub fn cell() -> Self {
        Self(0)
    }

    pub fn face<D: ReferenceCell>(
        face: usize,
        orientation: FaceOrientation,
        n_face_points: usize,
    ) -> Result<Self, MappingError> {
        check_face::<D>(face)?;
        let variant = variant_index::<D>(orientation);
        Ok(Self((variant * D::faces_per_cell() + face) * n_face_points))
    }

    pub fn subface<D: ReferenceCell>(
        face: usize,
        subface: usize,
        orientation: FaceOrientation,
        case: SubfaceCase,
        n_face_points: usize,
    ) -> Result<Self, MappingError> {
        check_face::<D>(face)?;
        let face_dim = D::FaceDim::dim();
        let slot = case
            .slot(face_dim, subface)
            .ok_or(MappingError::IndexOutOfBounds {
                what: "subface",
                index: subface,
                bound: case.n_subfaces(face_dim),
            })?;
        let variant = variant_index::<D>(orientation);
        let block = (variant * D::faces_per_cell() + face) * D::SUBFACE_SLOTS + slot;
        Ok(Self(block * n_face_points))
    }

    pub fn offset(&self) -> usize {
        self.0
    }
}

impl From<DataSetDescriptor> for usize {
    fn from(descriptor: DataSetDescriptor) -> Self {
        descriptor.0
    }
}

fn variant_index<D: ReferenceCell>(orientation: FaceOrientation) -> usize {
    if D::FACE_ORIENTATIONS == 1 {
        0
    } else {
        orientation.index()
    }
}

fn check_face<D: ReferenceCell>(face: usize) -> Result<(), MappingError> {
    if face < D::faces_per_cell() {
        Ok(())
    } else {
        Err(MappingError::IndexOutOfBounds {
            what: "face",
            index: face,
            bound: D::faces_per_cell(),
        })
    }
}
