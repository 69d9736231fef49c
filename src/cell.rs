//! Cells the mapping can be applied to.
use crate::allocators::DimAllocator;
use crate::error::MappingError;
use crate::reference::{FaceOrientation, ReferenceCell, SubfaceCase};
use crate::Real;
use itertools::Itertools;
use nalgebra::{DefaultAllocator, OPoint};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies a mesh (or any other owner of a set of cells).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(u64);

impl MeshId {
    /// Returns an id that no other call in this process has returned.
    pub fn unique() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Identity of a cell: the mesh it belongs to and its index in that mesh.
///
/// Two cells with the same key must have the same vertices. The mapping uses the key to decide
/// whether support points cached in its internal data are still valid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    pub mesh: MeshId,
    pub index: usize,
}

impl CellKey {
    pub fn new(mesh: MeshId, index: usize) -> Self {
        Self { mesh, index }
    }
}

/// A cell given by the physical positions of the `2^D` vertices of the reference cell.
///
/// Vertex `i` is the image of the reference vertex whose coordinate `j` is bit `j` of `i`.
pub trait MappingCell<T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: DimAllocator<T, D>,
{
    fn key(&self) -> CellKey;

    fn vertex(&self, i: usize) -> OPoint<T, D>;

    /// The largest distance between two vertices.
    fn diameter(&self) -> T {
        (0..D::vertices_per_cell())
            .map(|i| self.vertex(i))
            .tuple_combinations()
            .map(|(x, y)| (x - y).norm())
            .fold(T::zero(), |a, b| a.max(b))
    }

    fn face_orientation(&self, _face: usize) -> bool {
        true
    }

    fn face_flip(&self, _face: usize) -> bool {
        false
    }

    fn face_rotation(&self, _face: usize) -> bool {
        false
    }

    fn subface_case(&self, _face: usize) -> SubfaceCase {
        SubfaceCase::Isotropic
    }
}

impl<'a, T, D, C> MappingCell<T, D> for &'a C
where
    T: Real,
    D: ReferenceCell,
    C: MappingCell<T, D>,
    DefaultAllocator: DimAllocator<T, D>,
{
    fn key(&self) -> CellKey {
        C::key(self)
    }

    fn vertex(&self, i: usize) -> OPoint<T, D> {
        C::vertex(self, i)
    }

    fn diameter(&self) -> T {
        C::diameter(self)
    }

    fn face_orientation(&self, face: usize) -> bool {
        C::face_orientation(self, face)
    }

    fn face_flip(&self, face: usize) -> bool {
        C::face_flip(self, face)
    }

    fn face_rotation(&self, face: usize) -> bool {
        C::face_rotation(self, face)
    }

    fn subface_case(&self, face: usize) -> SubfaceCase {
        C::subface_case(self, face)
    }
}

pub(crate) fn face_orientation_of<T, D, C>(cell: &C, face: usize) -> FaceOrientation
where
    T: Real,
    D: ReferenceCell,
    C: MappingCell<T, D>,
    DefaultAllocator: DimAllocator<T, D>,
{
    if D::FACE_ORIENTATIONS == 1 {
        return FaceOrientation::STANDARD;
    }
    FaceOrientation {
        orientation: cell.face_orientation(face),
        flip: cell.face_flip(face),
        rotation: cell.face_rotation(face),
    }
}

/// A standalone cell that owns its vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct HypercubeCell<T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: DimAllocator<T, D>,
{
    key: CellKey,
    vertices: Vec<OPoint<T, D>>,
    face_orientations: Vec<FaceOrientation>,
    subface_cases: Vec<SubfaceCase>,
}

impl<T, D> HypercubeCell<T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: DimAllocator<T, D>,
{
    /// Creates a cell from its `2^D` vertices, with standard face orientations and isotropic
    /// face refinement.
    pub fn from_vertices(key: CellKey, vertices: Vec<OPoint<T, D>>) -> Result<Self, MappingError> {
        let expected = D::vertices_per_cell();
        if vertices.len() != expected {
            return Err(MappingError::DimensionMismatch {
                field: "vertices",
                expected,
                actual: vertices.len(),
            });
        }
        let faces = D::faces_per_cell();
        Ok(Self {
            key,
            vertices,
            face_orientations: vec![FaceOrientation::STANDARD; faces],
            subface_cases: vec![SubfaceCase::Isotropic; faces],
        })
    }

    /// The axis-aligned box spanned by `lower` and `upper`.
    pub fn from_bounds(key: CellKey, lower: &OPoint<T, D>, upper: &OPoint<T, D>) -> Self {
        let faces = D::faces_per_cell();
        let vertices = (0..D::vertices_per_cell())
            .map(|k| {
                let mut x = lower.clone();
                for i in 0..D::dim() {
                    if k & (1 << i) != 0 {
                        x[i] = upper[i];
                    }
                }
                x
            })
            .collect();
        Self {
            key,
            vertices,
            face_orientations: vec![FaceOrientation::STANDARD; faces],
            subface_cases: vec![SubfaceCase::Isotropic; faces],
        }
    }

    /// The reference cell `[0, 1]^D` itself.
    pub fn reference(key: CellKey) -> Self {
        let upper = OPoint::from(nalgebra::OVector::<T, D>::repeat(T::one()));
        Self::from_bounds(key, &OPoint::origin(), &upper)
    }

    pub fn with_face_orientation(mut self, face: usize, orientation: FaceOrientation) -> Self {
        self.face_orientations[face] = orientation;
        self
    }

    pub fn with_subface_case(mut self, face: usize, case: SubfaceCase) -> Self {
        self.subface_cases[face] = case;
        self
    }

    pub fn vertices(&self) -> &[OPoint<T, D>] {
        &self.vertices
    }
}

impl<T, D> MappingCell<T, D> for HypercubeCell<T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: DimAllocator<T, D>,
{
    fn key(&self) -> CellKey {
        self.key
    }

    fn vertex(&self, i: usize) -> OPoint<T, D> {
        self.vertices[i].clone()
    }

    fn face_orientation(&self, face: usize) -> bool {
        self.face_orientations[face].orientation
    }

    fn face_flip(&self, face: usize) -> bool {
        self.face_orientations[face].flip
    }

    fn face_rotation(&self, face: usize) -> bool {
        self.face_orientations[face].rotation
    }

    fn subface_case(&self, face: usize) -> SubfaceCase {
        self.subface_cases[face]
    }
}
