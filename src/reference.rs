//! Geometry of the reference hypercube `[0, 1]^D`.
//!
//! Vertex `k` of the reference cell has coordinate `i` equal to bit `i` of `k`. Face `f` is the
//! facet orthogonal to axis `f / 2`, at coordinate `0` for even and `1` for odd `f`. Face-local
//! coordinate `j` runs along cell axis `(f / 2 + 1 + j) % D`.
use crate::allocators::DimAllocator;
use crate::{Real, SmallDim};
use nalgebra::{DefaultAllocator, DimName, OPoint, OVector, U0, U1, U2, U3};
use serde::{Deserialize, Serialize};

/// A dimension for which the reference hypercube and its faces are defined.
pub trait ReferenceCell: SmallDim {
    /// Dimension of the faces.
    type FaceDim: SmallDim;

    /// Number of distinct (orientation, flip, rotation) variants a face can be seen in.
    const FACE_ORIENTATIONS: usize;

    /// Number of subface slots per face, counted over all supported refinement cases.
    const SUBFACE_SLOTS: usize;

    /// Unit tangentials of all faces.
    ///
    /// Tangential `j` of face `f` is stored at index `j * faces_per_cell() + f`. The tangentials
    /// are oriented so that [`boundary_form`](Self::boundary_form) of the tangentials of a
    /// face is its outward normal.
    fn unit_tangentials<T>() -> Vec<OVector<T, Self>>
    where
        T: Real,
        DefaultAllocator: DimAllocator<T, Self>;

    /// Cross product of the `D - 1` tangentials of a face.
    ///
    /// Returns `None` in 1D, where faces are points and have no tangentials.
    fn boundary_form<T>(tangentials: &[OVector<T, Self>]) -> Option<OVector<T, Self>>
    where
        T: Real,
        DefaultAllocator: DimAllocator<T, Self>;

    fn vertices_per_cell() -> usize {
        1 << Self::dim()
    }

    fn faces_per_cell() -> usize {
        2 * Self::dim()
    }

    /// The axis orthogonal to the given face.
    fn unit_normal_direction(face: usize) -> usize {
        face / 2
    }

    /// `-1` if the outward normal of the face points in negative axis direction, `+1` otherwise.
    fn unit_normal_orientation(face: usize) -> i32 {
        if face % 2 == 0 {
            -1
        } else {
            1
        }
    }

    /// The position of the given vertex on the reference cell.
    fn unit_vertex<T>(vertex: usize) -> OPoint<T, Self>
    where
        T: Real,
        DefaultAllocator: DimAllocator<T, Self>,
    {
        OPoint::from(OVector::<T, Self>::from_fn(|i, _| {
            if vertex & (1 << i) != 0 {
                T::one()
            } else {
                T::zero()
            }
        }))
    }
}

impl ReferenceCell for U1 {
    type FaceDim = U0;

    const FACE_ORIENTATIONS: usize = 1;
    const SUBFACE_SLOTS: usize = 0;

    fn unit_tangentials<T>() -> Vec<OVector<T, Self>>
    where
        T: Real,
        DefaultAllocator: DimAllocator<T, Self>,
    {
        Vec::new()
    }

    fn boundary_form<T>(_tangentials: &[OVector<T, Self>]) -> Option<OVector<T, Self>>
    where
        T: Real,
        DefaultAllocator: DimAllocator<T, Self>,
    {
        None
    }
}

impl ReferenceCell for U2 {
    type FaceDim = U1;

    const FACE_ORIENTATIONS: usize = 1;
    const SUBFACE_SLOTS: usize = 2;

    fn unit_tangentials<T>() -> Vec<OVector<T, Self>>
    where
        T: Real,
        DefaultAllocator: DimAllocator<T, Self>,
    {
        // Counterclockwise around the cell
        let orientation = [-1.0, 1.0, 1.0, -1.0];
        (0..4)
            .map(|face| {
                let mut t = OVector::<T, Self>::zeros();
                t[1 - face / 2] = nalgebra::convert::<f64, T>(orientation[face]);
                t
            })
            .collect()
    }

    fn boundary_form<T>(tangentials: &[OVector<T, Self>]) -> Option<OVector<T, Self>>
    where
        T: Real,
        DefaultAllocator: DimAllocator<T, Self>,
    {
        let t = tangentials.first()?;
        let mut form = OVector::<T, Self>::zeros();
        form[0] = t[1];
        form[1] = -t[0];
        Some(form)
    }
}

impl ReferenceCell for U3 {
    type FaceDim = U2;

    const FACE_ORIENTATIONS: usize = 8;
    // 4 isotropic children, then 2 for each of the anisotropic cuts
    const SUBFACE_SLOTS: usize = 8;

    fn unit_tangentials<T>() -> Vec<OVector<T, Self>>
    where
        T: Real,
        DefaultAllocator: DimAllocator<T, Self>,
    {
        let faces = Self::faces_per_cell();
        let mut tangentials = vec![OVector::<T, Self>::zeros(); 2 * faces];
        for face in 0..faces {
            let nd = Self::unit_normal_direction(face);
            let orientation = nalgebra::convert::<f64, T>(f64::from(Self::unit_normal_orientation(face)));
            tangentials[face][(nd + 1) % 3] = orientation;
            tangentials[faces + face][(nd + 2) % 3] = T::one();
        }
        tangentials
    }

    fn boundary_form<T>(tangentials: &[OVector<T, Self>]) -> Option<OVector<T, Self>>
    where
        T: Real,
        DefaultAllocator: DimAllocator<T, Self>,
    {
        match tangentials {
            [a, b, ..] => {
                let mut form = OVector::<T, Self>::zeros();
                form[0] = a[1] * b[2] - a[2] * b[1];
                form[1] = a[2] * b[0] - a[0] * b[2];
                form[2] = a[0] * b[1] - a[1] * b[0];
                Some(form)
            }
            _ => None,
        }
    }
}

/// How a face is seen from the cell it belongs to, relative to the standard orientation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceOrientation {
    pub orientation: bool,
    pub flip: bool,
    pub rotation: bool,
}

impl Default for FaceOrientation {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl FaceOrientation {
    pub const STANDARD: Self = Self {
        orientation: true,
        flip: false,
        rotation: false,
    };

    /// Index of this variant among the 8 orientation variants. The standard variant is `0`.
    pub fn index(&self) -> usize {
        usize::from(!self.orientation) * 4 + usize::from(self.flip) * 2 + usize::from(self.rotation)
    }

    pub fn from_index(index: usize) -> Self {
        Self {
            orientation: index & 4 == 0,
            flip: index & 2 != 0,
            rotation: index & 1 != 0,
        }
    }

    /// Maps a point given in standard face-local coordinates to the coordinates of this variant.
    ///
    /// Only two-dimensional faces have non-trivial variants. Points of other face dimensions are
    /// returned unchanged.
    pub fn apply<T, F>(&self, p: &OPoint<T, F>) -> OPoint<T, F>
    where
        T: Real,
        F: SmallDim,
        DefaultAllocator: DimAllocator<T, F>,
    {
        let mut q = p.clone();
        if F::dim() != 2 {
            return q;
        }
        let (mut x, mut y) = (p[0], p[1]);
        if !self.orientation {
            std::mem::swap(&mut x, &mut y);
        }
        if self.rotation {
            let rotated = (T::one() - y, x);
            x = rotated.0;
            y = rotated.1;
        }
        if self.flip {
            x = T::one() - x;
            y = T::one() - y;
        }
        q[0] = x;
        q[1] = y;
        q
    }
}

/// How a face is refined into subfaces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubfaceCase {
    /// The face is not refined.
    None,
    /// Cut orthogonal to the first face-local axis.
    CutX,
    /// Cut orthogonal to the second face-local axis.
    CutY,
    /// Cut orthogonal to every face-local axis.
    Isotropic,
}

impl Default for SubfaceCase {
    fn default() -> Self {
        SubfaceCase::Isotropic
    }
}

impl SubfaceCase {
    /// Number of subfaces a face of dimension `face_dim` is split into.
    ///
    /// Cuts that do not exist for the face dimension yield zero subfaces. In 2D, where faces are
    /// lines, `CutX` and `Isotropic` coincide.
    pub fn n_subfaces(&self, face_dim: usize) -> usize {
        match (self, face_dim) {
            (_, 0) => 0,
            (SubfaceCase::None, _) => 0,
            (SubfaceCase::Isotropic, d) => 1 << d,
            (SubfaceCase::CutX, _) => 2,
            (SubfaceCase::CutY, 1) => 0,
            (SubfaceCase::CutY, _) => 2,
        }
    }

    /// Slot of the subface in the block of projected subface points of one face.
    pub(crate) fn slot(&self, face_dim: usize, subface: usize) -> Option<usize> {
        if subface >= self.n_subfaces(face_dim) {
            return None;
        }
        match (self, face_dim) {
            (SubfaceCase::CutX, 2) => Some(4 + subface),
            (SubfaceCase::CutY, 2) => Some(6 + subface),
            _ => Some(subface),
        }
    }

    /// Ratio of the subface area to the area of the face it is a child of.
    pub fn subface_ratio(&self, face_dim: usize) -> f64 {
        match self {
            SubfaceCase::None => 1.0,
            SubfaceCase::CutX | SubfaceCase::CutY => 0.5,
            SubfaceCase::Isotropic => 0.5f64.powi(face_dim as i32),
        }
    }

    /// Maps a face-local point to the face-local coordinates of the given child.
    pub(crate) fn to_child<T, F>(&self, subface: usize, p: &OPoint<T, F>) -> OPoint<T, F>
    where
        T: Real,
        F: SmallDim,
        DefaultAllocator: DimAllocator<T, F>,
    {
        let half = nalgebra::convert::<f64, T>(0.5);
        let shift = |bit: bool| if bit { half } else { T::zero() };
        let mut q = p.clone();
        match self {
            SubfaceCase::None => {}
            SubfaceCase::Isotropic => {
                for j in 0..F::dim() {
                    q[j] = p[j] * half + shift(subface & (1 << j) != 0);
                }
            }
            SubfaceCase::CutX => {
                q[0] = p[0] * half + shift(subface == 1);
            }
            SubfaceCase::CutY => {
                q[1] = p[1] * half + shift(subface == 1);
            }
        }
        q
    }
}

/// Lifts a face-local point onto the given face of the reference cell.
pub fn lift_to_face<T, D>(face: usize, p: &OPoint<T, D::FaceDim>) -> OPoint<T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: DimAllocator<T, D> + DimAllocator<T, D::FaceDim>,
{
    let d = D::dim();
    let normal_axis = D::unit_normal_direction(face);
    let mut x = OPoint::<T, D>::origin();
    if face % 2 == 1 {
        x[normal_axis] = T::one();
    }
    for j in 0..D::FaceDim::dim() {
        x[(normal_axis + 1 + j) % d] = p[j];
    }
    x
}
