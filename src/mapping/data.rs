use crate::allocators::DimAllocator;
use crate::cell::{CellKey, MappingCell};
use crate::flags::UpdateFlags;
use crate::reference::ReferenceCell;
use crate::shape::compute_shapes;
use crate::{Real, SmallDim};
use log::trace;
use nalgebra::{DefaultAllocator, OMatrix, OPoint, OVector};
use std::mem::size_of;

/// Per-quadrature-rule cache of the Q1 mapping.
///
/// Holds the mapping shape functions evaluated at the quadrature points, the Jacobians and
/// their inverses of the most recently filled cell, and the vertices of that cell. Built by
/// [`Mapping::get_data`](super::Mapping::get_data) and its face variants, then passed to the
/// fills of many cells. The cached vertices are reloaded whenever a fill is given a cell with a
/// different [`CellKey`], or after [`invalidate`](Self::invalidate).
///
/// The shape arrays are laid out point-major: entry `q * n + k` belongs to quadrature point `q`
/// and shape function `k`, where `n` is the number of shape functions.
#[derive(Debug, Clone)]
pub struct InternalData<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    n_shape_functions: usize,
    update_once: UpdateFlags,
    update_each: UpdateFlags,
    update_flags: UpdateFlags,

    pub(crate) shape_values: Vec<T>,
    pub(crate) shape_derivatives: Vec<OVector<T, D>>,
    pub(crate) shape_second_derivatives: Vec<OMatrix<T, D, D>>,

    /// Jacobians of the current cell, one per point of the rule being filled.
    pub(crate) contravariant: Vec<OMatrix<T, D, D>>,
    /// Inverse transposed Jacobians of the current cell.
    pub(crate) covariant: Vec<OMatrix<T, D, D>>,

    /// Tangential `j` of face `f` at index `j * faces + f`.
    pub(crate) unit_tangentials: Vec<OVector<T, D>>,
    /// Pushed-forward tangentials, `D - 1` consecutive entries per quadrature point.
    pub(crate) aux: Vec<OVector<T, D>>,

    mapping_support_points: Vec<OPoint<T, D>>,
    cell_of_current_support_points: Option<CellKey>,
}

impl<T, D> InternalData<T, D>
where
    T: Real,
    D: SmallDim,
    DefaultAllocator: DimAllocator<T, D>,
{
    pub(crate) fn new(n_shape_functions: usize) -> Self {
        Self {
            n_shape_functions,
            update_once: UpdateFlags::DEFAULT,
            update_each: UpdateFlags::DEFAULT,
            update_flags: UpdateFlags::DEFAULT,
            shape_values: Vec::new(),
            shape_derivatives: Vec::new(),
            shape_second_derivatives: Vec::new(),
            contravariant: Vec::new(),
            covariant: Vec::new(),
            unit_tangentials: Vec::new(),
            aux: Vec::new(),
            mapping_support_points: Vec::new(),
            cell_of_current_support_points: None,
        }
    }

    pub(crate) fn set_flags(&mut self, update_once: UpdateFlags, update_each: UpdateFlags) {
        self.update_once = update_once;
        self.update_each = update_each;
        self.update_flags = update_once | update_each;
    }

    pub fn n_shape_functions(&self) -> usize {
        self.n_shape_functions
    }

    /// Quantities computed when the data was built.
    pub fn update_once(&self) -> UpdateFlags {
        self.update_once
    }

    /// Quantities recomputed on every fill.
    pub fn update_each(&self) -> UpdateFlags {
        self.update_each
    }

    /// All quantities this data provides.
    pub fn update_flags(&self) -> UpdateFlags {
        self.update_flags
    }

    /// The flags that drive a fill.
    pub fn current_update_flags(&self) -> UpdateFlags {
        self.update_each
    }

    pub fn shape(&self, point: usize, shape: usize) -> T {
        self.shape_values[point * self.n_shape_functions + shape]
    }

    pub fn derivative(&self, point: usize, shape: usize) -> &OVector<T, D> {
        &self.shape_derivatives[point * self.n_shape_functions + shape]
    }

    pub fn second_derivative(&self, point: usize, shape: usize) -> &OMatrix<T, D, D> {
        &self.shape_second_derivatives[point * self.n_shape_functions + shape]
    }

    /// Jacobians computed by the last fill.
    pub fn contravariant(&self) -> &[OMatrix<T, D, D>] {
        &self.contravariant
    }

    /// Inverse transposed Jacobians computed by the last fill.
    pub fn covariant(&self) -> &[OMatrix<T, D, D>] {
        &self.covariant
    }

    /// The vertices of the cell the data was last filled for.
    pub fn mapping_support_points(&self) -> &[OPoint<T, D>] {
        &self.mapping_support_points
    }

    pub fn current_cell(&self) -> Option<CellKey> {
        self.cell_of_current_support_points
    }

    /// Forces the next fill to reload the cell vertices, even for a cell with the same key.
    ///
    /// Required after the vertices of a cell have been moved.
    pub fn invalidate(&mut self) {
        self.cell_of_current_support_points = None;
    }

    /// Number of bytes held by this object, including its buffers.
    pub fn memory_consumption(&self) -> usize {
        fn bytes<X>(v: &Vec<X>) -> usize {
            v.capacity() * size_of::<X>()
        }
        size_of::<Self>()
            + bytes(&self.shape_values)
            + bytes(&self.shape_derivatives)
            + bytes(&self.shape_second_derivatives)
            + bytes(&self.contravariant)
            + bytes(&self.covariant)
            + bytes(&self.unit_tangentials)
            + bytes(&self.aux)
            + bytes(&self.mapping_support_points)
    }

    /// Evaluates the shape arrays at the given points.
    ///
    /// Only the arrays that were allocated when the data was built are written.
    pub(crate) fn compute_shapes_at(&mut self, points: &[OPoint<T, D>]) {
        compute_shapes(
            points,
            &mut self.shape_values,
            &mut self.shape_derivatives,
            &mut self.shape_second_derivatives,
        );
    }

    /// Loads the vertices of `cell`, unless they are already cached.
    pub(crate) fn ensure_support_points<C>(&mut self, cell: &C)
    where
        D: ReferenceCell,
        C: MappingCell<T, D>,
    {
        let key = cell.key();
        if self.cell_of_current_support_points == Some(key) {
            return;
        }
        trace!("Loading support points of cell {:?}", key);
        self.mapping_support_points.clear();
        self.mapping_support_points
            .extend((0..D::vertices_per_cell()).map(|i| cell.vertex(i)));
        self.cell_of_current_support_points = Some(key);
    }
}
