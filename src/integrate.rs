//! Integration of scalar functions over collections of cells.
use crate::allocators::FaceAllocator;
use crate::cell::MappingCell;
use crate::error::MappingError;
use crate::flags::UpdateFlags;
use crate::mapping::{InternalData, Mapping, MappingQ1};
use crate::quadrature::Quadrature;
use crate::reference::ReferenceCell;
use crate::values::CellValues;
use crate::Real;
use itertools::izip;
use nalgebra::{DefaultAllocator, OPoint};
use rayon::prelude::*;
use std::cell::RefCell;
use thread_local::ThreadLocal;

/// Buffers reused from cell to cell.
struct IntegrationWorkspace<T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    data: InternalData<T, D>,
    values: CellValues<T, D>,
}

impl<T, D> IntegrationWorkspace<T, D>
where
    T: Real,
    D: ReferenceCell,
    DefaultAllocator: FaceAllocator<T, D>,
{
    fn new(mapping: &MappingQ1, quadrature: &impl Quadrature<T, D>) -> Self {
        let flags = UpdateFlags::QUADRATURE_POINTS | UpdateFlags::JXW_VALUES;
        let data = <MappingQ1 as Mapping<T, D>>::get_data(mapping, flags, quadrature);
        let values = CellValues::for_flags(data.update_flags(), quadrature.size());
        Self { data, values }
    }

    fn integrate_cell<C>(
        &mut self,
        mapping: &MappingQ1,
        cell: &C,
        quadrature: &impl Quadrature<T, D>,
        f: &impl Fn(&OPoint<T, D>) -> T,
    ) -> Result<T, MappingError>
    where
        C: MappingCell<T, D>,
    {
        <MappingQ1 as Mapping<T, D>>::fill_fe_values(mapping, cell, quadrature, &mut self.data, &mut self.values)?;
        let mut integral = T::zero();
        for (x, jxw) in izip!(&self.values.quadrature_points, &self.values.jxw_values) {
            integral += f(x) * *jxw;
        }
        Ok(integral)
    }
}

/// Approximates the integral of `f` over the union of `cells`.
pub fn integrate_scalar<T, D, C, Q, F>(
    mapping: &MappingQ1,
    cells: &[C],
    quadrature: &Q,
    f: F,
) -> Result<T, MappingError>
where
    T: Real,
    D: ReferenceCell,
    C: MappingCell<T, D>,
    Q: Quadrature<T, D>,
    F: Fn(&OPoint<T, D>) -> T,
    DefaultAllocator: FaceAllocator<T, D>,
{
    let mut workspace = IntegrationWorkspace::new(mapping, quadrature);
    let mut integral = T::zero();
    for cell in cells {
        integral += workspace.integrate_cell(mapping, cell, quadrature, &f)?;
    }
    Ok(integral)
}

/// Parallel version of [`integrate_scalar`].
///
/// Each worker thread builds its own internal data on first use.
pub fn par_integrate_scalar<T, D, C, Q, F>(
    mapping: &MappingQ1,
    cells: &[C],
    quadrature: &Q,
    f: F,
) -> Result<T, MappingError>
where
    T: Real + Send,
    D: ReferenceCell,
    C: MappingCell<T, D> + Sync,
    Q: Quadrature<T, D> + Sync,
    F: Fn(&OPoint<T, D>) -> T + Sync,
    InternalData<T, D>: Send,
    CellValues<T, D>: Send,
    DefaultAllocator: FaceAllocator<T, D>,
{
    let workspace: ThreadLocal<RefCell<IntegrationWorkspace<T, D>>> = ThreadLocal::new();
    cells
        .par_iter()
        .with_min_len(64)
        .map(|cell| {
            let mut ws = workspace
                .get_or(|| RefCell::new(IntegrationWorkspace::new(mapping, quadrature)))
                .borrow_mut();
            ws.integrate_cell(mapping, cell, quadrature, &f)
        })
        .try_reduce(T::zero, |a, b| Ok(a + b))
}

/// The total volume (area, length) of `cells`.
pub fn measure<T, D, C, Q>(mapping: &MappingQ1, cells: &[C], quadrature: &Q) -> Result<T, MappingError>
where
    T: Real,
    D: ReferenceCell,
    C: MappingCell<T, D>,
    Q: Quadrature<T, D>,
    DefaultAllocator: FaceAllocator<T, D>,
{
    integrate_scalar(mapping, cells, quadrature, |_| T::one())
}

/// Parallel version of [`measure`].
pub fn par_measure<T, D, C, Q>(mapping: &MappingQ1, cells: &[C], quadrature: &Q) -> Result<T, MappingError>
where
    T: Real + Send,
    D: ReferenceCell,
    C: MappingCell<T, D> + Sync,
    Q: Quadrature<T, D> + Sync,
    InternalData<T, D>: Send,
    CellValues<T, D>: Send,
    DefaultAllocator: FaceAllocator<T, D>,
{
    par_integrate_scalar(mapping, cells, quadrature, |_| T::one())
}
