//! Bilinear/trilinear (Q1) mappings from the unit hypercube to arbitrary quadrilateral and
//! hexahedral cells.
//!
//! The central type is [`MappingQ1`](mapping::MappingQ1). Given a cell described by its
//! `2^D` vertices, it computes the geometric quantities needed to integrate over the cell,
//! its faces and the children of its faces: mapped quadrature points, Jacobians and their
//! inverses, integration weights, boundary forms and outward normals. Per-quadrature data is
//! cached in [`InternalData`](mapping::InternalData), which is built once per quadrature rule
//! and then reused from cell to cell.
use nalgebra::{DimMin, DimName};

pub mod allocators;
pub mod cell;
pub mod error;
pub mod flags;
pub mod integrate;
pub mod mapping;
pub mod procedural;
pub mod quadrature;
pub mod reference;
pub mod shape;
pub mod values;

pub mod optimize {
    pub use q1map_optimize::*;
}

#[cfg(feature = "proptest")]
pub mod proptest;

pub extern crate nalgebra;

pub use q1map_traits::Real;

/// A small, fixed-size dimension.
///
/// Used as a trait alias for various traits frequently needed by generic `q1map` routines.
pub trait SmallDim: DimName + DimMin<Self, Output = Self> {}

impl<D> SmallDim for D where D: DimName + DimMin<Self, Output = Self> {}
