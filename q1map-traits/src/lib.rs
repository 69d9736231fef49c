use nalgebra::RealField;

pub use nalgebra;

/// Scalar types the mapping can be evaluated with.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}

pub mod allocators;
