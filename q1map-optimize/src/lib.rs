/// Calculus helper traits and numerical differentiation
pub mod calculus;
/// Newton's method for small non-linear systems
pub mod newton;
