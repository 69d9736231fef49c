//! Update flags and their propagation.
//!
//! A caller asks for a set of quantities (points, weights, normals, ...). Some of them can only
//! be computed from others, and some of them only depend on the reference cell and can therefore
//! be computed once per quadrature rule instead of once per cell. [`update_once`] and
//! [`update_each`] resolve a request into those two sets.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

/// A set of quantities to compute.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpdateFlags(u32);

impl UpdateFlags {
    /// Nothing.
    pub const DEFAULT: Self = Self(0);
    /// Real-space positions of the quadrature points.
    pub const QUADRATURE_POINTS: Self = Self(1 << 0);
    /// Mapped integration weights, `det J w` on cells and `|boundary form| w` on faces.
    pub const JXW_VALUES: Self = Self(1 << 1);
    /// Cell integration weights `det J w`, evaluated at face quadrature points.
    pub const CELL_JXW_VALUES: Self = Self(1 << 2);
    /// Unnormalized outward face normals scaled by the face area element.
    pub const BOUNDARY_FORMS: Self = Self(1 << 3);
    /// Unit outward face normals.
    pub const NORMAL_VECTORS: Self = Self(1 << 4);
    /// The inverse transposed Jacobian at each quadrature point.
    pub const COVARIANT_TRANSFORMATION: Self = Self(1 << 5);
    /// The Jacobian at each quadrature point.
    pub const CONTRAVARIANT_TRANSFORMATION: Self = Self(1 << 6);
    /// Values of the mapping shape functions on the reference cell.
    pub const TRANSFORMATION_VALUES: Self = Self(1 << 7);
    /// Gradients of the mapping shape functions on the reference cell.
    pub const TRANSFORMATION_GRADIENTS: Self = Self(1 << 8);
    /// Jacobians as output values.
    pub const JACOBIANS: Self = Self(1 << 9);
    /// Derivatives of the Jacobian with respect to reference coordinates.
    pub const JACOBIAN_GRADS: Self = Self(1 << 10);
    /// Inverse Jacobians as output values.
    pub const INVERSE_JACOBIANS: Self = Self(1 << 11);

    const NAMES: [(Self, &'static str); 12] = [
        (Self::QUADRATURE_POINTS, "quadrature_points"),
        (Self::JXW_VALUES, "JxW_values"),
        (Self::CELL_JXW_VALUES, "cell_JxW_values"),
        (Self::BOUNDARY_FORMS, "boundary_forms"),
        (Self::NORMAL_VECTORS, "normal_vectors"),
        (Self::COVARIANT_TRANSFORMATION, "covariant_transformation"),
        (Self::CONTRAVARIANT_TRANSFORMATION, "contravariant_transformation"),
        (Self::TRANSFORMATION_VALUES, "transformation_values"),
        (Self::TRANSFORMATION_GRADIENTS, "transformation_gradients"),
        (Self::JACOBIANS, "jacobians"),
        (Self::JACOBIAN_GRADS, "jacobian_grads"),
        (Self::INVERSE_JACOBIANS, "inverse_jacobians"),
    ];

    const ALL_BITS: u32 = (1 << 12) - 1;

    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Builds a flag set from raw bits, discarding bits that do not name a flag.
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL_BITS)
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether every flag in `other` is also set in `self`.
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether at least one flag in `other` is set in `self`.
    pub const fn intersects(&self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for UpdateFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for UpdateFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs)
    }
}

impl BitAnd for UpdateFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for UpdateFlags {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl fmt::Display for UpdateFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "default");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES.iter() {
            if self.contains(*flag) {
                if !first {
                    write!(f, " | ")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// The quantities that only depend on the reference cell and the quadrature rule.
///
/// These are the shape function values and gradients of the mapping, which are evaluated once
/// when the internal data is built.
pub fn update_once(requested: UpdateFlags) -> UpdateFlags {
    use UpdateFlags as F;
    let mut out = requested & (F::TRANSFORMATION_VALUES | F::TRANSFORMATION_GRADIENTS);

    if requested.contains(F::QUADRATURE_POINTS) {
        out |= F::TRANSFORMATION_VALUES;
    }

    let needs_gradients = F::COVARIANT_TRANSFORMATION
        | F::CONTRAVARIANT_TRANSFORMATION
        | F::JXW_VALUES
        | F::BOUNDARY_FORMS
        | F::NORMAL_VECTORS
        | F::JACOBIANS
        | F::JACOBIAN_GRADS
        | F::INVERSE_JACOBIANS;
    if requested.intersects(needs_gradients) {
        out |= F::TRANSFORMATION_GRADIENTS;
    }

    out
}

/// The quantities that must be recomputed on every cell, closed under their dependencies.
pub fn update_each(requested: UpdateFlags) -> UpdateFlags {
    use UpdateFlags as F;
    let mut out = requested
        & (F::QUADRATURE_POINTS
            | F::COVARIANT_TRANSFORMATION
            | F::CONTRAVARIANT_TRANSFORMATION
            | F::JXW_VALUES
            | F::CELL_JXW_VALUES
            | F::BOUNDARY_FORMS
            | F::NORMAL_VECTORS
            | F::JACOBIANS
            | F::JACOBIAN_GRADS
            | F::INVERSE_JACOBIANS);

    let rules = [
        (F::JXW_VALUES | F::NORMAL_VECTORS, F::BOUNDARY_FORMS),
        (
            F::COVARIANT_TRANSFORMATION
                | F::JXW_VALUES
                | F::JACOBIANS
                | F::JACOBIAN_GRADS
                | F::BOUNDARY_FORMS
                | F::NORMAL_VECTORS,
            F::CONTRAVARIANT_TRANSFORMATION,
        ),
        (F::INVERSE_JACOBIANS, F::COVARIANT_TRANSFORMATION),
        (F::CONTRAVARIANT_TRANSFORMATION, F::JXW_VALUES | F::CELL_JXW_VALUES),
    ];

    // The rules only ever add flags, so this reaches a fixed point after a few passes
    loop {
        let before = out;
        for (trigger, implied) in rules {
            if out.intersects(trigger) {
                out |= implied;
            }
        }
        if out == before {
            return out;
        }
    }
}
