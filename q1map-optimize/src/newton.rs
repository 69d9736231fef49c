use crate::calculus::DifferentiableVectorFunction;
use log::debug;
use nalgebra::{DVectorView, DVectorViewMut};
use q1map_traits::Real;
use std::error::Error;
use std::fmt;
use std::fmt::Display;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NewtonSettings<T> {
    /// Maximum number of Newton updates. `None` iterates until convergence.
    pub max_iterations: Option<usize>,
    /// The iteration has converged once `|F(u)|_2 <= tolerance`.
    pub tolerance: T,
}

/// The state the iteration stopped in.
///
/// Reaching the iteration cap is not an error: `converged` is `false` and `residual_norm` holds
/// the norm of `F` at the returned estimate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NewtonOutcome<T> {
    pub iterations: usize,
    pub residual_norm: T,
    pub converged: bool,
}

#[derive(Debug)]
pub enum NewtonError {
    /// Solving the Jacobian system failed.
    JacobianError(Box<dyn Error>),
    /// The residual became NaN or infinite after the given number of iterations.
    NonFiniteResidual(usize),
}

impl Display for NewtonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            NewtonError::JacobianError(err) => {
                write!(f, "Failed to solve Jacobian system. Error: {}", err)
            }
            NewtonError::NonFiniteResidual(iter) => {
                write!(f, "Residual is not finite after {} iterations.", iter)
            }
        }
    }
}

impl Error for NewtonError {}

/// Attempts to solve the non-linear equation F(u) = 0 with full Newton steps.
///
/// No heap allocation is performed. On return, `x` holds the last iterate and `f` holds `F(x)`.
pub fn newton<'a, T, F>(
    mut function: F,
    x: impl Into<DVectorViewMut<'a, T>>,
    f: impl Into<DVectorViewMut<'a, T>>,
    dx: impl Into<DVectorViewMut<'a, T>>,
    settings: NewtonSettings<T>,
) -> Result<NewtonOutcome<T>, NewtonError>
where
    T: Real,
    F: DifferentiableVectorFunction<T>,
{
    let mut x = x.into();
    let mut f = f.into();
    let mut d = dx.into();

    assert_eq!(x.nrows(), f.nrows());
    assert_eq!(d.nrows(), f.nrows());

    function.eval_into(&mut f, &DVectorView::from(&x));

    let mut iter = 0;
    loop {
        let residual_norm = f.norm();
        if !residual_norm.is_finite() {
            return Err(NewtonError::NonFiniteResidual(iter));
        }
        if residual_norm <= settings.tolerance {
            return Ok(NewtonOutcome {
                iterations: iter,
                residual_norm,
                converged: true,
            });
        }
        if settings
            .max_iterations
            .map(|max_iter| iter == max_iter)
            .unwrap_or(false)
        {
            return Ok(NewtonOutcome {
                iterations: iter,
                residual_norm,
                converged: false,
            });
        }

        // Solve J d = f, then x <- x - d
        function
            .solve_jacobian_system(&mut d, &DVectorView::from(&x), &DVectorView::from(&f))
            .map_err(NewtonError::JacobianError)?;
        x -= &d;

        function.eval_into(&mut f, &DVectorView::from(&x));
        iter += 1;
        debug!("Newton iteration {}: residual norm {}", iter, f.norm());
    }
}
