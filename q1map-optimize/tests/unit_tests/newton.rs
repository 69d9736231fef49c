use nalgebra::{DVector, DVectorView, DVectorViewMut, Matrix3, Vector3};
use numeric_literals::replace_numeric_literals;
use q1map_optimize::calculus::{DifferentiableVectorFunction, VectorFunction};
use q1map_optimize::newton::*;
use std::error::Error;

struct MockLinearVectorFunction;

impl VectorFunction<f64> for MockLinearVectorFunction {
    fn dimension(&self) -> usize {
        3
    }

    #[replace_numeric_literals(f64::from(literal))]
    fn eval_into(&mut self, f: &mut DVectorViewMut<f64>, x: &DVectorView<f64>) {
        let a = Matrix3::new(5, 1, 2, 1, 4, 2, 2, 2, 4);
        let b = Vector3::new(1, 2, 3);
        let r = a * x - b;
        f.copy_from(&r);
    }
}

impl DifferentiableVectorFunction<f64> for MockLinearVectorFunction {
    #[replace_numeric_literals(f64::from(literal))]
    fn solve_jacobian_system(
        &mut self,
        sol: &mut DVectorViewMut<f64>,
        _x: &DVectorView<f64>,
        rhs: &DVectorView<f64>,
    ) -> Result<(), Box<dyn Error>> {
        let a = Matrix3::new(5, 1, 2, 1, 4, 2, 2, 2, 4);
        let a_inv = a.try_inverse().ok_or("singular")?;
        sol.copy_from(&(a_inv * rhs));
        Ok(())
    }
}

/// f(x) = x^2 - 2, whose Newton iterates converge quadratically to sqrt(2).
struct SquareRootOfTwo;

impl VectorFunction<f64> for SquareRootOfTwo {
    fn dimension(&self) -> usize {
        1
    }

    fn eval_into(&mut self, f: &mut DVectorViewMut<f64>, x: &DVectorView<f64>) {
        f[0] = x[0] * x[0] - 2.0;
    }
}

impl DifferentiableVectorFunction<f64> for SquareRootOfTwo {
    fn solve_jacobian_system(
        &mut self,
        sol: &mut DVectorViewMut<f64>,
        x: &DVectorView<f64>,
        rhs: &DVectorView<f64>,
    ) -> Result<(), Box<dyn Error>> {
        if x[0] == 0.0 {
            return Err(Box::from("zero derivative"));
        }
        sol[0] = rhs[0] / (2.0 * x[0]);
        Ok(())
    }
}

#[test]
fn newton_converges_in_single_iteration_for_linear_system() {
    let expected_solution = Vector3::new(-0.125, 0.16666667, 0.72916667);

    let settings = NewtonSettings {
        max_iterations: Some(2),
        tolerance: Vector3::new(1.0, 2.0, 3.0).norm() * 1e-6,
    };

    let mut f = DVector::zeros(3);
    let mut x = DVector::zeros(3);
    let mut dx = DVector::zeros(3);

    let outcome =
        newton(MockLinearVectorFunction, &mut x, &mut f, &mut dx, settings).expect("Newton iterations must succeed");
    let diff = x - expected_solution;
    assert!(diff.norm() < 1e-6);
    assert_eq!(outcome.iterations, 1);
    assert!(outcome.converged);
}

#[test]
fn newton_reports_estimate_when_iteration_cap_is_hit() {
    let settings = NewtonSettings {
        max_iterations: Some(2),
        tolerance: 1e-15,
    };

    let mut f = DVector::zeros(1);
    let mut x = DVector::from_element(1, 1.0);
    let mut dx = DVector::zeros(1);

    let outcome = newton(SquareRootOfTwo, &mut x, &mut f, &mut dx, settings).expect("Linear solves cannot fail here");
    assert!(!outcome.converged);
    assert_eq!(outcome.iterations, 2);
    // 1 -> 1.5 -> 1.41666...
    assert!((x[0] - 17.0 / 12.0).abs() < 1e-14);
    assert!((outcome.residual_norm - f[0].abs()).abs() < 1e-15);
}

#[test]
fn newton_without_cap_converges_to_square_root() {
    let settings = NewtonSettings {
        max_iterations: None,
        tolerance: 1e-12,
    };

    let mut f = DVector::zeros(1);
    let mut x = DVector::from_element(1, 1.0);
    let mut dx = DVector::zeros(1);

    let outcome = newton(SquareRootOfTwo, &mut x, &mut f, &mut dx, settings).unwrap();
    assert!(outcome.converged);
    assert!((x[0] - 2.0f64.sqrt()).abs() < 1e-12);
}

#[test]
fn newton_propagates_jacobian_failure() {
    let settings = NewtonSettings {
        max_iterations: Some(10),
        tolerance: 1e-12,
    };

    let mut f = DVector::zeros(1);
    let mut x = DVector::zeros(1);
    let mut dx = DVector::zeros(1);

    let result = newton(SquareRootOfTwo, &mut x, &mut f, &mut dx, settings);
    assert!(matches!(result, Err(NewtonError::JacobianError(_))));
}
