use super::point_from_view;
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::{DMatrix, DVector, Matrix2, Matrix3, OMatrix, OPoint, OVector, Point2, Point3, Vector2, U1, U2, U3};
use paste::paste;
use proptest::prelude::*;
use q1map::optimize::calculus::approximate_jacobian_fd;
use q1map::proptest::reference_point;
use q1map::reference::ReferenceCell;
use q1map::shape::{compute_shapes, gradient, hessian, n_shape_functions, value};

macro_rules! shape_function_tests {
    ($dim:ty, $suffix:ident) => {
        paste! {
            proptest! {
                #[test]
                fn [<partition_of_unity_ $suffix>](xi in reference_point::<$dim>()) {
                    let sum: f64 = (0..n_shape_functions::<$dim>()).map(|k| value(k, &xi)).sum();
                    prop_assert!((sum - 1.0).abs() <= 1e-12);
                }

                #[test]
                fn [<partition_of_unity_gradient_ $suffix>](xi in reference_point::<$dim>()) {
                    // Since the sum of shape functions is 1, the sum of the gradients must be 0
                    let sum = (0..n_shape_functions::<$dim>())
                        .map(|k| gradient(k, &xi))
                        .fold(OVector::<f64, $dim>::zeros(), |acc, g| acc + g);
                    assert_matrix_eq!(sum, OVector::<f64, $dim>::zeros(), comp = abs, tol = 1e-12);
                }

                #[test]
                fn [<gradient_matches_finite_differences_ $suffix>](xi in reference_point::<$dim>()) {
                    let d = <$dim as nalgebra::DimName>::dim();
                    for k in 0..n_shape_functions::<$dim>() {
                        let mut x = DVector::from_iterator(d, xi.coords.iter().copied());
                        let fd = approximate_jacobian_fd(
                            1,
                            |x, mut f| f[0] = value(k, &point_from_view::<$dim>(&x)),
                            &mut x,
                            1e-6,
                        );
                        let expected = DMatrix::from_iterator(1, d, gradient(k, &xi).iter().copied());
                        assert_matrix_eq!(fd, expected, comp = abs, tol = 1e-8);
                    }
                }

                #[test]
                fn [<hessian_matches_finite_differences_ $suffix>](xi in reference_point::<$dim>()) {
                    let d = <$dim as nalgebra::DimName>::dim();
                    for k in 0..n_shape_functions::<$dim>() {
                        let mut x = DVector::from_iterator(d, xi.coords.iter().copied());
                        let fd = approximate_jacobian_fd(
                            d,
                            |x, mut f| f.copy_from(&gradient(k, &point_from_view::<$dim>(&x))),
                            &mut x,
                            1e-6,
                        );
                        let expected = DMatrix::from_iterator(d, d, hessian(k, &xi).iter().copied());
                        assert_matrix_eq!(fd, expected, comp = abs, tol = 1e-8);
                    }
                }
            }

            #[test]
            fn [<shape_functions_interpolate_vertices_ $suffix>]() {
                let n = n_shape_functions::<$dim>();
                for k in 0..n {
                    for l in 0..n {
                        let vertex = <$dim as ReferenceCell>::unit_vertex::<f64>(l);
                        let expected = if k == l { 1.0 } else { 0.0 };
                        assert_scalar_eq!(value(k, &vertex), expected);
                    }
                }
            }

            #[test]
            fn [<shape_functions_at_center_ $suffix>]() {
                let center = OPoint::<f64, $dim>::from(OVector::<f64, $dim>::repeat(0.5));
                let n = n_shape_functions::<$dim>();
                for k in 0..n {
                    assert_scalar_eq!(value(k, &center), 1.0 / n as f64, comp = abs, tol = 1e-15);
                    let h = hessian(k, &center);
                    for j in 0..<$dim as nalgebra::DimName>::dim() {
                        assert_scalar_eq!(h[(j, j)], 0.0);
                    }
                }
            }
        }
    };
}

shape_function_tests!(U1, segment);
shape_function_tests!(U2, quad);
shape_function_tests!(U3, hex);

#[test]
fn shape_function_count() {
    assert_eq!(n_shape_functions::<U1>(), 2);
    assert_eq!(n_shape_functions::<U2>(), 4);
    assert_eq!(n_shape_functions::<U3>(), 8);
}

#[test]
fn quadrilateral_shape_functions_closed_form() {
    let (x, y) = (0.3, 0.8);
    let xi = Point2::new(x, y);
    let expected_values = [(1.0 - x) * (1.0 - y), x * (1.0 - y), (1.0 - x) * y, x * y];
    let expected_gradients = [
        Vector2::new(y - 1.0, x - 1.0),
        Vector2::new(1.0 - y, -x),
        Vector2::new(-y, 1.0 - x),
        Vector2::new(y, x),
    ];
    let expected_mixed = [1.0, -1.0, -1.0, 1.0];
    for k in 0..4 {
        assert_scalar_eq!(value(k, &xi), expected_values[k], comp = abs, tol = 1e-15);
        assert_matrix_eq!(gradient(k, &xi), expected_gradients[k], comp = abs, tol = 1e-15);
        let expected_hessian = Matrix2::new(0.0, expected_mixed[k], expected_mixed[k], 0.0);
        assert_matrix_eq!(hessian(k, &xi), expected_hessian, comp = abs, tol = 1e-15);
    }
}

#[test]
fn hexahedron_mixed_second_derivatives() {
    let (x, y, z) = (0.2, 0.7, 0.4);
    let xi = Point3::new(x, y, z);
    // Vertex 5 sits at (1, 0, 1): N_5 = x (1 - y) z
    #[rustfmt::skip]
    let expected = Matrix3::new(
        0.0,  -z,        1.0 - y,
        -z,   0.0,       -x,
        1.0 - y, -x,     0.0);
    assert_matrix_eq!(hessian(5, &xi), expected, comp = abs, tol = 1e-15);
    assert_scalar_eq!(value(5, &xi), x * (1.0 - y) * z, comp = abs, tol = 1e-15);
}

#[test]
fn unit_cube_corner_values() {
    let xi = Point3::<f64>::origin();
    for k in 0..8 {
        let expected = if k == 0 { 1.0 } else { 0.0 };
        assert_scalar_eq!(value(k, &xi), expected);
    }
}

#[test]
fn compute_shapes_fills_only_allocated_buffers() {
    let points = vec![Point2::new(0.25, 0.5), Point2::new(1.0, 0.0)];
    let mut values = vec![0.0; 8];
    let mut gradients: Vec<Vector2<f64>> = vec![];
    let mut hessians = vec![OMatrix::<f64, U2, U2>::identity(); 8];
    compute_shapes(&points, &mut values, &mut gradients, &mut hessians);

    assert!(gradients.is_empty());
    for (q, xi) in points.iter().enumerate() {
        for k in 0..4 {
            assert_scalar_eq!(values[q * 4 + k], value(k, xi));
            assert_matrix_eq!(hessians[q * 4 + k], hessian(k, xi));
        }
    }
}

#[test]
#[should_panic]
fn compute_shapes_rejects_wrongly_sized_buffers() {
    let points = vec![Point2::new(0.25, 0.5)];
    let mut values = vec![0.0; 3];
    compute_shapes::<f64, U2>(&points, &mut values, &mut [], &mut []);
}
