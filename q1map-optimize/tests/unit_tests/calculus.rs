use matrixcompare::assert_matrix_eq;
use nalgebra::{DMatrix, DVector};
use q1map_optimize::calculus::approximate_jacobian_fd;

#[test]
fn approximate_jacobian_of_polynomial_map() {
    // f(x1, x2) = [x1 * x2 + 3, x1^2 + x2^2 + x1 + 5]
    let mut x = DVector::from_column_slice(&[3.0, 4.0]);
    let j = approximate_jacobian_fd(
        2,
        |x, mut f| {
            f[0] = x[0] * x[1] + 3.0;
            f[1] = x[0] * x[0] + x[1] * x[1] + x[0] + 5.0;
        },
        &mut x,
        1e-6,
    );

    // J = [   x2           x1 ]
    //     [ 2*x1 + 1     2*x2 ]
    #[rustfmt::skip]
    let expected = DMatrix::from_row_slice(2, 2,
                                           &[4.0, 3.0,
                                             7.0, 8.0]);
    assert_matrix_eq!(j, expected, comp = abs, tol = 1e-6);

    // The evaluation point is restored
    assert_eq!(x, DVector::from_column_slice(&[3.0, 4.0]));
}
