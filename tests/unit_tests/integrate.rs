use matrixcompare::assert_scalar_eq;
use nalgebra::{Point2, U2, U3};
use q1map::cell::{CellKey, HypercubeCell, MeshId};
use q1map::integrate::{integrate_scalar, measure, par_integrate_scalar, par_measure};
use q1map::mapping::MappingQ1;
use q1map::procedural::unit_box_cells;
use q1map::quadrature::hypercube_gauss;
use q1map::quadrature::tensor::quadrilateral_gauss;

#[test]
fn unit_box_has_unit_measure() {
    let quadrature = hypercube_gauss::<f64, U3>(1);
    for n in [1, 2, 5] {
        let cells = unit_box_cells::<f64, U3>(n);
        let volume = measure(&MappingQ1, &cells, &quadrature).unwrap();
        assert_scalar_eq!(volume, 1.0, comp = abs, tol = 1e-13);
    }
}

#[test]
fn empty_cell_list_integrates_to_zero() {
    let cells: Vec<HypercubeCell<f64, U2>> = Vec::new();
    let quadrature = quadrilateral_gauss::<f64>(2);
    assert_eq!(measure(&MappingQ1, &cells, &quadrature), Ok(0.0));
    assert_eq!(par_measure(&MappingQ1, &cells, &quadrature), Ok(0.0));
}

#[test]
fn polynomial_integral_over_subdivided_square() {
    // Integral of x^2 y over [0, 1]^2 is 1/6
    let cells = unit_box_cells::<f64, U2>(7);
    let quadrature = quadrilateral_gauss::<f64>(2);
    let integral = integrate_scalar(&MappingQ1, &cells, &quadrature, |x| x.x * x.x * x.y).unwrap();
    assert_scalar_eq!(integral, 1.0 / 6.0, comp = abs, tol = 1e-13);
}

#[test]
fn parallel_integration_matches_serial() {
    let cells = unit_box_cells::<f64, U2>(40);
    let quadrature = quadrilateral_gauss::<f64>(3);
    let f = |x: &Point2<f64>| (3.0 * x.x).sin() * x.y.exp();
    let serial = integrate_scalar(&MappingQ1, &cells, &quadrature, f).unwrap();
    let parallel = par_integrate_scalar(&MappingQ1, &cells, &quadrature, f).unwrap();
    assert_scalar_eq!(serial, parallel, comp = abs, tol = 1e-12);

    let exact = (1.0 - 3.0f64.cos()) / 3.0 * (1.0f64.exp() - 1.0);
    assert_scalar_eq!(serial, exact, comp = abs, tol = 1e-10);
}

#[test]
fn parallel_measure_of_many_cells() {
    let cells = unit_box_cells::<f64, U3>(10);
    let quadrature = hypercube_gauss::<f64, U3>(2);
    let volume = par_measure(&MappingQ1, &cells, &quadrature).unwrap();
    assert_scalar_eq!(volume, 1.0, comp = abs, tol = 1e-12);
}

#[test]
fn collapsed_cell_contributes_nothing() {
    let mut cells = unit_box_cells::<f64, U2>(3);
    let collapsed = HypercubeCell::from_vertices(
        CellKey::new(MeshId::unique(), 0),
        vec![Point2::new(0.0, 0.0); 4],
    )
    .unwrap();
    cells.push(collapsed);
    let quadrature = quadrilateral_gauss::<f64>(2);
    // Zero Jacobians are allowed as long as no inverse is requested
    assert_scalar_eq!(
        measure(&MappingQ1, &cells, &quadrature).unwrap(),
        1.0,
        comp = abs,
        tol = 1e-13
    );
}
