use matrixcompare::assert_scalar_eq;
use nalgebra::{Point2, U1, U2, U3};
use q1map::cell::MappingCell;
use q1map::procedural::unit_box_cells;

#[test]
fn cell_counts() {
    assert_eq!(unit_box_cells::<f64, U1>(5).len(), 5);
    assert_eq!(unit_box_cells::<f64, U2>(3).len(), 9);
    assert_eq!(unit_box_cells::<f64, U3>(4).len(), 64);
    assert!(unit_box_cells::<f64, U2>(0).is_empty());
}

#[test]
fn cells_share_a_mesh_and_are_numbered() {
    let cells = unit_box_cells::<f64, U2>(3);
    let mesh = cells[0].key().mesh;
    for (index, cell) in cells.iter().enumerate() {
        assert_eq!(cell.key().mesh, mesh);
        assert_eq!(cell.key().index, index);
    }
    assert_ne!(unit_box_cells::<f64, U2>(3)[0].key().mesh, mesh);
}

#[test]
fn first_coordinate_varies_fastest() {
    let cells = unit_box_cells::<f64, U2>(2);
    let lower_corners: Vec<_> = cells.iter().map(|cell| cell.vertex(0)).collect();
    assert_eq!(
        lower_corners,
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.5, 0.0),
            Point2::new(0.0, 0.5),
            Point2::new(0.5, 0.5)
        ]
    );
    assert_eq!(cells[3].vertex(3), Point2::new(1.0, 1.0));
}

#[test]
fn cells_have_uniform_size() {
    for cell in unit_box_cells::<f64, U3>(4) {
        assert_scalar_eq!(cell.diameter(), 0.25 * 3.0f64.sqrt(), comp = abs, tol = 1e-14);
    }
}
