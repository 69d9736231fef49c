use matrixcompare::assert_scalar_eq;
use nalgebra::{Point2, Point3, U2, U3};
use q1map::cell::{CellKey, HypercubeCell, MappingCell, MeshId};
use q1map::error::MappingError;
use q1map::reference::{FaceOrientation, SubfaceCase};

#[test]
fn from_vertices_checks_vertex_count() {
    let key = CellKey::new(MeshId::unique(), 0);
    let result = HypercubeCell::<f64, U2>::from_vertices(key, vec![Point2::origin(); 3]);
    assert_eq!(
        result,
        Err(MappingError::DimensionMismatch {
            field: "vertices",
            expected: 4,
            actual: 3
        })
    );
}

#[test]
fn from_bounds_orders_vertices_by_bits() {
    let key = CellKey::new(MeshId::unique(), 7);
    let cell = HypercubeCell::from_bounds(key, &Point3::new(1.0, 2.0, 3.0), &Point3::new(2.0, 4.0, 6.0));
    assert_eq!(cell.vertex(0), Point3::new(1.0, 2.0, 3.0));
    assert_eq!(cell.vertex(1), Point3::new(2.0, 2.0, 3.0));
    assert_eq!(cell.vertex(2), Point3::new(1.0, 4.0, 3.0));
    assert_eq!(cell.vertex(4), Point3::new(1.0, 2.0, 6.0));
    assert_eq!(cell.vertex(7), Point3::new(2.0, 4.0, 6.0));
    assert_eq!(cell.key(), key);
}

#[test]
fn diameter_is_longest_vertex_distance() {
    let key = CellKey::new(MeshId::unique(), 0);
    let cell = HypercubeCell::from_bounds(key, &Point3::origin(), &Point3::new(1.0, 2.0, 2.0));
    assert_scalar_eq!(cell.diameter(), 3.0, comp = abs, tol = 1e-14);

    let unit = HypercubeCell::<f64, U2>::reference(key);
    assert_scalar_eq!(unit.diameter(), 2.0f64.sqrt(), comp = abs, tol = 1e-14);
}

#[test]
fn default_face_properties() {
    let cell = HypercubeCell::<f64, U3>::reference(CellKey::new(MeshId::unique(), 0));
    for face in 0..6 {
        assert!(cell.face_orientation(face));
        assert!(!cell.face_flip(face));
        assert!(!cell.face_rotation(face));
        assert_eq!(cell.subface_case(face), SubfaceCase::Isotropic);
    }
}

#[test]
fn face_properties_can_be_overridden() {
    let orientation = FaceOrientation {
        orientation: false,
        flip: true,
        rotation: false,
    };
    let cell = HypercubeCell::<f64, U3>::reference(CellKey::new(MeshId::unique(), 0))
        .with_face_orientation(4, orientation)
        .with_subface_case(2, SubfaceCase::CutY);
    assert!(!cell.face_orientation(4));
    assert!(cell.face_flip(4));
    assert!(cell.face_orientation(3));
    assert_eq!(cell.subface_case(2), SubfaceCase::CutY);
}

#[test]
fn mesh_ids_are_unique() {
    let a = MeshId::unique();
    let b = MeshId::unique();
    assert_ne!(a, b);
    assert_ne!(CellKey::new(a, 0), CellKey::new(b, 0));
    assert_eq!(MeshId::from_raw(a.raw()), a);
}
