use matrixcompare::assert_matrix_eq;
use nalgebra::{Matrix2, Matrix3, Point2, Point3, Vector2, Vector3, U2, U3};
use q1map::cell::{CellKey, HypercubeCell, MeshId};
use q1map::error::MappingError;
use q1map::flags::UpdateFlags;
use q1map::mapping::{InternalData, Mapping, MappingQ1};
use q1map::quadrature::tensor::{hexahedron_gauss, quadrilateral_gauss};
use q1map::quadrature::Quadrature;
use q1map::values::CellValues;

/// The affine map `x = A xi + b` with `A = [[2, 1], [0, 3]]`.
fn affine_quad() -> HypercubeCell<f64, U2> {
    let a = Matrix2::new(2.0, 1.0, 0.0, 3.0);
    let b = Vector2::new(-1.0, 0.5);
    let vertices = (0..4)
        .map(|k| {
            let xi = Vector2::new((k & 1) as f64, ((k >> 1) & 1) as f64);
            Point2::from(a * xi + b)
        })
        .collect();
    HypercubeCell::from_vertices(CellKey::new(MeshId::unique(), 0), vertices).unwrap()
}

fn filled_quad(flags: UpdateFlags) -> InternalData<f64, U2> {
    let quadrature = quadrilateral_gauss::<f64>(2);
    let mut data = <MappingQ1 as Mapping<f64, U2>>::get_data(&MappingQ1, flags, &quadrature);
    let mut values = CellValues::for_flags(data.update_flags(), quadrature.size());
    MappingQ1
        .fill_fe_values(&affine_quad(), &quadrature, &mut data, &mut values)
        .unwrap();
    data
}

#[test]
fn covariant_vectors_use_inverse_transpose() {
    let data = filled_quad(UpdateFlags::COVARIANT_TRANSFORMATION);
    let a = Matrix2::new(2.0, 1.0, 0.0, 3.0);
    let expected_map = a.try_inverse().unwrap().transpose();

    let input: Vec<_> = (0..4).map(|i| Vector2::new(1.0, i as f64)).collect();
    let mut output = vec![Vector2::zeros(); 4];
    MappingQ1
        .transform_covariant(&input, 0, &mut output, &data)
        .unwrap();
    for (v, w) in input.iter().zip(&output) {
        assert_matrix_eq!(*w, expected_map * v, comp = abs, tol = 1e-14);
    }
}

#[test]
fn contravariant_vectors_use_jacobian() {
    let data = filled_quad(UpdateFlags::CONTRAVARIANT_TRANSFORMATION);
    let a = Matrix2::new(2.0, 1.0, 0.0, 3.0);
    let input = vec![Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0), Vector2::new(1.0, 1.0), Vector2::new(-1.0, 2.0)];
    let mut output = vec![Vector2::zeros(); 4];
    MappingQ1
        .transform_contravariant(&input, 0, &mut output, &data)
        .unwrap();
    for (v, w) in input.iter().zip(&output) {
        assert_matrix_eq!(*w, a * v, comp = abs, tol = 1e-14);
    }
}

#[test]
fn tensors_are_transformed_from_the_left_or_right() {
    let data = filled_quad(UpdateFlags::INVERSE_JACOBIANS);
    let a = Matrix2::new(2.0, 1.0, 0.0, 3.0);
    let a_inv = a.try_inverse().unwrap();
    let t = Matrix2::new(1.0, -2.0, 0.5, 4.0);
    let input = vec![t; 4];

    let mut output = vec![Matrix2::zeros(); 4];
    MappingQ1
        .transform_covariant_tensors(&input, 0, &mut output, &data)
        .unwrap();
    for out in &output {
        assert_matrix_eq!(*out, t * a_inv, comp = abs, tol = 1e-14);
    }

    MappingQ1
        .transform_contravariant_tensors(&input, 0, &mut output, &data)
        .unwrap();
    for out in &output {
        assert_matrix_eq!(*out, a * t, comp = abs, tol = 1e-14);
    }
}

#[test]
fn offset_selects_the_input_block() {
    let data = filled_quad(UpdateFlags::CONTRAVARIANT_TRANSFORMATION);
    let a = Matrix2::new(2.0, 1.0, 0.0, 3.0);
    let input: Vec<_> = (0..6).map(|i| Vector2::new(i as f64, 1.0)).collect();
    let mut output = vec![Vector2::zeros(); 4];
    MappingQ1
        .transform_contravariant(&input, 2, &mut output, &data)
        .unwrap();
    for (i, w) in output.iter().enumerate() {
        assert_matrix_eq!(*w, a * input[i + 2], comp = abs, tol = 1e-14);
    }
}

#[test]
fn short_input_is_rejected() {
    let data = filled_quad(UpdateFlags::CONTRAVARIANT_TRANSFORMATION);
    let input = vec![Vector2::new(1.0, 0.0); 4];
    let mut output = vec![Vector2::zeros(); 4];
    let result = MappingQ1.transform_contravariant(&input, 1, &mut output, &data);
    assert_eq!(
        result,
        Err(MappingError::DimensionMismatch {
            field: "input",
            expected: 5,
            actual: 4
        })
    );
}

#[test]
fn output_longer_than_the_rule_is_rejected() {
    let data = filled_quad(UpdateFlags::CONTRAVARIANT_TRANSFORMATION);
    let input = vec![Vector2::new(1.0, 0.0); 5];
    let mut output = vec![Vector2::zeros(); 5];
    let result = MappingQ1.transform_contravariant(&input, 0, &mut output, &data);
    assert!(matches!(result, Err(MappingError::DimensionMismatch { field: "output", .. })));
}

#[test]
fn missing_transformation_is_reported() {
    let data = filled_quad(UpdateFlags::QUADRATURE_POINTS);
    let input = vec![Vector2::new(1.0, 0.0); 4];
    let mut output = vec![Vector2::zeros(); 4];
    assert_eq!(
        MappingQ1.transform_covariant(&input, 0, &mut output, &data),
        Err(MappingError::UninitializedField("covariant_transformation"))
    );
    assert_eq!(
        MappingQ1.transform_contravariant(&input, 0, &mut output, &data),
        Err(MappingError::UninitializedField("contravariant_transformation"))
    );
}

#[test]
fn covariant_gradients_on_a_scaled_hex() {
    // The gradient of a function in reference coordinates is pulled back with J^{-T}
    let cell = HypercubeCell::from_bounds(
        CellKey::new(MeshId::unique(), 0),
        &Point3::new(0.0, 0.0, 0.0),
        &Point3::new(2.0, 4.0, 0.5),
    );
    let quadrature = hexahedron_gauss::<f64>(1);
    let mut data = <MappingQ1 as Mapping<f64, U3>>::get_data(&MappingQ1, UpdateFlags::INVERSE_JACOBIANS, &quadrature);
    let mut values = CellValues::for_flags(data.update_flags(), quadrature.size());
    MappingQ1
        .fill_fe_values(&cell, &quadrature, &mut data, &mut values)
        .unwrap();

    let input = vec![Vector3::new(1.0, 1.0, 1.0); quadrature.size()];
    let mut output = vec![Vector3::zeros(); quadrature.size()];
    MappingQ1
        .transform_covariant(&input, 0, &mut output, &data)
        .unwrap();
    let scaling = Matrix3::from_diagonal(&Vector3::new(0.5, 0.25, 2.0));
    for w in &output {
        assert_matrix_eq!(*w, scaling * Vector3::new(1.0, 1.0, 1.0), comp = abs, tol = 1e-14);
    }
}
