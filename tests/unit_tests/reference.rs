use massif::element::{Quad4, ReferenceElement, Tri3};
use massif::reference::{AffineReferencePositions, ReferencePositionSolver};
use massif::{Error, Mesh};
use matrixcompare::assert_matrix_eq;
use nalgebra::DMatrix;

/// Forward-maps reference points through each tagged element's geometry.
fn forward_map<E>(mesh: &Mesh<f64, E>, elements: &[usize], reference: &DMatrix<f64>) -> DMatrix<f64>
where
    E: ReferenceElement<f64>,
{
    let mut domain = DMatrix::zeros(mesh.geometry_dim(), reference.ncols());
    for (p, &e) in elements.iter().enumerate() {
        let values = mesh.element().evaluate_basis(reference.column(p));
        let nodes = mesh.element_nodes(e);
        let mut x = nalgebra::DVector::zeros(mesh.geometry_dim());
        for (i, &node) in nodes.iter().enumerate() {
            x.axpy(values[i], &mesh.vertices().column(node), 1.0);
        }
        domain.set_column(p, &x);
    }
    domain
}

#[test]
fn triangle_positions_round_trip() {
    let vertices = DMatrix::from_column_slice(2, 4, &[0.0, 0.0, 2.0, 0.0, 0.0, 1.0, 2.0, 1.0]);
    let connectivity = DMatrix::from_column_slice(3, 2, &[0, 1, 2, 1, 3, 2]);
    let mesh: Mesh<f64, Tri3> =
        Mesh::from_vertices_and_connectivity(vertices, connectivity).unwrap();

    let reference = DMatrix::from_column_slice(2, 3, &[0.1, 0.2, 0.5, 0.25, 0.3, 0.3]);
    let elements = [0, 1, 1];
    let domain = forward_map(&mesh, &elements, &reference);

    let solver = AffineReferencePositions;
    let recovered = solver
        .reference_positions(&mesh, &elements, &domain)
        .unwrap();
    assert_matrix_eq!(recovered, reference, comp = abs, tol = 1e-13);
}

#[test]
fn parallelogram_positions_round_trip() {
    // For a parallelogram the bilinear geometric map is affine, so the
    // closed-form inverse is exact.
    let vertices = DMatrix::from_column_slice(2, 4, &[0.0, 0.0, 2.0, 0.0, 3.0, 1.0, 1.0, 1.0]);
    let connectivity = DMatrix::from_column_slice(4, 1, &[0, 1, 2, 3]);
    let mesh: Mesh<f64, Quad4> =
        Mesh::from_vertices_and_connectivity(vertices, connectivity).unwrap();

    let reference = DMatrix::from_column_slice(2, 2, &[0.25, -0.5, -0.8, 0.6]);
    let elements = [0, 0];
    let domain = forward_map(&mesh, &elements, &reference);

    let solver = AffineReferencePositions;
    let recovered = solver
        .reference_positions(&mesh, &elements, &domain)
        .unwrap();
    assert_matrix_eq!(recovered, reference, comp = abs, tol = 1e-13);
}

#[test]
fn embedded_triangle_positions_round_trip() {
    // A triangle in 3d space; its Jacobian is rectangular and the inverse is
    // taken in the least-squares sense, which is exact for points on the
    // element.
    let vertices =
        DMatrix::from_column_slice(3, 3, &[0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.5]);
    let connectivity = DMatrix::from_column_slice(3, 1, &[0, 1, 2]);
    let mesh: Mesh<f64, Tri3> =
        Mesh::from_vertices_and_connectivity(vertices, connectivity).unwrap();

    let reference = DMatrix::from_column_slice(2, 1, &[0.3, 0.4]);
    let elements = [0];
    let domain = forward_map(&mesh, &elements, &reference);

    let solver = AffineReferencePositions;
    let recovered = solver
        .reference_positions(&mesh, &elements, &domain)
        .unwrap();
    assert_matrix_eq!(recovered, reference, comp = abs, tol = 1e-13);
}

#[test]
fn invalid_inputs_are_rejected() {
    let vertices = DMatrix::from_column_slice(2, 3, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    let connectivity = DMatrix::from_column_slice(3, 1, &[0, 1, 2]);
    let mesh: Mesh<f64, Tri3> =
        Mesh::from_vertices_and_connectivity(vertices, connectivity).unwrap();
    let solver = AffineReferencePositions;

    let points = DMatrix::from_column_slice(3, 1, &[0.1, 0.2, 0.3]);
    assert!(matches!(
        solver.reference_positions(&mesh, &[0], &points),
        Err(Error::PointDimensionMismatch { expected: 2, found: 3 })
    ));

    let points = DMatrix::from_column_slice(2, 1, &[0.1, 0.2]);
    assert!(matches!(
        solver.reference_positions(&mesh, &[0, 0], &points),
        Err(Error::ShapeMismatch { .. })
    ));
    assert!(matches!(
        solver.reference_positions(&mesh, &[3], &points),
        Err(Error::InvalidElementIndex { index: 3, num_elements: 1 })
    ));
}

#[test]
fn degenerate_elements_are_reported() {
    // Duplicate vertices collapse the triangle.
    let vertices = DMatrix::from_column_slice(2, 3, &[0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
    let connectivity = DMatrix::from_column_slice(3, 1, &[0, 1, 2]);
    let mesh: Mesh<f64, Tri3> =
        Mesh::from_vertices_and_connectivity(vertices, connectivity).unwrap();
    let solver = AffineReferencePositions;
    let points = DMatrix::from_column_slice(2, 1, &[0.5, 0.5]);
    assert!(matches!(
        solver.reference_positions(&mesh, &[0], &points),
        Err(Error::SingularJacobian)
    ));
}
