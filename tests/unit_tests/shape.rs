use massif::element::{ReferenceElement, Tri3, Tri6};
use massif::reference::AffineReferencePositions;
use massif::shape::{
    basis_at_points, basis_at_quadrature, basis_at_reference_points, integrated_basis,
    shape_function_matrix, shape_function_matrix_at,
};
use massif::{Error, Mesh, QuadratureRule};
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::DMatrix;

fn two_triangle_unit_square() -> Mesh<f64, Tri3> {
    let vertices = DMatrix::from_column_slice(2, 4, &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
    let connectivity = DMatrix::from_column_slice(3, 2, &[0, 1, 3, 1, 2, 3]);
    Mesh::from_vertices_and_connectivity(vertices, connectivity).unwrap()
}

fn stretched_triangle() -> Mesh<f64, Tri3> {
    // A single triangle with vertices (0, 0), (2, 0), (0, 1).
    let vertices = DMatrix::from_column_slice(2, 3, &[0.0, 0.0, 2.0, 0.0, 0.0, 1.0]);
    let connectivity = DMatrix::from_column_slice(3, 1, &[0, 1, 2]);
    Mesh::from_vertices_and_connectivity(vertices, connectivity).unwrap()
}

#[test]
fn quadrature_basis_values_partition_unity() {
    let values = basis_at_quadrature::<f64, _>(&Tri6, 4).unwrap();
    let rule: QuadratureRule<f64> = Tri6.quadrature_rule(4).unwrap();
    assert_eq!(values.nrows(), 6);
    assert_eq!(values.ncols(), rule.num_points());
    for g in 0..values.ncols() {
        assert_scalar_eq!(values.column(g).sum(), 1.0, comp = abs, tol = 1e-14);
    }
}

#[test]
fn shape_function_matrix_rows_partition_unity() {
    let mesh = two_triangle_unit_square();
    let matrix = shape_function_matrix(&mesh, 2).unwrap();
    let rule: QuadratureRule<f64> = Tri3.quadrature_rule(2).unwrap();
    assert_eq!(matrix.nrows(), mesh.num_elements() * rule.num_points());
    assert_eq!(matrix.ncols(), mesh.num_nodes());

    let mut row_sums = vec![0.0; matrix.nrows()];
    for (i, _, value) in matrix.triplet_iter() {
        row_sums[i] += *value;
    }
    for sum in row_sums {
        assert_scalar_eq!(sum, 1.0, comp = abs, tol = 1e-14);
    }
}

#[test]
fn shape_function_matrix_at_reference_nodes_selects_nodes() {
    let mesh = two_triangle_unit_square();
    let solver = AffineReferencePositions;
    // The reference nodes of element 1, tagged as belonging to element 1.
    let points = Tri3.reference_nodes();
    let elements = [1, 1, 1];
    let matrix = shape_function_matrix_at(&mesh, &elements, &points, true, &solver).unwrap();
    assert_eq!(matrix.nrows(), 3);
    assert_eq!(matrix.ncols(), mesh.num_nodes());

    // Row i must be the indicator of the i-th node of element 1.
    let mut dense: DMatrix<f64> = DMatrix::zeros(matrix.nrows(), matrix.ncols());
    for (i, j, value) in matrix.triplet_iter() {
        dense[(i, j)] += *value;
    }
    let nodes = mesh.element_nodes(1);
    for i in 0..3 {
        for j in 0..mesh.num_nodes() {
            let expected = if j == nodes[i] { 1.0 } else { 0.0 };
            assert_scalar_eq!(dense[(i, j)], expected, comp = abs, tol = 1e-14);
        }
    }
}

#[test]
fn domain_points_resolve_to_reference_coordinates() {
    let mesh = stretched_triangle();
    let solver = AffineReferencePositions;

    // Forward-map two reference points through the element geometry, then
    // evaluate at the images in domain space.
    let reference = DMatrix::from_column_slice(2, 2, &[0.1, 0.2, 0.5, 0.25]);
    let mut domain = DMatrix::zeros(2, 2);
    for p in 0..2 {
        let values = mesh.element().evaluate_basis(reference.column(p));
        domain.set_column(p, &(mesh.vertices() * values));
    }

    let elements = [0, 0];
    let from_domain = basis_at_points(&mesh, &elements, &domain, false, &solver).unwrap();
    let from_reference = basis_at_reference_points(mesh.element(), &reference).unwrap();
    assert_matrix_eq!(from_domain, from_reference, comp = abs, tol = 1e-13);
}

#[test]
fn integrated_basis_recovers_element_areas() {
    let mesh = two_triangle_unit_square();
    let rule: QuadratureRule<f64> = Tri3.quadrature_rule(2).unwrap();
    let det_j = DMatrix::from_element(rule.num_points(), mesh.num_elements(), 1.0);
    let integrals = integrated_basis(&mesh, &det_j, 2).unwrap();

    // With unit Jacobian determinants every basis function integrates to a
    // third of the element area.
    let expected = DMatrix::from_element(3, 2, 0.5 / 3.0);
    assert_matrix_eq!(integrals, expected, comp = abs, tol = 1e-14);

    // Column sums recover the element areas, and the grand total the domain
    // area.
    for e in 0..mesh.num_elements() {
        assert_scalar_eq!(integrals.column(e).sum(), 0.5, comp = abs, tol = 1e-14);
    }
    assert_scalar_eq!(integrals.sum(), 1.0, comp = abs, tol = 1e-14);
}

#[test]
fn mismatched_inputs_are_rejected() {
    let mesh = two_triangle_unit_square();
    let solver = AffineReferencePositions;

    // detJe of the wrong shape.
    let det_j = DMatrix::from_element(2, 2, 1.0);
    assert!(matches!(
        integrated_basis(&mesh, &det_j, 2),
        Err(Error::ShapeMismatch { quantity: "detJe", .. })
    ));

    // Points of the wrong reference dimension.
    let points = DMatrix::from_column_slice(3, 1, &[0.1, 0.2, 0.3]);
    assert!(matches!(
        basis_at_reference_points(&Tri3, &points),
        Err(Error::PointDimensionMismatch { expected: 2, found: 3 })
    ));

    // One element tag per point is required.
    let points = DMatrix::from_column_slice(2, 2, &[0.1, 0.2, 0.3, 0.3]);
    assert!(matches!(
        shape_function_matrix_at(&mesh, &[0], &points, true, &solver),
        Err(Error::ShapeMismatch { .. })
    ));
}

#[test]
fn unsupported_quadrature_orders_propagate() {
    let mesh = two_triangle_unit_square();
    assert!(matches!(
        shape_function_matrix(&mesh, 9),
        Err(Error::NoRuleAvailable { .. })
    ));
}
