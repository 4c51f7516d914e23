use massif::element::{Hex8, Quad4, ReferenceElement, Tet10, Tet4, Tri3, Tri6};
use matrixcompare::assert_matrix_eq;
use nalgebra::{DMatrix, DVector};
use proptest::prelude::*;

/// Central differences are exact (up to roundoff) for the polynomial bases
/// under test, since no basis has a nonzero third derivative along an axis.
fn numerical_gradients<E>(element: &E, xi: &DVector<f64>) -> DMatrix<f64>
where
    E: ReferenceElement<f64>,
{
    let h = 1e-5;
    let mut gradients = DMatrix::zeros(E::NUM_NODES, E::REFERENCE_DIM);
    for k in 0..E::REFERENCE_DIM {
        let mut forward = xi.clone();
        forward[k] += h;
        let mut backward = xi.clone();
        backward[k] -= h;
        let difference = (element.evaluate_basis((&forward).into())
            - element.evaluate_basis((&backward).into()))
            / (2.0 * h);
        for i in 0..E::NUM_NODES {
            gradients[(i, k)] = difference[i];
        }
    }
    gradients
}

fn assert_lagrange_property<E>(element: &E)
where
    E: ReferenceElement<f64>,
{
    let nodes = element.reference_nodes();
    assert_eq!(nodes.nrows(), E::REFERENCE_DIM);
    assert_eq!(nodes.ncols(), E::NUM_NODES);
    for j in 0..E::NUM_NODES {
        let values = element.evaluate_basis(nodes.column(j));
        for i in 0..E::NUM_NODES {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!(
                (values[i] - expected).abs() < 1e-14,
                "basis {} at node {} evaluated to {}",
                i,
                j,
                values[i]
            );
        }
    }
}

fn assert_partition_of_unity<E>(element: &E, xi: &DVector<f64>)
where
    E: ReferenceElement<f64>,
{
    let values = element.evaluate_basis((&*xi).into());
    assert!((values.sum() - 1.0).abs() < 1e-14);
    // Differentiating sum N_i = 1 gives columns of gradients that sum to 0.
    let gradients = element.basis_gradients((&*xi).into());
    for k in 0..E::REFERENCE_DIM {
        assert!(gradients.column(k).sum().abs() < 1e-13);
    }
}

#[test]
fn simplex_elements_are_lagrange_bases() {
    assert_lagrange_property(&Tri3);
    assert_lagrange_property(&Tri6);
    assert_lagrange_property(&Tet4);
    assert_lagrange_property(&Tet10);
}

#[test]
fn box_elements_are_lagrange_bases() {
    assert_lagrange_property(&Quad4);
    assert_lagrange_property(&Hex8);
}

#[test]
fn bases_partition_unity_at_interior_points() {
    assert_partition_of_unity(&Tri3, &DVector::from_column_slice(&[0.31, 0.22]));
    assert_partition_of_unity(&Tri6, &DVector::from_column_slice(&[0.13, 0.48]));
    assert_partition_of_unity(&Tet4, &DVector::from_column_slice(&[0.21, 0.17, 0.33]));
    assert_partition_of_unity(&Tet10, &DVector::from_column_slice(&[0.05, 0.41, 0.27]));
    assert_partition_of_unity(&Quad4, &DVector::from_column_slice(&[-0.4, 0.75]));
    assert_partition_of_unity(&Hex8, &DVector::from_column_slice(&[0.6, -0.2, -0.85]));
}

#[test]
fn gradients_match_central_differences() {
    let tri_point = DVector::from_column_slice(&[0.24, 0.37]);
    let tet_point = DVector::from_column_slice(&[0.18, 0.29, 0.22]);
    let quad_point = DVector::from_column_slice(&[0.35, -0.6]);
    let hex_point = DVector::from_column_slice(&[-0.45, 0.1, 0.7]);

    assert_matrix_eq!(
        Tri6.basis_gradients((&tri_point).into()),
        numerical_gradients(&Tri6, &tri_point),
        comp = abs,
        tol = 1e-9
    );
    assert_matrix_eq!(
        Tet10.basis_gradients((&tet_point).into()),
        numerical_gradients(&Tet10, &tet_point),
        comp = abs,
        tol = 1e-9
    );
    assert_matrix_eq!(
        Quad4.basis_gradients((&quad_point).into()),
        numerical_gradients(&Quad4, &quad_point),
        comp = abs,
        tol = 1e-9
    );
    assert_matrix_eq!(
        Hex8.basis_gradients((&hex_point).into()),
        numerical_gradients(&Hex8, &hex_point),
        comp = abs,
        tol = 1e-9
    );
}

#[test]
fn vertices_index_the_affine_hull() {
    assert_eq!(<Tri3 as ReferenceElement<f64>>::VERTICES, &[0, 1, 2]);
    assert_eq!(<Tri6 as ReferenceElement<f64>>::VERTICES, &[0, 1, 2]);
    assert_eq!(<Tet10 as ReferenceElement<f64>>::VERTICES, &[0, 1, 2, 3]);
    assert_eq!(<Hex8 as ReferenceElement<f64>>::VERTICES.len(), 8);
}

proptest! {
    #[test]
    fn tri6_partitions_unity(a in 0.0..1.0f64, b in 0.0..1.0f64) {
        // Reflect points from the unit square into the reference triangle.
        let (x, y) = if a + b <= 1.0 { (a, b) } else { (1.0 - a, 1.0 - b) };
        let xi = DVector::from_column_slice(&[x, y]);
        let values = Tri6.evaluate_basis((&xi).into());
        prop_assert!((values.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tet10_partitions_unity(a in 0.0..0.33f64, b in 0.0..0.33f64, c in 0.0..0.33f64) {
        let xi = DVector::from_column_slice(&[a, b, c]);
        let values = Tet10.evaluate_basis((&xi).into());
        prop_assert!((values.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn hex8_partitions_unity(a in -1.0..1.0f64, b in -1.0..1.0f64, c in -1.0..1.0f64) {
        let xi = DVector::from_column_slice(&[a, b, c]);
        let values = Hex8.evaluate_basis((&xi).into());
        prop_assert!((values.sum() - 1.0).abs() < 1e-12);
    }
}
