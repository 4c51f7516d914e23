use crate::element::ReferenceElement;
use crate::error::Error;
use crate::quadrature::{self, QuadratureRule};
use crate::Real;
use nalgebra::{DMatrix, DVector, DVectorView};
use numeric_literals::replace_float_literals;

/// The trilinear (8-node) hexahedron on the reference cube `[-1, 1]^3`.
///
/// Nodes are the corners of the bottom face `(-1, -1, -1)`, `(1, -1, -1)`,
/// `(1, 1, -1)`, `(-1, 1, -1)` followed by the corners of the top face in the
/// same order.
///
/// As with the quadrilateral, the geometric map is only affine for
/// parallelepiped elements (e.g. axis-aligned cells of an octree mesh);
/// gradient transforms through the Jacobian are exact in that case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hex8;

/// Sign pattern of the reference corners, in node order.
#[rustfmt::skip]
const HEX8_SIGNS: [(f64, f64, f64); 8] = [
    (-1.0, -1.0, -1.0),
    ( 1.0, -1.0, -1.0),
    ( 1.0,  1.0, -1.0),
    (-1.0,  1.0, -1.0),
    (-1.0, -1.0,  1.0),
    ( 1.0, -1.0,  1.0),
    ( 1.0,  1.0,  1.0),
    (-1.0,  1.0,  1.0),
];

impl<T> ReferenceElement<T> for Hex8
where
    T: Real,
{
    type Affine = Hex8;

    const ORDER: usize = 1;
    const REFERENCE_DIM: usize = 3;
    const NUM_NODES: usize = 8;
    const VERTICES: &'static [usize] = &[0, 1, 2, 3, 4, 5, 6, 7];

    fn reference_nodes(&self) -> DMatrix<T> {
        DMatrix::from_fn(3, 8, |i, j| {
            let (alpha, beta, gamma) = HEX8_SIGNS[j];
            let coords = [alpha, beta, gamma];
            T::from_f64(coords[i]).expect("Literal must fit in T")
        })
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate_basis(&self, xi: DVectorView<T>) -> DVector<T> {
        DVector::from_fn(8, |j, _| {
            let (alpha, beta, gamma) = HEX8_SIGNS[j];
            let alpha = T::from_f64(alpha).unwrap();
            let beta = T::from_f64(beta).unwrap();
            let gamma = T::from_f64(gamma).unwrap();
            (1.0 + alpha * xi[0]) * (1.0 + beta * xi[1]) * (1.0 + gamma * xi[2]) / 8.0
        })
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn basis_gradients(&self, xi: DVectorView<T>) -> DMatrix<T> {
        DMatrix::from_fn(8, 3, |j, i| {
            let (alpha, beta, gamma) = HEX8_SIGNS[j];
            let alpha = T::from_f64(alpha).unwrap();
            let beta = T::from_f64(beta).unwrap();
            let gamma = T::from_f64(gamma).unwrap();
            match i {
                0 => alpha * (1.0 + beta * xi[1]) * (1.0 + gamma * xi[2]) / 8.0,
                1 => beta * (1.0 + alpha * xi[0]) * (1.0 + gamma * xi[2]) / 8.0,
                _ => gamma * (1.0 + alpha * xi[0]) * (1.0 + beta * xi[1]) / 8.0,
            }
        })
    }

    fn quadrature_rule(&self, order: usize) -> Result<QuadratureRule<T>, Error> {
        quadrature::gauss_box_rule(3, order)
    }
}
