use crate::element::ReferenceElement;
use crate::error::Error;
use crate::quadrature::{self, QuadratureRule};
use crate::Real;
use nalgebra::{DMatrix, DVector, DVectorView};
use numeric_literals::replace_float_literals;

/// The linear (4-node) tetrahedron on the unit 3-simplex.
///
/// Nodes are the corners `(0, 0, 0)`, `(1, 0, 0)`, `(0, 1, 0)`, `(0, 0, 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tet4;

impl<T> ReferenceElement<T> for Tet4
where
    T: Real,
{
    type Affine = Tet4;

    const ORDER: usize = 1;
    const REFERENCE_DIM: usize = 3;
    const NUM_NODES: usize = 4;
    const VERTICES: &'static [usize] = &[0, 1, 2, 3];

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_nodes(&self) -> DMatrix<T> {
        DMatrix::from_column_slice(3, 4, &[
            0.0, 0.0, 0.0,
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,
        ])
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate_basis(&self, xi: DVectorView<T>) -> DVector<T> {
        let (x, y, z) = (xi[0], xi[1], xi[2]);
        DVector::from_column_slice(&[1.0 - x - y - z, x, y, z])
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn basis_gradients(&self, _xi: DVectorView<T>) -> DMatrix<T> {
        DMatrix::from_row_slice(4, 3, &[
            -1.0, -1.0, -1.0,
             1.0,  0.0,  0.0,
             0.0,  1.0,  0.0,
             0.0,  0.0,  1.0,
        ])
    }

    fn quadrature_rule(&self, order: usize) -> Result<QuadratureRule<T>, Error> {
        quadrature::tetrahedron_rule(order)
    }
}

/// The quadratic (10-node) tetrahedron on the unit 3-simplex.
///
/// Nodes 0-3 are the corners; nodes 4-9 are the midpoints of the edges
/// `(0, 1)`, `(1, 2)`, `(0, 2)`, `(0, 3)`, `(1, 3)`, `(2, 3)`, in that order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tet10;

impl<T> ReferenceElement<T> for Tet10
where
    T: Real,
{
    type Affine = Tet4;

    const ORDER: usize = 2;
    const REFERENCE_DIM: usize = 3;
    const NUM_NODES: usize = 10;
    const VERTICES: &'static [usize] = &[0, 1, 2, 3];

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_nodes(&self) -> DMatrix<T> {
        DMatrix::from_column_slice(3, 10, &[
            0.0, 0.0, 0.0,
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,
            0.5, 0.0, 0.0,
            0.5, 0.5, 0.0,
            0.0, 0.5, 0.0,
            0.0, 0.0, 0.5,
            0.5, 0.0, 0.5,
            0.0, 0.5, 0.5,
        ])
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate_basis(&self, xi: DVectorView<T>) -> DVector<T> {
        // Barycentric coordinates of the unit 3-simplex.
        let l1 = xi[0];
        let l2 = xi[1];
        let l3 = xi[2];
        let l0 = 1.0 - l1 - l2 - l3;
        DVector::from_column_slice(&[
            l0 * (2.0 * l0 - 1.0),
            l1 * (2.0 * l1 - 1.0),
            l2 * (2.0 * l2 - 1.0),
            l3 * (2.0 * l3 - 1.0),
            4.0 * l0 * l1,
            4.0 * l1 * l2,
            4.0 * l0 * l2,
            4.0 * l0 * l3,
            4.0 * l1 * l3,
            4.0 * l2 * l3,
        ])
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn basis_gradients(&self, xi: DVectorView<T>) -> DMatrix<T> {
        let l1 = xi[0];
        let l2 = xi[1];
        let l3 = xi[2];
        let l0 = 1.0 - l1 - l2 - l3;
        DMatrix::from_row_slice(10, 3, &[
            1.0 - 4.0 * l0,   1.0 - 4.0 * l0,   1.0 - 4.0 * l0,
            4.0 * l1 - 1.0,   0.0,              0.0,
            0.0,              4.0 * l2 - 1.0,   0.0,
            0.0,              0.0,              4.0 * l3 - 1.0,
            4.0 * (l0 - l1),  -4.0 * l1,        -4.0 * l1,
            4.0 * l2,         4.0 * l1,         0.0,
            -4.0 * l2,        4.0 * (l0 - l2),  -4.0 * l2,
            -4.0 * l3,        -4.0 * l3,        4.0 * (l0 - l3),
            4.0 * l3,         0.0,              4.0 * l1,
            0.0,              4.0 * l3,         4.0 * l2,
        ])
    }

    fn quadrature_rule(&self, order: usize) -> Result<QuadratureRule<T>, Error> {
        quadrature::tetrahedron_rule(order)
    }
}
