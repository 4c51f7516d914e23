use crate::element::ReferenceElement;
use crate::error::Error;
use crate::quadrature::{self, QuadratureRule};
use crate::Real;
use nalgebra::{DMatrix, DVector, DVectorView};
use numeric_literals::replace_float_literals;

/// The linear (3-node) triangle on the unit simplex
/// `{ (x, y) : x, y >= 0, x + y <= 1 }`.
///
/// Nodes are the corners `(0, 0)`, `(1, 0)`, `(0, 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tri3;

impl<T> ReferenceElement<T> for Tri3
where
    T: Real,
{
    type Affine = Tri3;

    const ORDER: usize = 1;
    const REFERENCE_DIM: usize = 2;
    const NUM_NODES: usize = 3;
    const VERTICES: &'static [usize] = &[0, 1, 2];

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_nodes(&self) -> DMatrix<T> {
        DMatrix::from_column_slice(2, 3, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0])
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate_basis(&self, xi: DVectorView<T>) -> DVector<T> {
        let (x, y) = (xi[0], xi[1]);
        DVector::from_column_slice(&[1.0 - x - y, x, y])
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn basis_gradients(&self, _xi: DVectorView<T>) -> DMatrix<T> {
        DMatrix::from_row_slice(3, 2, &[
            -1.0, -1.0,
             1.0,  0.0,
             0.0,  1.0,
        ])
    }

    fn quadrature_rule(&self, order: usize) -> Result<QuadratureRule<T>, Error> {
        quadrature::triangle_rule(order)
    }
}

/// The quadratic (6-node) triangle on the unit simplex.
///
/// Nodes 0-2 are the corners `(0, 0)`, `(1, 0)`, `(0, 1)`; nodes 3-5 are the
/// midpoints of the edges `(0, 1)`, `(1, 2)` and `(0, 2)`, in that order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tri6;

impl<T> ReferenceElement<T> for Tri6
where
    T: Real,
{
    type Affine = Tri3;

    const ORDER: usize = 2;
    const REFERENCE_DIM: usize = 2;
    const NUM_NODES: usize = 6;
    const VERTICES: &'static [usize] = &[0, 1, 2];

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_nodes(&self) -> DMatrix<T> {
        DMatrix::from_column_slice(2, 6, &[
            0.0, 0.0,
            1.0, 0.0,
            0.0, 1.0,
            0.5, 0.0,
            0.5, 0.5,
            0.0, 0.5,
        ])
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate_basis(&self, xi: DVectorView<T>) -> DVector<T> {
        // Barycentric coordinates of the unit simplex.
        let l1 = xi[0];
        let l2 = xi[1];
        let l0 = 1.0 - l1 - l2;
        DVector::from_column_slice(&[
            l0 * (2.0 * l0 - 1.0),
            l1 * (2.0 * l1 - 1.0),
            l2 * (2.0 * l2 - 1.0),
            4.0 * l0 * l1,
            4.0 * l1 * l2,
            4.0 * l0 * l2,
        ])
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn basis_gradients(&self, xi: DVectorView<T>) -> DMatrix<T> {
        let l1 = xi[0];
        let l2 = xi[1];
        let l0 = 1.0 - l1 - l2;
        DMatrix::from_row_slice(6, 2, &[
            1.0 - 4.0 * l0,       1.0 - 4.0 * l0,
            4.0 * l1 - 1.0,       0.0,
            0.0,                  4.0 * l2 - 1.0,
            4.0 * (l0 - l1),      -4.0 * l1,
            4.0 * l2,             4.0 * l1,
            -4.0 * l2,            4.0 * (l0 - l2),
        ])
    }

    fn quadrature_rule(&self, order: usize) -> Result<QuadratureRule<T>, Error> {
        quadrature::triangle_rule(order)
    }
}
