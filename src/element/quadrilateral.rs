use crate::element::ReferenceElement;
use crate::error::Error;
use crate::quadrature::{self, QuadratureRule};
use crate::Real;
use nalgebra::{DMatrix, DVector, DVectorView};
use numeric_literals::replace_float_literals;

/// The bilinear (4-node) quadrilateral on the reference square `[-1, 1]^2`.
///
/// Nodes are the corners `(-1, -1)`, `(1, -1)`, `(1, 1)`, `(-1, 1)` in
/// counter-clockwise order.
///
/// Note that the geometric map of a bilinear quadrilateral is only affine if
/// the physical element is a parallelogram; gradient transforms through the
/// Jacobian are exact in that case and approximate otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quad4;

/// Sign pattern of the reference corners, in node order.
const QUAD4_SIGNS: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

impl<T> ReferenceElement<T> for Quad4
where
    T: Real,
{
    type Affine = Quad4;

    const ORDER: usize = 1;
    const REFERENCE_DIM: usize = 2;
    const NUM_NODES: usize = 4;
    const VERTICES: &'static [usize] = &[0, 1, 2, 3];

    fn reference_nodes(&self) -> DMatrix<T> {
        DMatrix::from_fn(2, 4, |i, j| {
            let (alpha, beta) = QUAD4_SIGNS[j];
            T::from_f64(if i == 0 { alpha } else { beta }).expect("Literal must fit in T")
        })
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate_basis(&self, xi: DVectorView<T>) -> DVector<T> {
        let phi = |alpha: T, beta: T| (1.0 + alpha * xi[0]) * (1.0 + beta * xi[1]) / 4.0;
        DVector::from_fn(4, |j, _| {
            let (alpha, beta) = QUAD4_SIGNS[j];
            phi(T::from_f64(alpha).unwrap(), T::from_f64(beta).unwrap())
        })
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn basis_gradients(&self, xi: DVectorView<T>) -> DMatrix<T> {
        DMatrix::from_fn(4, 2, |j, i| {
            let (alpha, beta) = QUAD4_SIGNS[j];
            let alpha = T::from_f64(alpha).unwrap();
            let beta = T::from_f64(beta).unwrap();
            if i == 0 {
                alpha * (1.0 + beta * xi[1]) / 4.0
            } else {
                beta * (1.0 + alpha * xi[0]) / 4.0
            }
        })
    }

    fn quadrature_rule(&self, order: usize) -> Result<QuadratureRule<T>, Error> {
        quadrature::gauss_box_rule(2, order)
    }
}
