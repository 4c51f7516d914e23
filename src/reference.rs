//! Mapping domain-space evaluation points back to reference coordinates.
//!
//! Several evaluation routines in [`shape`](crate::shape) and
//! [`gradient`](crate::gradient) accept evaluation points given in domain
//! space. Converting such points to reference coordinates requires inverting
//! the element's geometric map, which for curved elements is a nonlinear
//! root-finding problem. This crate treats that inversion as a pluggable
//! collaborator, expressed by the [`ReferencePositionSolver`] trait, and
//! supplies [`AffineReferencePositions`], the closed-form inverse of the
//! affine geometric map. Callers with curved element geometry can substitute
//! an iterative (e.g. Gauss-Newton) solver of their own.

use crate::element::ReferenceElement;
use crate::error::Error;
use crate::mesh::Mesh;
use crate::Real;
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

/// Maps domain-space points, each tagged with an owning element, to reference
/// coordinates.
pub trait ReferencePositionSolver<T, E>
where
    T: Real,
    E: ReferenceElement<T>,
{
    /// Computes the reference coordinates of the given domain-space points.
    ///
    /// `points` is a `d x |points|` matrix of domain-space positions and
    /// `elements` associates each column with the element containing it.
    /// Returns a `REFERENCE_DIM x |points|` matrix of reference coordinates.
    fn reference_positions(
        &self,
        mesh: &Mesh<T, E>,
        elements: &[usize],
        points: &DMatrix<T>,
    ) -> Result<DMatrix<T>, Error>;
}

/// Inverts the affine part of each element's geometric map in closed form.
///
/// With vertex positions `V` and the constant affine basis gradients `G`, the
/// affine map is `x(xi) = x0 + J xi` with `J = V G` and `x0` the image of the
/// reference origin. Square Jacobians are inverted directly; rectangular ones
/// (elements embedded in a higher-dimensional space) are resolved in the
/// least-squares sense through the normal equations.
///
/// The result is exact whenever the physical element is an affine image of
/// its reference element, which is the same regime in which the gradient
/// transform of [`gradient`](crate::gradient) is exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AffineReferencePositions;

impl<T, E> ReferencePositionSolver<T, E> for AffineReferencePositions
where
    T: Real + Send + Sync,
    E: ReferenceElement<T>,
{
    fn reference_positions(
        &self,
        mesh: &Mesh<T, E>,
        elements: &[usize],
        points: &DMatrix<T>,
    ) -> Result<DMatrix<T>, Error> {
        if points.nrows() != mesh.geometry_dim() {
            return Err(Error::PointDimensionMismatch {
                expected: mesh.geometry_dim(),
                found: points.nrows(),
            });
        }
        if elements.len() != points.ncols() {
            return Err(Error::ShapeMismatch {
                quantity: "element indices",
                expected: (points.ncols(), 1),
                found: (elements.len(), 1),
            });
        }
        for &element in elements {
            mesh.check_element_index(element)?;
        }

        let d_in = E::REFERENCE_DIM;
        let d_out = mesh.geometry_dim();
        let affine = E::Affine::default();
        let origin = DVector::zeros(d_in);
        // The affine basis gradients are constant, so evaluating at the
        // reference origin fixes both J and x0 = V N(0).
        let gradients = affine.basis_gradients((&origin).into());
        let basis_at_origin = affine.evaluate_basis((&origin).into());

        let mut xi = DMatrix::zeros(d_in, points.ncols());
        xi.as_mut_slice()
            .par_chunks_mut(d_in)
            .enumerate()
            .try_for_each(|(p, chunk)| -> Result<(), Error> {
                let vertices = mesh.element_vertex_positions(elements[p]);
                let jacobian = &vertices * &gradients;
                let rhs = points.column(p) - &vertices * &basis_at_origin;
                let solution = if d_in == d_out {
                    jacobian
                        .full_piv_lu()
                        .solve(&rhs)
                        .ok_or(Error::SingularJacobian)?
                } else {
                    let jt_j = jacobian.transpose() * &jacobian;
                    let jt_rhs = jacobian.transpose() * rhs;
                    jt_j.cholesky()
                        .ok_or(Error::SingularJacobian)?
                        .solve(&jt_rhs)
                };
                chunk.copy_from_slice(solution.as_slice());
                Ok(())
            })?;
        Ok(xi)
    }
}
