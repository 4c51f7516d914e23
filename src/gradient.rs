//! Transforming reference-space basis gradients to domain space.
//!
//! The gradient of a basis function in domain space is obtained from its
//! reference-space gradient through the geometric Jacobian of the element
//! map. The Jacobian is always taken through the element's *affine*
//! counterpart, even for higher-order elements: the transform is then exact
//! whenever the physical element is an affine image of the reference element
//! (straight-sided simplices, parallelogram quads, parallelepiped hexes) and
//! approximate otherwise.
//!
//! With the reference gradients `G = grad N(xi)` (one gradient per row) and
//! the Jacobian `J = X_e grad N_affine(xi)`:
//!
//! - square `J` (geometry and reference dimension coincide): the domain
//!   gradients `P` solve `J^T P^T = G^T`,
//! - rectangular `J` (element embedded in a higher-dimensional space): the
//!   least-squares solution is `P^T = J (J^T J)^{-1} G^T`.

use crate::element::ReferenceElement;
use crate::error::Error;
use crate::mesh::Mesh;
use crate::reference::ReferencePositionSolver;
use crate::Real;
use nalgebra::{DMatrix, DVectorView};
use rayon::prelude::*;

/// Computes the domain-space gradients of every basis function of an element
/// at the reference point `xi`.
///
/// `vertex_positions` is the `d x |vertices|` matrix of the element's
/// affine-hull vertex coordinates, with `d >= REFERENCE_DIM`. The result is a
/// `NUM_NODES x d` matrix with one domain-space gradient per row.
pub fn shape_function_gradients<'a, T, E>(
    element: &E,
    xi: impl Into<DVectorView<'a, T>>,
    vertex_positions: &DMatrix<T>,
) -> Result<DMatrix<T>, Error>
where
    T: Real,
    E: ReferenceElement<T>,
{
    let xi = xi.into();
    let d_in = E::REFERENCE_DIM;
    let d_out = vertex_positions.nrows();
    if xi.len() != d_in {
        return Err(Error::PointDimensionMismatch {
            expected: d_in,
            found: xi.len(),
        });
    }
    if vertex_positions.ncols() != E::VERTICES.len() {
        return Err(Error::ShapeMismatch {
            quantity: "element vertex positions",
            expected: (d_out, E::VERTICES.len()),
            found: (d_out, vertex_positions.ncols()),
        });
    }
    if d_out < d_in {
        return Err(Error::PointDimensionMismatch {
            expected: d_in,
            found: d_out,
        });
    }

    let gradients = element.basis_gradients(xi);
    let affine_gradients = E::Affine::default().basis_gradients(xi);
    let jacobian = vertex_positions * affine_gradients;

    let transposed = if d_in == d_out {
        jacobian
            .transpose()
            .full_piv_lu()
            .solve(&gradients.transpose())
            .ok_or(Error::SingularJacobian)?
    } else {
        let jt_j = jacobian.transpose() * &jacobian;
        let solution = jt_j
            .cholesky()
            .ok_or(Error::SingularJacobian)?
            .solve(&gradients.transpose());
        &jacobian * solution
    };
    Ok(transposed.transpose())
}

/// Computes the domain-space basis gradients of every element at its
/// quadrature points, for the rule of the given polynomial order.
///
/// The result is a `NUM_NODES x (d * |quadrature points| * |elements|)`
/// matrix in which element `e` owns the block of `d * |quadrature points|`
/// consecutive columns starting at `e * d * |quadrature points|`, holding one
/// `NUM_NODES x d` gradient block per quadrature point. Elements are
/// processed independently and in parallel, each writing only its own block.
pub fn shape_function_gradients_at_quadrature<T, E>(
    mesh: &Mesh<T, E>,
    order: usize,
) -> Result<DMatrix<T>, Error>
where
    T: Real + Send + Sync,
    E: ReferenceElement<T>,
{
    let rule = mesh.element().quadrature_rule(order)?;
    let points = rule.reference_points();
    let n = E::NUM_NODES;
    let d_out = mesh.geometry_dim();
    let num_quadrature_points = rule.num_points();
    let stride = d_out * num_quadrature_points;

    let mut gradients = DMatrix::zeros(n, stride * mesh.num_elements());
    gradients
        .as_mut_slice()
        .par_chunks_mut(n * stride)
        .enumerate()
        .try_for_each(|(e, chunk)| -> Result<(), Error> {
            let vertices = mesh.element_vertex_positions(e);
            for g in 0..num_quadrature_points {
                let block =
                    shape_function_gradients(mesh.element(), points.column(g), &vertices)?;
                let offset = g * d_out * n;
                chunk[offset..offset + d_out * n].copy_from_slice(block.as_slice());
            }
            Ok(())
        })?;
    Ok(gradients)
}

/// Computes the domain-space basis gradients at arbitrary evaluation points,
/// each tagged with its owning element.
///
/// If `in_reference_space` is false, the points are mapped back to reference
/// coordinates by `solver` first. The result is a
/// `NUM_NODES x (d * |points|)` matrix in which point `g` owns the
/// `NUM_NODES x d` block starting at column `g * d`. Points are processed
/// independently and in parallel.
pub fn shape_function_gradients_at<T, E, S>(
    mesh: &Mesh<T, E>,
    elements: &[usize],
    points: &DMatrix<T>,
    in_reference_space: bool,
    solver: &S,
) -> Result<DMatrix<T>, Error>
where
    T: Real + Send + Sync,
    E: ReferenceElement<T>,
    S: ReferencePositionSolver<T, E>,
{
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

    let resolved;
    let xi = if in_reference_space {
        points
    } else {
        resolved = solver.reference_positions(mesh, elements, points)?;
        &resolved
    };
    if xi.nrows() != E::REFERENCE_DIM {
        return Err(Error::PointDimensionMismatch {
            expected: E::REFERENCE_DIM,
            found: xi.nrows(),
        });
    }

    let n = E::NUM_NODES;
    let d_out = mesh.geometry_dim();
    let mut gradients = DMatrix::zeros(n, d_out * xi.ncols());
    gradients
        .as_mut_slice()
        .par_chunks_mut(n * d_out)
        .enumerate()
        .try_for_each(|(g, chunk)| -> Result<(), Error> {
            let vertices = mesh.element_vertex_positions(elements[g]);
            let block = shape_function_gradients(mesh.element(), xi.column(g), &vertices)?;
            chunk.copy_from_slice(block.as_slice());
            Ok(())
        })?;
    Ok(gradients)
}
