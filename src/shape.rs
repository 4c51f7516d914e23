//! Evaluation and integration of element shape functions.
//!
//! The routines in this module evaluate the basis (shape) functions of a
//! reference element at quadrature points, at arbitrary reference-space
//! points, or at domain-space points resolved through a
//! [`ReferencePositionSolver`]. Per-point and per-element evaluations are
//! independent and are computed in parallel, each writing a disjoint block of
//! the output.

use crate::element::ReferenceElement;
use crate::error::Error;
use crate::mesh::Mesh;
use crate::reference::ReferencePositionSolver;
use crate::Real;
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use rayon::prelude::*;

/// Evaluates the basis functions of an element at the quadrature points of
/// its rule of the given polynomial order.
///
/// Returns a `NUM_NODES x |quadrature points|` matrix with one column of
/// basis values per quadrature point.
pub fn basis_at_quadrature<T, E>(element: &E, order: usize) -> Result<DMatrix<T>, Error>
where
    T: Real,
    E: ReferenceElement<T>,
{
    let rule = element.quadrature_rule(order)?;
    let points = rule.reference_points();
    let mut values = DMatrix::zeros(E::NUM_NODES, rule.num_points());
    for (g, mut column) in values.column_iter_mut().enumerate() {
        column.copy_from(&element.evaluate_basis(points.column(g)));
    }
    Ok(values)
}

/// Builds the global shape function matrix of a mesh at the quadrature points
/// of the rule of the given polynomial order.
///
/// The result is a sparse `(|elements| * |quadrature points|) x |nodes|`
/// matrix in which row `e * |quadrature points| + g` holds the basis values
/// of element `e` at its quadrature point `g`, in the columns of that
/// element's nodes.
pub fn shape_function_matrix<T, E>(mesh: &Mesh<T, E>, order: usize) -> Result<CsrMatrix<T>, Error>
where
    T: Real,
    E: ReferenceElement<T>,
{
    let values = basis_at_quadrature(mesh.element(), order)?;
    let num_quadrature_points = values.ncols();
    let num_rows = mesh.num_elements() * num_quadrature_points;

    let mut triplets = CooMatrix::new(num_rows, mesh.num_nodes());
    for e in 0..mesh.num_elements() {
        let nodes = mesh.element_nodes(e);
        for g in 0..num_quadrature_points {
            let row = e * num_quadrature_points + g;
            for (i, &node) in nodes.iter().enumerate() {
                triplets.push(row, node, values[(i, g)]);
            }
        }
    }
    Ok(CsrMatrix::from(&triplets))
}

/// Builds a shape function matrix at arbitrary evaluation points, each tagged
/// with its owning element.
///
/// If `in_reference_space` is false, the points are given in domain space and
/// are first mapped back to reference coordinates by `solver`. The result is
/// a sparse `|points| x |nodes|` matrix with one row per evaluation point.
pub fn shape_function_matrix_at<T, E, S>(
    mesh: &Mesh<T, E>,
    elements: &[usize],
    points: &DMatrix<T>,
    in_reference_space: bool,
    solver: &S,
) -> Result<CsrMatrix<T>, Error>
where
    T: Real,
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

    let mut triplets = CooMatrix::new(xi.ncols(), mesh.num_nodes());
    for g in 0..xi.ncols() {
        let values = mesh.element().evaluate_basis(xi.column(g));
        let nodes = mesh.element_nodes(elements[g]);
        for (i, &node) in nodes.iter().enumerate() {
            triplets.push(g, node, values[i]);
        }
    }
    Ok(CsrMatrix::from(&triplets))
}

/// Evaluates the basis functions of an element at the given reference-space
/// points.
///
/// Returns a `NUM_NODES x |points|` matrix. Evaluations are independent per
/// point and computed in parallel.
pub fn basis_at_reference_points<T, E>(element: &E, points: &DMatrix<T>) -> Result<DMatrix<T>, Error>
where
    T: Real + Send + Sync,
    E: ReferenceElement<T>,
{
    if points.nrows() != E::REFERENCE_DIM {
        return Err(Error::PointDimensionMismatch {
            expected: E::REFERENCE_DIM,
            found: points.nrows(),
        });
    }
    let n = E::NUM_NODES;
    let mut values = DMatrix::zeros(n, points.ncols());
    values
        .as_mut_slice()
        .par_chunks_mut(n)
        .enumerate()
        .for_each(|(g, chunk)| {
            let basis = element.evaluate_basis(points.column(g));
            chunk.copy_from_slice(basis.as_slice());
        });
    Ok(values)
}

/// Evaluates the basis functions of a mesh's element at the given reference
/// or domain-space points.
///
/// If `in_reference_space` is false, the points are mapped back to reference
/// coordinates by `solver` first. Returns a `NUM_NODES x |points|` matrix.
pub fn basis_at_points<T, E, S>(
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
    if in_reference_space {
        basis_at_reference_points(mesh.element(), points)
    } else {
        let xi = solver.reference_positions(mesh, elements, points)?;
        basis_at_reference_points(mesh.element(), &xi)
    }
}

/// Integrates the basis functions over every element of a mesh.
///
/// For each element `e`, column `e` of the result holds
/// `sum_g w_g detJe(g, e) N(g)`, where the sum runs over the quadrature
/// points of the rule of the given polynomial order. `det_j` must be a
/// `|quadrature points| x |elements|` matrix of geometric Jacobian
/// determinants at the element quadrature points.
///
/// Returns a `NUM_NODES x |elements|` matrix; element columns are integrated
/// independently and in parallel.
pub fn integrated_basis<T, E>(
    mesh: &Mesh<T, E>,
    det_j: &DMatrix<T>,
    order: usize,
) -> Result<DMatrix<T>, Error>
where
    T: Real + Send + Sync,
    E: ReferenceElement<T>,
{
    let rule = mesh.element().quadrature_rule(order)?;
    let expected = (rule.num_points(), mesh.num_elements());
    if (det_j.nrows(), det_j.ncols()) != expected {
        return Err(Error::ShapeMismatch {
            quantity: "detJe",
            expected,
            found: (det_j.nrows(), det_j.ncols()),
        });
    }

    let values = basis_at_quadrature(mesh.element(), order)?;
    let weights = rule.weights();
    let n = E::NUM_NODES;
    let mut integrals = DMatrix::zeros(n, mesh.num_elements());
    integrals
        .as_mut_slice()
        .par_chunks_mut(n)
        .enumerate()
        .for_each(|(e, chunk)| {
            let mut column = DVector::zeros(n);
            for g in 0..rule.num_points() {
                column.axpy(weights[g] * det_j[(g, e)], &values.column(g), T::one());
            }
            chunk.copy_from_slice(column.as_slice());
        });
    Ok(integrals)
}
