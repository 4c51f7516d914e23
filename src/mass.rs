//! A matrix-free finite element mass operator.

use crate::element::ReferenceElement;
use crate::error::Error;
use crate::mesh::Mesh;
use crate::shape;
use crate::Real;
use log::debug;
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CscMatrix};
use rayon::prelude::*;

/// A matrix-free representation of the finite element mass matrix
/// `M_ij = integral rho(x) phi_i(x) phi_j(x) dx`.
///
/// The operator stores one symmetric `NUM_NODES x NUM_NODES` mass block per
/// element and applies the global matrix by gathering, multiplying and
/// scatter-adding element-wise, without ever assembling the matrix. A sparse
/// assembled matrix ([`Self::to_csc`]) and a lumped diagonal
/// ([`Self::lumped_masses`]) can be produced on demand.
///
/// The operator acts on fields with `dims >= 1` components per node; the
/// represented matrix is the Kronecker product of the scalar mass matrix with
/// the `dims x dims` identity. The Kronecker structure is kept implicit
/// everywhere except in the sparse export.
///
/// The mesh and the Jacobian determinant matrix are borrowed for the lifetime
/// of the operator; the element mass blocks are owned and can be recomputed
/// in place when the mass density changes (see [`Self::set_density`]).
#[derive(Debug, Clone)]
pub struct MassOperator<'a, T, E>
where
    T: Real,
{
    mesh: &'a Mesh<T, E>,
    det_j: &'a DMatrix<T>,
    /// One `n x n` block per element, stored side by side in an
    /// `n x (n * |elements|)` matrix.
    element_masses: DMatrix<T>,
    dims: usize,
}

impl<'a, T, E> MassOperator<'a, T, E>
where
    T: Real + Send + Sync,
    E: ReferenceElement<T>,
{
    /// The polynomial order of the mass matrix integrand, `2 * E::ORDER`.
    /// Quadrature rules and `detJe` shapes are validated against the rule of
    /// this order.
    pub fn mass_order() -> usize {
        2 * E::ORDER
    }

    /// Constructs a mass operator with a density given per quadrature point.
    ///
    /// `det_j` must be a `|quadrature points| x |elements|` matrix of
    /// geometric Jacobian determinants at the quadrature points of the rule
    /// of order [`Self::mass_order`], and `density` must have the same shape.
    /// The operator acts on fields with `dims >= 1` components per node.
    pub fn new(
        mesh: &'a Mesh<T, E>,
        det_j: &'a DMatrix<T>,
        density: &DMatrix<T>,
        dims: usize,
    ) -> Result<Self, Error> {
        if dims < 1 {
            return Err(Error::InvalidFieldDimensions { dims });
        }
        let element_masses = compute_element_masses(mesh, det_j, density)?;
        Ok(Self {
            mesh,
            det_j,
            element_masses,
            dims,
        })
    }

    /// Constructs a mass operator with a uniform mass density.
    pub fn with_uniform_density(
        mesh: &'a Mesh<T, E>,
        det_j: &'a DMatrix<T>,
        density: T,
        dims: usize,
    ) -> Result<Self, Error> {
        let rule = mesh.element().quadrature_rule(Self::mass_order())?;
        let density = DMatrix::from_element(rule.num_points(), mesh.num_elements(), density);
        Self::new(mesh, det_j, &density, dims)
    }

    /// Recomputes the element mass blocks for a new per-quadrature-point
    /// density.
    ///
    /// Validation and computation happen before any owned state is touched,
    /// so a failed call leaves the previous blocks intact.
    pub fn set_density(&mut self, density: &DMatrix<T>) -> Result<(), Error> {
        self.element_masses = compute_element_masses(self.mesh, self.det_j, density)?;
        Ok(())
    }

    /// Recomputes the element mass blocks for a new uniform density.
    pub fn set_uniform_density(&mut self, density: T) -> Result<(), Error> {
        let rule = self.mesh.element().quadrature_rule(Self::mass_order())?;
        let density = DMatrix::from_element(rule.num_points(), self.mesh.num_elements(), density);
        self.set_density(&density)
    }

    /// The number of field components the operator acts on.
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// The number of rows expected of operands, `dims * |nodes|`.
    pub fn input_dimensions(&self) -> usize {
        self.dims * self.mesh.num_nodes()
    }

    /// The number of rows of results, equal to [`Self::input_dimensions`].
    pub fn output_dimensions(&self) -> usize {
        self.input_dimensions()
    }

    /// The owned `n x (n * |elements|)` matrix of element mass blocks.
    pub fn element_masses(&self) -> &DMatrix<T> {
        &self.element_masses
    }

    /// Applies the operator to `x`, *adding* the result to `y`.
    ///
    /// Both operands must have `dims * |nodes|` rows and the same number of
    /// columns; each column is treated as an independent right-hand side.
    ///
    /// Element contributions to `y` overlap wherever elements share nodes,
    /// so the element loop runs sequentially within a call; columns are the
    /// axis along which a caller may parallelize.
    pub fn apply(&self, x: &DMatrix<T>, y: &mut DMatrix<T>) -> Result<(), Error> {
        let rows = self.input_dimensions();
        if x.nrows() != rows || y.nrows() != rows || x.ncols() != y.ncols() {
            return Err(Error::ShapeMismatch {
                quantity: "apply operands x, y",
                expected: (rows, x.ncols()),
                found: (y.nrows(), y.ncols()),
            });
        }

        let n = E::NUM_NODES;
        let d = self.dims;
        let mut x_element = DMatrix::zeros(d, n);
        let mut y_element = DMatrix::zeros(d, n);
        for c in 0..x.ncols() {
            for e in 0..self.mesh.num_elements() {
                let nodes = self.mesh.element_nodes(e);
                let masses = self.element_masses.view((0, e * n), (n, n));
                for (i, &node) in nodes.iter().enumerate() {
                    for r in 0..d {
                        x_element[(r, i)] = x[(d * node + r, c)];
                    }
                }
                // The mass block is symmetric, so no transpose is needed.
                y_element.gemm(T::one(), &x_element, &masses, T::zero());
                for (i, &node) in nodes.iter().enumerate() {
                    for r in 0..d {
                        y[(d * node + r, c)] += y_element[(r, i)];
                    }
                }
            }
        }
        Ok(())
    }

    /// Assembles the operator into a sparse matrix in compressed column
    /// format.
    ///
    /// The result has dimensions `(dims * |nodes|) x (dims * |nodes|)`, with
    /// one entry per element, node pair and field component, summed over
    /// shared nodes during compression.
    pub fn to_csc(&self) -> CscMatrix<T> {
        let n = E::NUM_NODES;
        let size = self.output_dimensions();
        let mut triplets = CooMatrix::new(size, size);
        for e in 0..self.mesh.num_elements() {
            let nodes = self.mesh.element_nodes(e);
            let masses = self.element_masses.view((0, e * n), (n, n));
            for j in 0..n {
                for i in 0..n {
                    for c in 0..self.dims {
                        triplets.push(
                            self.dims * nodes[i] + c,
                            self.dims * nodes[j] + c,
                            masses[(i, j)],
                        );
                    }
                }
            }
        }
        CscMatrix::from(&triplets)
    }

    /// Lumps the operator into a diagonal mass vector of length
    /// `dims * |nodes|` by summing the rows of every element mass block into
    /// the entries of the incident nodes.
    pub fn lumped_masses(&self) -> DVector<T> {
        let n = E::NUM_NODES;
        let mut lumped = DVector::zeros(self.input_dimensions());
        for e in 0..self.mesh.num_elements() {
            let nodes = self.mesh.element_nodes(e);
            let masses = self.element_masses.view((0, e * n), (n, n));
            for j in 0..n {
                for i in 0..n {
                    for c in 0..self.dims {
                        lumped[self.dims * nodes[i] + c] += masses[(i, j)];
                    }
                }
            }
        }
        lumped
    }
}

/// Computes the per-element mass blocks
/// `Me_e = sum_g w_g rho(g, e) detJe(g, e) N(g) N(g)^T`.
///
/// The weighted outer products `w_g N(g) N(g)^T` are precomputed once and
/// shared read-only across elements; each element accumulates into its own
/// disjoint block, in parallel.
fn compute_element_masses<T, E>(
    mesh: &Mesh<T, E>,
    det_j: &DMatrix<T>,
    density: &DMatrix<T>,
) -> Result<DMatrix<T>, Error>
where
    T: Real + Send + Sync,
    E: ReferenceElement<T>,
{
    let order = 2 * E::ORDER;
    let rule = mesh.element().quadrature_rule(order)?;
    let expected = (rule.num_points(), mesh.num_elements());
    if (det_j.nrows(), det_j.ncols()) != expected {
        return Err(Error::ShapeMismatch {
            quantity: "detJe",
            expected,
            found: (det_j.nrows(), det_j.ncols()),
        });
    }
    if (density.nrows(), density.ncols()) != expected {
        return Err(Error::ShapeMismatch {
            quantity: "mass density",
            expected,
            found: (density.nrows(), density.ncols()),
        });
    }

    let values = shape::basis_at_quadrature(mesh.element(), order)?;
    let weights = rule.weights();
    let outer_products: Vec<DMatrix<T>> = (0..rule.num_points())
        .map(|g| (values.column(g) * values.column(g).transpose()) * weights[g])
        .collect();

    let n = E::NUM_NODES;
    let mut element_masses = DMatrix::zeros(n, n * mesh.num_elements());
    element_masses
        .as_mut_slice()
        .par_chunks_mut(n * n)
        .enumerate()
        .for_each(|(e, chunk)| {
            let mut block = DMatrix::zeros(n, n);
            for (g, outer) in outer_products.iter().enumerate() {
                block += outer * (density[(g, e)] * det_j[(g, e)]);
            }
            chunk.copy_from_slice(block.as_slice());
        });
    debug!(
        "Computed {} element mass blocks of size {}x{}",
        mesh.num_elements(),
        n,
        n
    );
    Ok(element_masses)
}
