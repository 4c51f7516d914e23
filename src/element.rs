//! Reference finite elements and their static descriptions.
//!
//! A [`ReferenceElement`] describes a canonical element domain together with
//! its polynomial basis: node and vertex layout, basis values and reference
//! gradients, and a family of quadrature rules indexed by polynomial order.
//! The elements themselves are stateless unit structs; all geometric
//! information lives in the mesh they are paired with.

use crate::error::Error;
use crate::quadrature::QuadratureRule;
use crate::Real;
use nalgebra::{DMatrix, DVector, DVectorView};

mod hexahedron;
mod quadrilateral;
mod tetrahedron;
mod triangle;

pub use hexahedron::Hex8;
pub use quadrilateral::Quad4;
pub use tetrahedron::{Tet10, Tet4};
pub use triangle::{Tri3, Tri6};

/// Static description of a reference finite element.
///
/// Implementors are stateless marker types; the trait exposes the polynomial
/// order, the node layout on the reference domain, basis evaluation and the
/// quadrature rules of the associated reference domain.
///
/// The basis functions satisfy the usual Lagrange property: basis function
/// `i` is 1 at reference node `i` and 0 at every other node, and the basis
/// forms a partition of unity on the reference domain.
pub trait ReferenceElement<T>: Clone + Default + Sync
where
    T: Real,
{
    /// The affine counterpart of this element, i.e. the order-1 element of
    /// the same family. Order-1 elements are their own affine counterpart.
    ///
    /// Geometric maps (Jacobians, inverse maps) are always taken through the
    /// affine counterpart, so that gradients of higher-order elements are
    /// exact whenever the physical element is an affine image of the
    /// reference element.
    type Affine: ReferenceElement<T>;

    /// Polynomial order of the basis.
    const ORDER: usize;

    /// Dimension of the reference domain.
    const REFERENCE_DIM: usize;

    /// Number of nodes (and basis functions) of the element.
    const NUM_NODES: usize;

    /// Indices of the nodes spanning the affine hull of the element, in the
    /// node order of the affine counterpart.
    const VERTICES: &'static [usize];

    /// The positions of the element's nodes on the reference domain, as a
    /// `REFERENCE_DIM x NUM_NODES` matrix.
    fn reference_nodes(&self) -> DMatrix<T>;

    /// Evaluates every basis function at the given reference coordinates,
    /// returning a vector of length `NUM_NODES`.
    ///
    /// `xi` must have length `REFERENCE_DIM`.
    fn evaluate_basis(&self, xi: DVectorView<T>) -> DVector<T>;

    /// Evaluates the reference-space gradient of every basis function at the
    /// given reference coordinates, returning a `NUM_NODES x REFERENCE_DIM`
    /// matrix with one gradient per row.
    ///
    /// `xi` must have length `REFERENCE_DIM`.
    fn basis_gradients(&self, xi: DVectorView<T>) -> DMatrix<T>;

    /// Returns a quadrature rule on the element's reference domain that is
    /// exact for polynomials of the given order, or
    /// [`Error::NoRuleAvailable`] if no such rule is stored.
    fn quadrature_rule(&self, order: usize) -> Result<QuadratureRule<T>, Error>;
}
