//! Library-wide error type.

use std::fmt;
use std::fmt::{Display, Formatter};

/// The error type returned by fallible operations in this crate.
///
/// All errors indicate caller misuse (wrong matrix shapes, invalid indices or
/// degenerate geometry) rather than transient conditions, so none of them are
/// ever retried internally. Every check runs before any state is mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A matrix operand did not have the expected dimensions.
    ShapeMismatch {
        /// Name of the offending quantity, e.g. `"detJe"`.
        quantity: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// Evaluation points did not have the dimensionality required by the
    /// element or mesh.
    PointDimensionMismatch { expected: usize, found: usize },
    /// The number of field components of a mass operator must be at least 1.
    InvalidFieldDimensions { dims: usize },
    /// No quadrature rule of the requested polynomial order is available for
    /// the given reference domain.
    NoRuleAvailable { reference_dim: usize, order: usize },
    /// The geometric Jacobian of an element was singular (or, in the
    /// rectangular case, rank-deficient), so basis gradients could not be
    /// transformed to domain space.
    SingularJacobian,
    /// An element index was out of bounds for the mesh.
    InvalidElementIndex { index: usize, num_elements: usize },
    /// A connectivity entry did not index a vertex of the mesh.
    InvalidNodeIndex { index: usize, num_nodes: usize },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                quantity,
                expected,
                found,
            } => write!(
                f,
                "Expected {} of dimensions {}x{}, but got {}x{}",
                quantity, expected.0, expected.1, found.0, found.1
            ),
            Self::PointDimensionMismatch { expected, found } => write!(
                f,
                "Expected points in d={} dimensions, but got points with {} rows",
                expected, found
            ),
            Self::InvalidFieldDimensions { dims } => {
                write!(f, "Expected field dimensionality >= 1, got {} instead", dims)
            }
            Self::NoRuleAvailable { reference_dim, order } => write!(
                f,
                "No quadrature rule of polynomial order {} is available \
                 for the {}-dimensional reference domain",
                order, reference_dim
            ),
            Self::SingularJacobian => {
                write!(f, "Element geometric Jacobian is singular")
            }
            Self::InvalidElementIndex { index, num_elements } => write!(
                f,
                "Element index {} is out of bounds for a mesh with {} elements",
                index, num_elements
            ),
            Self::InvalidNodeIndex { index, num_nodes } => write!(
                f,
                "Connectivity entry {} is out of bounds for a mesh with {} nodes",
                index, num_nodes
            ),
        }
    }
}

impl std::error::Error for Error {}
