//! Finite element meshes stored as plain vertex/connectivity matrices.

use crate::element::ReferenceElement;
use crate::error::Error;
use crate::Real;
use nalgebra::{DMatrix, DVectorView};

/// A finite element mesh of elements of type `E`.
///
/// The mesh owns a `d x |nodes|` vertex matrix `X` and a
/// `NUM_NODES x |elements|` connectivity matrix `E`, where each column of the
/// connectivity lists the node indices of one element in the node order
/// defined by the element type. The geometry dimension `d` may exceed the
/// element's reference dimension (e.g. a triangle mesh embedded in 3D), but
/// never be smaller.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<T, E>
where
    T: Real,
{
    vertices: DMatrix<T>,
    connectivity: DMatrix<usize>,
    element: E,
}

impl<T, E> Mesh<T, E>
where
    T: Real,
    E: ReferenceElement<T>,
{
    /// Creates a mesh from a vertex matrix and a connectivity matrix.
    ///
    /// Fails if the connectivity row count does not match the element's node
    /// count, if the geometry dimension is smaller than the element's
    /// reference dimension, or if any connectivity entry does not index a
    /// vertex column.
    pub fn from_vertices_and_connectivity(
        vertices: DMatrix<T>,
        connectivity: DMatrix<usize>,
    ) -> Result<Self, Error> {
        if vertices.nrows() < E::REFERENCE_DIM {
            return Err(Error::PointDimensionMismatch {
                expected: E::REFERENCE_DIM,
                found: vertices.nrows(),
            });
        }
        if connectivity.nrows() != E::NUM_NODES {
            return Err(Error::ShapeMismatch {
                quantity: "connectivity",
                expected: (E::NUM_NODES, connectivity.ncols()),
                found: (connectivity.nrows(), connectivity.ncols()),
            });
        }
        let num_nodes = vertices.ncols();
        for &index in connectivity.iter() {
            if index >= num_nodes {
                return Err(Error::InvalidNodeIndex { index, num_nodes });
            }
        }
        Ok(Self {
            vertices,
            connectivity,
            element: E::default(),
        })
    }

    /// The reference element of the mesh.
    pub fn element(&self) -> &E {
        &self.element
    }

    /// The `d x |nodes|` vertex matrix.
    pub fn vertices(&self) -> &DMatrix<T> {
        &self.vertices
    }

    /// The `NUM_NODES x |elements|` connectivity matrix.
    pub fn connectivity(&self) -> &DMatrix<usize> {
        &self.connectivity
    }

    /// The geometry dimension `d` of the mesh.
    pub fn geometry_dim(&self) -> usize {
        self.vertices.nrows()
    }

    /// The number of nodes in the mesh.
    pub fn num_nodes(&self) -> usize {
        self.vertices.ncols()
    }

    /// The number of elements in the mesh.
    pub fn num_elements(&self) -> usize {
        self.connectivity.ncols()
    }

    /// The node indices of element `index`, as a column view of length
    /// `NUM_NODES`.
    pub fn element_nodes(&self, index: usize) -> DVectorView<usize> {
        self.connectivity.column(index)
    }

    /// The coordinates of the affine-hull vertices of element `index`, as a
    /// `d x |vertices|` matrix.
    pub fn element_vertex_positions(&self, index: usize) -> DMatrix<T> {
        let nodes = self.connectivity.column(index);
        DMatrix::from_fn(self.geometry_dim(), E::VERTICES.len(), |i, j| {
            self.vertices[(i, nodes[E::VERTICES[j]])]
        })
    }

    /// Returns an error if `index` is not a valid element index.
    pub fn check_element_index(&self, index: usize) -> Result<(), Error> {
        if index >= self.num_elements() {
            Err(Error::InvalidElementIndex {
                index,
                num_elements: self.num_elements(),
            })
        } else {
            Ok(())
        }
    }
}
