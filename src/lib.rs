//! Matrix-free finite element mass operators and shape function kernels.
//!
//! This crate provides the numerical building blocks needed to integrate
//! finite element mass matrices on meshes of polynomial elements:
//!
//! - reference elements (triangles, quadrilaterals, tetrahedra, hexahedra)
//!   described by the [`ReferenceElement`](element::ReferenceElement) trait,
//! - quadrature rules on the associated reference domains ([`quadrature`]),
//! - evaluation of basis functions and their domain-space gradients at
//!   quadrature or arbitrary evaluation points ([`shape`], [`gradient`]),
//! - the matrix-free [`MassOperator`](mass::MassOperator), which applies the
//!   mass matrix without assembling it, and can export a sparse assembled
//!   matrix or a lumped diagonal on demand.
//!
//! Meshes are stored as plain matrices: a `d x |nodes|` vertex matrix and a
//! `|element nodes| x |elements|` connectivity matrix (see [`mesh::Mesh`]).

use nalgebra::RealField;

pub mod element;
pub mod error;
pub mod gradient;
pub mod mass;
pub mod mesh;
pub mod quadrature;
pub mod reference;
pub mod shape;

pub use error::Error;
pub use mass::MassOperator;
pub use mesh::Mesh;
pub use quadrature::QuadratureRule;

pub extern crate nalgebra;
pub extern crate nalgebra_sparse;

/// Trait alias for real scalar types used throughout this crate.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}
