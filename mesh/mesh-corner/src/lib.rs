//! Corner-table triangle buffers.
//!
//! This crate provides the data model that subdivision operates on:
//!
//! - [`GeometryBuffer`] - Positions, a flat triangle corner stream, UVs and
//!   crease metadata
//! - [`Edge`] - Order-independent position pair used for crease lookups
//! - [`CreaseSet`] - Crease edges and pinned vertices
//! - [`CornerTable`] - Opposite-corner adjacency with one-ring walking
//! - [`Aabb`] and [`Triangle`] - Geometric helpers
//!
//! # Layer 0 Crate
//!
//! This crate has no renderer or engine dependencies. Producers hand it a
//! triangle soup; consumers read plain arrays back out.
//!
//! # Identity by Position
//!
//! Creases and corner adjacency compare vertex *positions* with exact `==`,
//! never vertex indices. Indices are renumbered by every subdivision round,
//! positions are the only identity that carries across. A position that drifts
//! by one ulp is a different vertex.
//!
//! # Winding
//!
//! Faces are **counter-clockwise (CCW) when viewed from outside**. Two
//! triangles are adjacent in the corner table only when they traverse their
//! shared edge in opposite directions.
//!
//! # Example
//!
//! ```
//! use mesh_corner::{unit_cube, CornerTable, Edge, Point3};
//!
//! let cube = unit_cube().with_crease_edges([Edge::new(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//! )]);
//!
//! let table = CornerTable::build(&cube);
//! assert_eq!(table.len(), 36);
//! assert_eq!(table.boundary_corner_count(), 0);
//! assert_eq!(cube.creases.edge_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod buffer;
mod corner;
mod crease;
mod edge;
mod error;
mod key;
mod triangle;

pub use bounds::Aabb;
pub use buffer::{GeometryBuffer, tetrahedron, unit_cube};
pub use corner::{
    CornerTable, DEFAULT_ONE_RING_CAP, RingOutcome, RingWalk, next_corner, prev_corner,
    triangle_of,
};
pub use crease::CreaseSet;
pub use edge::Edge;
pub use error::BufferError;
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};
