//! Loop subdivision over corner-table buffers.
//!
//! Each round replaces every triangle with four, smoothing the surface:
//!
//! - **Even vertices**: original vertices averaged over their one-ring with the
//!   Loop weight `β`, unless pinned or on a crease
//! - **Odd vertices**: one per edge, from the 3/8, 1/8 mask, or the exact
//!   midpoint on creases and open boundaries
//! - **Creases**: sharp edges are split in two and carried into the next round
//!
//! Adjacency comes from a [`CornerTable`](mesh_corner::CornerTable) rebuilt
//! before every round. After each round the buffer can be committed to a
//! [`MeshCommit`] target and given fresh texture coordinates.
//!
//! # Examples
//!
//! Smooth a tetrahedron:
//!
//! ```
//! use mesh_corner::tetrahedron;
//! use mesh_loop::{subdivide, SubdivideParams};
//!
//! let result = subdivide(tetrahedron(), &SubdivideParams::default())?;
//!
//! assert_eq!(result.final_faces, 16);
//! assert_eq!(result.final_vertices, 10);
//! # Ok::<(), mesh_loop::SubdivideError>(())
//! ```
//!
//! Keep an edge sharp and a corner fixed:
//!
//! ```
//! use mesh_corner::{unit_cube, Edge, Point3};
//! use mesh_loop::{subdivide_with_creases, SubdivideParams};
//!
//! let corner = Point3::new(0.0, 0.0, 0.0);
//! let edge = Edge::new(corner, Point3::new(0.0, 0.0, 1.0));
//!
//! let params = SubdivideParams::new().with_rounds(2);
//! let result = subdivide_with_creases(unit_cube(), [edge], [corner], &params)?;
//!
//! assert_eq!(result.final_faces, 192);
//! assert_eq!(result.buffer.vertices[0], corner);
//! # Ok::<(), mesh_loop::SubdivideError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod context;
mod error;
mod params;
mod projection;
mod render;
mod result;
mod subdivide;

pub use context::{SubdivisionContext, subdivide, subdivide_with_creases};
pub use error::{SubdivideError, SubdivideResult};
pub use params::{AdjacencyStrategy, SubdivideParams};
pub use projection::{PlanarAxis, finalize, planar_uvs, project_uvs};
pub use render::{MeshCommit, RenderMesh, vertex_normals, vertex_tangents};
pub use result::{RoundReport, SubdivisionResult};
pub use subdivide::{loop_beta, subdivide_round};
