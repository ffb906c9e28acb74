//! Error types for geometry buffer validation.

use thiserror::Error;

/// Structural problems that would make corner addressing index out of bounds.
///
/// Non-manifold adjacency is deliberately not reported here: it only degrades
/// the corner table, it never makes it unsafe to build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// The triangle stream does not hold whole triangles.
    #[error("Triangle stream length {len} is not a multiple of 3")]
    MalformedTriangles {
        /// Length of the triangle stream.
        len: usize,
    },

    /// A corner references a vertex that does not exist.
    #[error("Corner {corner} references vertex {index}, but the buffer has {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending corner.
        corner: usize,
        /// Vertex index stored at that corner.
        index: u32,
        /// Number of vertices in the buffer.
        vertex_count: usize,
    },

    /// The UV array is neither empty nor one entry per vertex.
    #[error("UV count {uv_count} does not match vertex count {vertex_count}")]
    UvCountMismatch {
        /// Number of UVs.
        uv_count: usize,
        /// Number of vertices.
        vertex_count: usize,
    },
}
