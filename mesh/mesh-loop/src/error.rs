//! Error types for mesh subdivision operations.

use mesh_corner::BufferError;
use thiserror::Error;

/// Errors that can occur during subdivision operations.
///
/// Degenerate valence, capped one-ring walks and open boundaries are absorbed
/// by the scheme and reported through
/// [`RoundReport`](crate::RoundReport) instead.
#[derive(Debug, Error)]
pub enum SubdivideError {
    /// Buffer has no vertices.
    #[error("Mesh has no vertices")]
    EmptyMesh,

    /// Buffer has no triangles.
    #[error("Mesh has no faces")]
    NoFaces,

    /// Buffer cannot be corner-addressed safely.
    #[error("Invalid geometry buffer: {0}")]
    InvalidBuffer(#[from] BufferError),

    /// Mesh would exceed maximum size.
    #[error("Subdivision would exceed maximum mesh size ({current} -> {projected} faces, max {max})")]
    MeshTooLarge {
        /// Current face count.
        current: usize,
        /// Projected face count after subdivision.
        projected: usize,
        /// Maximum allowed face count.
        max: usize,
    },

    /// Corner table was built for a different generation of the buffer.
    #[error(
        "Stale corner table: built for generation {table_generation} ({table_corners} corners), \
         buffer is at generation {buffer_generation} ({buffer_corners} corners)"
    )]
    StaleCornerTable {
        /// Generation recorded in the table.
        table_generation: u64,
        /// Current buffer generation.
        buffer_generation: u64,
        /// Corners covered by the table.
        table_corners: usize,
        /// Corners in the buffer.
        buffer_corners: usize,
    },

    /// One-ring walks must be allowed at least one step.
    #[error("Invalid one-ring cap: {0} (must be >= 1)")]
    InvalidOneRingCap(usize),
}

/// Result type for subdivision operations.
pub type SubdivideResult<T> = std::result::Result<T, SubdivideError>;
