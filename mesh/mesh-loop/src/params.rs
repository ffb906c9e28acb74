//! Subdivision parameters.

use mesh_corner::{CornerTable, DEFAULT_ONE_RING_CAP, GeometryBuffer};

use crate::error::{SubdivideError, SubdivideResult};

/// How corner adjacency is resolved before each round.
///
/// Both strategies produce the same opposite links; they differ only in cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdjacencyStrategy {
    /// Hash directed edges by position. Linear in the corner count.
    #[default]
    Hashed,

    /// Compare every corner against every other. Quadratic, kept as a
    /// reference for verification and benchmarks.
    Pairwise,
}

impl AdjacencyStrategy {
    /// Build a corner table for `buffer` with this strategy.
    #[must_use]
    pub fn build(self, buffer: &GeometryBuffer) -> CornerTable {
        match self {
            Self::Hashed => CornerTable::build(buffer),
            Self::Pairwise => CornerTable::build_pairwise(buffer),
        }
    }
}

/// Parameters for Loop subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideParams {
    /// Number of subdivision rounds. Zero leaves the buffer untouched.
    pub rounds: u32,

    /// Maximum faces allowed in result (prevents memory issues).
    pub max_faces: usize,

    /// Corner adjacency construction.
    pub adjacency: AdjacencyStrategy,

    /// Maximum corners visited when walking a vertex's one-ring.
    pub one_ring_cap: usize,

    /// Regenerate texture coordinates after each round.
    pub project_uvs: bool,
}

impl Default for SubdivideParams {
    fn default() -> Self {
        Self {
            rounds: 1,
            max_faces: 10_000_000, // 10M faces max
            adjacency: AdjacencyStrategy::default(),
            one_ring_cap: DEFAULT_ONE_RING_CAP,
            project_uvs: true,
        }
    }
}

impl SubdivideParams {
    /// Create new parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set number of rounds.
    #[must_use]
    pub const fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set maximum faces allowed.
    #[must_use]
    pub const fn with_max_faces(mut self, max_faces: usize) -> Self {
        self.max_faces = max_faces;
        self
    }

    /// Set the adjacency strategy.
    #[must_use]
    pub const fn with_adjacency(mut self, adjacency: AdjacencyStrategy) -> Self {
        self.adjacency = adjacency;
        self
    }

    /// Set the one-ring walk cap.
    #[must_use]
    pub const fn with_one_ring_cap(mut self, cap: usize) -> Self {
        self.one_ring_cap = cap;
        self
    }

    /// Set whether texture coordinates are regenerated after each round.
    #[must_use]
    pub const fn with_uv_projection(mut self, project: bool) -> Self {
        self.project_uvs = project;
        self
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SubdivideError::InvalidOneRingCap`] if the cap is zero.
    pub const fn validate(&self) -> SubdivideResult<()> {
        if self.one_ring_cap == 0 {
            return Err(SubdivideError::InvalidOneRingCap(self.one_ring_cap));
        }
        Ok(())
    }

    /// Calculate expected face count after subdivision.
    ///
    /// Each round multiplies face count by 4. Saturates instead of
    /// overflowing.
    #[must_use]
    pub const fn expected_faces(&self, current_faces: usize) -> usize {
        let mut faces = current_faces;
        let mut i = 0;
        while i < self.rounds {
            faces = faces.saturating_mul(4);
            i += 1;
        }
        faces
    }
}
