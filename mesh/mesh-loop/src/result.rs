//! Result types for subdivision operations.

// Face counts don't overflow in practice
#![allow(clippy::cast_precision_loss)]

use mesh_corner::GeometryBuffer;

/// Counters gathered during a single subdivision round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundReport {
    /// One-based round number within a run.
    pub round: usize,

    /// Repositioned original vertices.
    pub even_vertices: usize,

    /// New edge vertices.
    pub odd_vertices: usize,

    /// Triangles after the round.
    pub faces: usize,

    /// Crease edges carried into the next round.
    pub crease_edges: usize,

    /// Crease edges from the previous round that matched a mesh edge.
    pub matched_creases: usize,

    /// Crease edges from the previous round that matched no mesh edge.
    pub dropped_creases: usize,

    /// Edges with only one incident triangle.
    pub boundary_edges: usize,

    /// One-ring walks stopped by the cap.
    pub capped_walks: usize,

    /// Vertices with fewer than three ring neighbours, left in place.
    pub degenerate_vertices: usize,
}

impl RoundReport {
    /// Vertex count after the round.
    #[must_use]
    pub const fn vertices(&self) -> usize {
        self.even_vertices + self.odd_vertices
    }
}

impl std::fmt::Display for RoundReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Round {}: {} vertices ({} even, {} odd), {} faces, {} creases",
            self.round,
            self.vertices(),
            self.even_vertices,
            self.odd_vertices,
            self.faces,
            self.crease_edges
        )
    }
}

/// Result of mesh subdivision.
#[derive(Debug, Clone)]
pub struct SubdivisionResult {
    /// The subdivided buffer, crease set already propagated.
    pub buffer: GeometryBuffer,

    /// Number of faces in original buffer.
    pub original_faces: usize,

    /// Number of faces in subdivided buffer.
    pub final_faces: usize,

    /// Number of vertices in original buffer.
    pub original_vertices: usize,

    /// Number of vertices in subdivided buffer.
    pub final_vertices: usize,

    /// Number of rounds performed.
    pub rounds: u32,

    /// Per-round counters, in order.
    pub reports: Vec<RoundReport>,
}

impl SubdivisionResult {
    /// Get the face multiplication factor.
    #[must_use]
    pub fn face_ratio(&self) -> f64 {
        if self.original_faces == 0 {
            1.0
        } else {
            self.final_faces as f64 / self.original_faces as f64
        }
    }

    /// Get the vertex multiplication factor.
    #[must_use]
    pub fn vertex_ratio(&self) -> f64 {
        if self.original_vertices == 0 {
            1.0
        } else {
            self.final_vertices as f64 / self.original_vertices as f64
        }
    }

    /// Check if any subdivision occurred.
    #[must_use]
    pub const fn was_subdivided(&self) -> bool {
        self.rounds > 0 && self.final_faces > self.original_faces
    }

    /// Total one-ring walks stopped by the cap across all rounds.
    #[must_use]
    pub fn capped_walks(&self) -> usize {
        self.reports.iter().map(|r| r.capped_walks).sum()
    }
}

impl std::fmt::Display for SubdivisionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Loop subdivision: {} → {} faces ({:.1}x), {} rounds",
            self.original_faces,
            self.final_faces,
            self.face_ratio(),
            self.rounds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(rounds: u32, final_faces: usize, final_vertices: usize) -> SubdivisionResult {
        SubdivisionResult {
            buffer: GeometryBuffer::new(),
            original_faces: 100,
            final_faces,
            original_vertices: 50,
            final_vertices,
            rounds,
            reports: Vec::new(),
        }
    }

    #[test]
    fn test_face_ratio() {
        let result = make_result(1, 400, 200);
        assert!((result.face_ratio() - 4.0).abs() < 0.001);
        assert!((result.vertex_ratio() - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_was_subdivided() {
        assert!(!make_result(0, 100, 50).was_subdivided());
        assert!(make_result(1, 400, 200).was_subdivided());
    }

    #[test]
    fn test_display() {
        let display = format!("{}", make_result(1, 400, 200));
        assert!(display.contains("100"));
        assert!(display.contains("400"));
        assert!(display.contains("4.0x"));
        assert!(display.contains("1 rounds"));
    }

    #[test]
    fn test_capped_walks_sum() {
        let mut result = make_result(2, 1600, 800);
        result.reports = vec![
            RoundReport {
                capped_walks: 2,
                ..RoundReport::default()
            },
            RoundReport {
                capped_walks: 3,
                ..RoundReport::default()
            },
        ];
        assert_eq!(result.capped_walks(), 5);
    }

    #[test]
    fn test_round_report_display() {
        let report = RoundReport {
            round: 1,
            even_vertices: 4,
            odd_vertices: 6,
            faces: 16,
            ..RoundReport::default()
        };
        assert_eq!(report.vertices(), 10);
        let display = format!("{report}");
        assert!(display.contains("Round 1"));
        assert!(display.contains("10 vertices"));
        assert!(display.contains("16 faces"));
    }
}
