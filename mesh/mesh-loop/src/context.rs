//! Multi-round subdivision driver and entry points.

use mesh_corner::{CornerTable, Edge, GeometryBuffer, Point3};
use tracing::debug;

use crate::error::{SubdivideError, SubdivideResult};
use crate::params::SubdivideParams;
use crate::projection::finalize;
use crate::render::{MeshCommit, RenderMesh};
use crate::result::{RoundReport, SubdivisionResult};
use crate::subdivide::subdivide_round;

/// Owns a buffer through successive subdivision rounds.
///
/// The context builds a fresh [`CornerTable`] for each round and drops it
/// once the round has replaced the buffer's topology. After each round, if
/// [`SubdivideParams::project_uvs`] is set, the buffer is committed to the
/// target and its uvs are regenerated.
///
/// # Examples
///
/// ```
/// use mesh_corner::unit_cube;
/// use mesh_loop::{SubdivideParams, SubdivisionContext};
///
/// let mut ctx = SubdivisionContext::new(unit_cube(), SubdivideParams::default());
/// assert_eq!(ctx.corner_table().boundary_corner_count(), 0);
///
/// let report = ctx.step()?;
/// assert_eq!(report.faces, 48);
///
/// let report = ctx.step()?;
/// assert_eq!(report.round, 2);
/// assert_eq!(ctx.buffer().face_count(), 192);
/// # Ok::<(), mesh_loop::SubdivideError>(())
/// ```
#[derive(Debug)]
pub struct SubdivisionContext<C: MeshCommit = RenderMesh> {
    buffer: GeometryBuffer,
    params: SubdivideParams,
    corner_table: Option<CornerTable>,
    target: C,
    reports: Vec<RoundReport>,
    original_faces: usize,
    original_vertices: usize,
}

impl SubdivisionContext<RenderMesh> {
    /// Create a context that commits into a fresh [`RenderMesh`].
    #[must_use]
    pub fn new(buffer: GeometryBuffer, params: SubdivideParams) -> Self {
        Self::with_target(buffer, params, RenderMesh::new())
    }
}

impl<C: MeshCommit> SubdivisionContext<C> {
    /// Create a context that commits into `target`.
    #[must_use]
    pub fn with_target(buffer: GeometryBuffer, params: SubdivideParams, target: C) -> Self {
        let original_faces = buffer.face_count();
        let original_vertices = buffer.vertex_count();
        Self {
            buffer,
            params,
            corner_table: None,
            target,
            reports: Vec::new(),
            original_faces,
            original_vertices,
        }
    }

    /// Current buffer.
    #[must_use]
    pub const fn buffer(&self) -> &GeometryBuffer {
        &self.buffer
    }

    /// Commit target.
    #[must_use]
    pub const fn target(&self) -> &C {
        &self.target
    }

    /// Parameters in use.
    #[must_use]
    pub const fn params(&self) -> &SubdivideParams {
        &self.params
    }

    /// Reports of the rounds performed so far.
    #[must_use]
    pub fn reports(&self) -> &[RoundReport] {
        &self.reports
    }

    /// Corner table for the current buffer, built on first use and rebuilt
    /// whenever the buffer has moved on.
    pub fn corner_table(&mut self) -> &CornerTable {
        if !self
            .corner_table
            .as_ref()
            .is_some_and(|t| t.is_current_for(&self.buffer))
        {
            self.corner_table = None;
        }
        let (buffer, adjacency) = (&self.buffer, self.params.adjacency);
        self.corner_table
            .get_or_insert_with(|| adjacency.build(buffer))
    }

    /// Perform one round.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is empty or malformed, or if another
    /// round would exceed [`SubdivideParams::max_faces`]. The buffer is left
    /// unchanged on error.
    pub fn step(&mut self) -> SubdivideResult<RoundReport> {
        let current = self.buffer.face_count();
        let projected = current.saturating_mul(4);
        if projected > self.params.max_faces {
            return Err(SubdivideError::MeshTooLarge {
                current,
                projected,
                max: self.params.max_faces,
            });
        }

        self.corner_table();
        let table = match self.corner_table.take() {
            Some(table) => table,
            None => self.params.adjacency.build(&self.buffer),
        };

        let mut report = subdivide_round(&mut self.buffer, &table, &self.params)?;
        report.round = self.reports.len() + 1;

        if self.params.project_uvs {
            finalize(&mut self.buffer, &mut self.target);
        }

        debug!(
            "Round {}: {} faces, {} vertices",
            report.round,
            report.faces,
            report.vertices()
        );

        self.reports.push(report);
        Ok(report)
    }

    /// Perform all rounds requested by the parameters and collect the result.
    ///
    /// # Errors
    ///
    /// See [`SubdivisionContext::step`].
    pub fn run(self) -> SubdivideResult<SubdivisionResult> {
        self.run_to_target().map(|(result, _)| result)
    }

    /// Like [`SubdivisionContext::run`], also returning the commit target.
    ///
    /// # Errors
    ///
    /// See [`SubdivisionContext::step`].
    pub fn run_to_target(mut self) -> SubdivideResult<(SubdivisionResult, C)> {
        if self.params.rounds > 0 {
            if self.buffer.vertices.is_empty() {
                return Err(SubdivideError::EmptyMesh);
            }
            if self.buffer.triangles.is_empty() {
                return Err(SubdivideError::NoFaces);
            }
            self.params.validate()?;

            let projected = self.params.expected_faces(self.buffer.face_count());
            if projected > self.params.max_faces {
                return Err(SubdivideError::MeshTooLarge {
                    current: self.buffer.face_count(),
                    projected,
                    max: self.params.max_faces,
                });
            }

            debug!(
                "Subdividing buffer: {} faces, {} vertices, {} crease edges, {} rounds",
                self.original_faces,
                self.original_vertices,
                self.buffer.creases.edge_count(),
                self.params.rounds
            );
        }

        for _ in 0..self.params.rounds {
            self.step()?;
        }

        Ok(self.into_result())
    }

    /// Consume the context, returning the buffer and the target.
    #[must_use]
    pub fn into_parts(self) -> (GeometryBuffer, C) {
        (self.buffer, self.target)
    }

    /// Consume the context, returning the buffer.
    #[must_use]
    pub fn into_buffer(self) -> GeometryBuffer {
        self.buffer
    }

    fn into_result(self) -> (SubdivisionResult, C) {
        let final_faces = self.buffer.face_count();
        let final_vertices = self.buffer.vertex_count();
        let rounds = u32::try_from(self.reports.len()).unwrap_or(u32::MAX);
        (
            SubdivisionResult {
                buffer: self.buffer,
                original_faces: self.original_faces,
                final_faces,
                original_vertices: self.original_vertices,
                final_vertices,
                rounds,
                reports: self.reports,
            },
            self.target,
        )
    }
}

/// Subdivide `buffer` for the number of rounds in `params`.
///
/// Crease edges and pinned vertices already attached to the buffer are
/// honoured; the returned buffer carries the propagated crease set. Zero
/// rounds returns the buffer untouched.
///
/// # Errors
///
/// Returns an error if:
/// - The buffer is empty (no vertices or faces)
/// - The buffer fails validation
/// - The resulting mesh would exceed `max_faces`
/// - The one-ring cap is zero
///
/// # Examples
///
/// ```
/// use mesh_corner::tetrahedron;
/// use mesh_loop::{subdivide, SubdivideParams};
///
/// let params = SubdivideParams::new().with_rounds(2);
/// let result = subdivide(tetrahedron(), &params)?;
///
/// // 4 * 4^2 = 64 faces after 2 rounds
/// assert_eq!(result.final_faces, 64);
/// assert_eq!(result.final_vertices, 34);
/// # Ok::<(), mesh_loop::SubdivideError>(())
/// ```
pub fn subdivide(
    buffer: GeometryBuffer,
    params: &SubdivideParams,
) -> SubdivideResult<SubdivisionResult> {
    SubdivisionContext::new(buffer, params.clone()).run()
}

/// Attach crease edges and pinned vertices to `buffer`, then subdivide.
///
/// # Errors
///
/// See [`subdivide`].
///
/// # Examples
///
/// ```
/// use mesh_corner::{unit_cube, Edge, Point3};
/// use mesh_loop::{subdivide_with_creases, SubdivideParams};
///
/// let a = Point3::new(0.0, 0.0, 0.0);
/// let b = Point3::new(1.0, 0.0, 0.0);
/// let result = subdivide_with_creases(
///     unit_cube(),
///     [Edge::new(a, b)],
///     [a],
///     &SubdivideParams::default(),
/// )?;
///
/// assert_eq!(result.buffer.vertices[0], a);
/// assert_eq!(result.buffer.creases.edge_count(), 2);
/// # Ok::<(), mesh_loop::SubdivideError>(())
/// ```
pub fn subdivide_with_creases(
    buffer: GeometryBuffer,
    edges: impl IntoIterator<Item = Edge>,
    pinned: impl IntoIterator<Item = Point3<f64>>,
    params: &SubdivideParams,
) -> SubdivideResult<SubdivisionResult> {
    subdivide(
        buffer.with_crease_edges(edges).with_pinned_vertices(pinned),
        params,
    )
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::params::AdjacencyStrategy;
    use mesh_corner::{tetrahedron, unit_cube};

    fn make_triangle() -> GeometryBuffer {
        GeometryBuffer::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_subdivide_empty_mesh() {
        let result = subdivide(GeometryBuffer::new(), &SubdivideParams::default());
        assert!(matches!(result, Err(SubdivideError::EmptyMesh)));
    }

    #[test]
    fn test_subdivide_no_faces() {
        let mut buffer = GeometryBuffer::new();
        buffer.add_vertices([Point3::new(0.0, 0.0, 0.0)]);
        let result = subdivide(buffer, &SubdivideParams::default());
        assert!(matches!(result, Err(SubdivideError::NoFaces)));
    }

    #[test]
    fn test_subdivide_zero_rounds_passthrough() {
        let buffer = unit_cube();
        let params = SubdivideParams::new().with_rounds(0);
        let result = subdivide(buffer.clone(), &params);

        assert!(result.is_ok());
        if let Ok(result) = result {
            assert_eq!(result.buffer.vertices, buffer.vertices);
            assert_eq!(result.buffer.triangles, buffer.triangles);
            assert_eq!(result.buffer.generation(), buffer.generation());
            assert!(result.buffer.uv.is_empty());
            assert!(!result.was_subdivided());
        }
    }

    #[test]
    fn test_subdivide_too_large() {
        let params = SubdivideParams::new().with_rounds(2).with_max_faces(100);
        let result = subdivide(unit_cube(), &params);
        assert!(matches!(
            result,
            Err(SubdivideError::MeshTooLarge {
                current: 12,
                projected: 192,
                max: 100
            })
        ));
    }

    #[test]
    fn test_step_too_large_leaves_buffer() {
        let params = SubdivideParams::new().with_max_faces(20);
        let mut ctx = SubdivisionContext::new(tetrahedron(), params);
        assert!(ctx.step().is_ok());
        assert!(matches!(
            ctx.step(),
            Err(SubdivideError::MeshTooLarge { current: 16, .. })
        ));
        assert_eq!(ctx.buffer().face_count(), 16);
    }

    #[test]
    fn test_subdivide_two_rounds() {
        let params = SubdivideParams::new().with_rounds(2);
        let result = subdivide(unit_cube(), &params);
        assert!(result.is_ok());
        if let Ok(result) = result {
            assert_eq!(result.rounds, 2);
            assert_eq!(result.final_faces, 192);
            // V - E + F = 2: 26 + 72 edges
            assert_eq!(result.final_vertices, 98);
            assert_eq!(result.reports.len(), 2);
            assert_eq!(result.reports[1].round, 2);
            assert!((result.face_ratio() - 16.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_uvs_projected_each_round() {
        let mut ctx = SubdivisionContext::new(tetrahedron(), SubdivideParams::default());
        assert!(ctx.step().is_ok());
        assert_eq!(ctx.buffer().uv.len(), 10);
        assert!(ctx.buffer().uv.iter().any(|uv| uv.x > 0.0 || uv.y > 0.0));
        assert_eq!(ctx.target().commit_count(), 2);
        assert_eq!(ctx.target().positions.len(), 10);
    }

    #[test]
    fn test_uv_projection_disabled() {
        let params = SubdivideParams::new().with_uv_projection(false);
        let result = subdivide(tetrahedron(), &params);
        assert!(result.is_ok());
        if let Ok(result) = result {
            assert!(result.buffer.uv.iter().all(|uv| uv.x == 0.0 && uv.y == 0.0));
        }
    }

    #[test]
    fn test_corner_table_rebuilt_after_step() {
        let mut ctx = SubdivisionContext::new(tetrahedron(), SubdivideParams::default());
        assert_eq!(ctx.corner_table().len(), 12);
        assert!(ctx.step().is_ok());
        assert_eq!(ctx.corner_table().len(), 48);
        assert_eq!(ctx.corner_table().generation(), ctx.buffer().generation());
    }

    #[test]
    fn test_pairwise_matches_hashed() {
        let hashed = subdivide(unit_cube(), &SubdivideParams::new().with_rounds(2));
        let pairwise = subdivide(
            unit_cube(),
            &SubdivideParams::new()
                .with_rounds(2)
                .with_adjacency(AdjacencyStrategy::Pairwise),
        );
        assert!(hashed.is_ok() && pairwise.is_ok());
        if let (Ok(hashed), Ok(pairwise)) = (hashed, pairwise) {
            assert_eq!(hashed.buffer.vertices, pairwise.buffer.vertices);
            assert_eq!(hashed.buffer.triangles, pairwise.buffer.triangles);
        }
    }

    #[test]
    fn test_subdivide_with_creases_propagates() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let params = SubdivideParams::new().with_rounds(2);
        let result = subdivide_with_creases(unit_cube(), [Edge::new(a, b)], [a, b], &params);
        assert!(result.is_ok());
        if let Ok(result) = result {
            // One crease doubles each round while its endpoints hold still
            assert_eq!(result.buffer.creases.edge_count(), 4);
            assert!(result.buffer.creases.edges().iter().all(|e| {
                e.a.y == 0.0 && e.a.z == 0.0 && e.b.y == 0.0 && e.b.z == 0.0
            }));
            assert_eq!(result.buffer.vertices[0], a);
            assert_eq!(result.buffer.vertices[1], b);
            assert!(result.reports.iter().all(|r| r.dropped_creases == 0));
        }
    }

    #[test]
    fn test_crease_lost_when_endpoints_move() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let params = SubdivideParams::new().with_rounds(2);
        let result = subdivide_with_creases(
            unit_cube(),
            [Edge::new(a, b)],
            Vec::<Point3<f64>>::new(),
            &params,
        );
        assert!(result.is_ok());
        if let Ok(result) = result {
            // Children keep the pre-round endpoints, which the crease rule moved
            assert_eq!(result.reports[0].crease_edges, 2);
            assert_eq!(result.reports[1].matched_creases, 0);
            assert_eq!(result.reports[1].dropped_creases, 2);
            assert_eq!(result.buffer.creases.edge_count(), 0);
        }
    }

    #[test]
    fn test_open_triangle_run() {
        let result = subdivide(make_triangle(), &SubdivideParams::new().with_rounds(2));
        assert!(result.is_ok());
        if let Ok(result) = result {
            assert_eq!(result.final_faces, 16);
            assert_eq!(result.final_vertices, 15);
            assert_eq!(result.reports[0].boundary_edges, 3);
            assert_eq!(result.reports[1].boundary_edges, 6);
        }
    }

    #[test]
    fn test_run_to_target() {
        let ctx = SubdivisionContext::new(tetrahedron(), SubdivideParams::default());
        let outcome = ctx.run_to_target();
        assert!(outcome.is_ok());
        if let Ok((result, mesh)) = outcome {
            assert_eq!(mesh.positions, result.buffer.vertices);
            assert_eq!(mesh.uv, result.buffer.uv);
        }
    }
}
