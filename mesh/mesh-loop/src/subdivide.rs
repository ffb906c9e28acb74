//! One round of Loop subdivision over a corner table.
//!
//! A round runs in three phases over the current buffer:
//!
//! 1. **Even vertices** - every original vertex is repositioned: pinned
//!    vertices stay put, crease endpoints use a 3/4, 1/8, 1/8 rule and all
//!    others are smoothed over their one-ring.
//! 2. **Odd vertices** - one new vertex per edge, the crease midpoint or the
//!    3/8, 1/8 Loop mask.
//! 3. **Retopology** - each triangle becomes four.
//!
//! Even vertices keep their original indices; odd vertices are appended.

// Index arithmetic over a buffer whose size is already bounded by max_faces
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

use mesh_corner::{
    CornerTable, Edge, GeometryBuffer, Point2, Point3, RingOutcome, Vector3, next_corner,
    prev_corner,
};
use tracing::{debug, trace, warn};

use crate::error::{SubdivideError, SubdivideResult};
use crate::params::SubdivideParams;
use crate::result::RoundReport;

/// Marker for a corner whose odd vertex has not been assigned yet.
const UNASSIGNED: u32 = u32::MAX;

/// Smoothing weight `β` for a vertex of valence `n`.
///
/// `3 / (8n)` above valence three, `3/16` at three, and zero below, which
/// leaves degenerate vertices in place.
///
/// ```
/// use mesh_loop::loop_beta;
///
/// assert_eq!(loop_beta(3), 3.0 / 16.0);
/// assert_eq!(loop_beta(6), 1.0 / 16.0);
/// assert_eq!(loop_beta(2), 0.0);
/// ```
#[must_use]
pub fn loop_beta(valence: usize) -> f64 {
    match valence {
        0..=2 => 0.0,
        3 => 3.0 / 16.0,
        n => 3.0 / (8.0 * n as f64),
    }
}

/// Perform one subdivision round in place.
///
/// `table` must have been built from `buffer` in its current state. On
/// success the buffer holds four times as many triangles, its crease edges
/// are replaced by the halves of every crease that matched a mesh edge, and
/// its generation has advanced, so `table` is stale afterwards.
///
/// Texture coordinates are reset to the origin; see
/// [`finalize`](crate::finalize) for regenerating them.
///
/// # Errors
///
/// Returns an error if:
/// - The buffer has no vertices or no triangles
/// - The buffer fails [`GeometryBuffer::validate`]
/// - `table` does not belong to the buffer's current generation
/// - The one-ring cap in `params` is zero
///
/// # Examples
///
/// ```
/// use mesh_corner::{tetrahedron, CornerTable};
/// use mesh_loop::{subdivide_round, SubdivideParams};
///
/// let mut buffer = tetrahedron();
/// let table = CornerTable::build(&buffer);
///
/// let report = subdivide_round(&mut buffer, &table, &SubdivideParams::default())?;
/// assert_eq!(report.faces, 16);
/// assert_eq!(buffer.vertex_count(), 10);
/// assert!(!table.is_current_for(&buffer));
/// # Ok::<(), mesh_loop::SubdivideError>(())
/// ```
pub fn subdivide_round(
    buffer: &mut GeometryBuffer,
    table: &CornerTable,
    params: &SubdivideParams,
) -> SubdivideResult<RoundReport> {
    if buffer.vertices.is_empty() {
        return Err(SubdivideError::EmptyMesh);
    }
    if buffer.triangles.is_empty() {
        return Err(SubdivideError::NoFaces);
    }
    params.validate()?;
    buffer.validate()?;
    if !table.is_current_for(buffer) {
        return Err(SubdivideError::StaleCornerTable {
            table_generation: table.generation(),
            buffer_generation: buffer.generation(),
            table_corners: table.len(),
            buffer_corners: buffer.corner_count(),
        });
    }

    let mut report = RoundReport::default();

    let mut vertices = even_vertices(buffer, table, params.one_ring_cap, &mut report);
    report.even_vertices = vertices.len();

    let (edge_vertex, creases) = odd_vertices(buffer, table, &mut vertices, &mut report);
    report.odd_vertices = vertices.len() - report.even_vertices;

    let triangles = retopologize(&buffer.triangles, &edge_vertex);
    report.faces = triangles.len() / 3;

    let previous_creases = buffer.creases.edge_count();
    report.dropped_creases = previous_creases.saturating_sub(report.matched_creases);
    if report.dropped_creases > 0 {
        trace!(
            dropped = report.dropped_creases,
            "crease edges matched no mesh edge and were discarded"
        );
    }
    buffer.creases.replace_edges(creases);
    report.crease_edges = buffer.creases.edge_count();

    if report.boundary_edges > 0 {
        warn!(
            boundary_edges = report.boundary_edges,
            "subdividing an open mesh, boundary edges are split at their midpoints"
        );
    }

    let uv = vec![Point2::origin(); vertices.len()];
    buffer.replace_tables(vertices, triangles, uv);

    debug!(
        "Subdivision round: {} even + {} odd vertices, {} faces, {} crease edges",
        report.even_vertices, report.odd_vertices, report.faces, report.crease_edges
    );

    Ok(report)
}

/// Position at `corner`. The buffer has been validated.
#[inline]
fn corner_position(buffer: &GeometryBuffer, corner: usize) -> Point3<f64> {
    buffer.vertices[buffer.triangles[corner] as usize]
}

/// Phase one: reposition every original vertex.
fn even_vertices(
    buffer: &GeometryBuffer,
    table: &CornerTable,
    cap: usize,
    report: &mut RoundReport,
) -> Vec<Point3<f64>> {
    let first_corners = buffer.first_corners();
    let creases = &buffer.creases;

    buffer
        .vertices
        .iter()
        .zip(first_corners)
        .map(|(&position, first)| {
            // Vertices no triangle references keep their position
            let Some(start) = first else {
                return position;
            };

            if creases.is_pinned(&position) {
                return position;
            }

            if creases.touches_edge(&position) {
                let next = corner_position(buffer, next_corner(start));
                let prev = corner_position(buffer, prev_corner(start));
                return Point3::from(
                    position.coords * 0.75 + next.coords * 0.125 + prev.coords * 0.125,
                );
            }

            let walk = table.walk_one_ring(start, cap);
            if walk.outcome == RingOutcome::Capped {
                report.capped_walks += 1;
                trace!(
                    start,
                    cap,
                    "one-ring walk capped, using truncated neighbourhood"
                );
            }

            let valence = walk.valence();
            if valence < 3 {
                report.degenerate_vertices += 1;
            }

            let neighbours: Vector3<f64> = walk
                .corners
                .iter()
                .map(|&c| corner_position(buffer, next_corner(c)).coords)
                .sum();

            let beta = loop_beta(valence);
            Point3::from(position.coords * (1.0 - valence as f64 * beta) + neighbours * beta)
        })
        .collect()
}

/// Phase two: append one vertex per edge.
///
/// Returns, for every corner, the index of the vertex placed on the edge
/// opposite it, together with the halves of every crease edge that was split.
fn odd_vertices(
    buffer: &GeometryBuffer,
    table: &CornerTable,
    vertices: &mut Vec<Point3<f64>>,
    report: &mut RoundReport,
) -> (Vec<u32>, Vec<Edge>) {
    let creases = &buffer.creases;
    let mut edge_vertex = vec![UNASSIGNED; buffer.corner_count()];
    let mut children = Vec::with_capacity(creases.edge_count() * 2);

    for corner in 0..buffer.corner_count() {
        if edge_vertex[corner] != UNASSIGNED {
            continue;
        }

        let a = corner_position(buffer, next_corner(corner));
        let apex = corner_position(buffer, corner);
        let opposite = table.opposite(corner);

        let b = match opposite {
            Some(o) => corner_position(buffer, next_corner(o)),
            None => corner_position(buffer, prev_corner(corner)),
        };
        let edge = Edge::new(a, b);

        let position = if creases.contains_edge(&edge) {
            let mid = edge.midpoint();
            children.extend(edge.split_at(mid));
            report.matched_creases += 1;
            mid
        } else if let Some(o) = opposite {
            let far = corner_position(buffer, o);
            Point3::from((a.coords + b.coords) * (3.0 / 8.0) + (apex.coords + far.coords) * 0.125)
        } else {
            edge.midpoint()
        };

        if opposite.is_none() {
            report.boundary_edges += 1;
        }

        let index = vertices.len() as u32;
        vertices.push(position);
        edge_vertex[corner] = index;
        if let Some(o) = opposite {
            edge_vertex[o] = index;
        }
    }

    (edge_vertex, children)
}

/// Phase three: split every triangle into four, keeping its winding.
///
/// For a triangle with first corner `f`, the odd vertex on edge
/// `(prev f, f)` is the one opposite `next f`, and so on around.
fn retopologize(triangles: &[u32], edge_vertex: &[u32]) -> Vec<u32> {
    let mut result = Vec::with_capacity(triangles.len() * 4);

    for f in (0..triangles.len()).step_by(3) {
        let (p, n) = (prev_corner(f), next_corner(f));

        let even_prev = triangles[p];
        let even_face = triangles[f];
        let even_next = triangles[n];

        let oa = edge_vertex[n];
        let ob = edge_vertex[p];
        let oc = edge_vertex[f];

        result.extend_from_slice(&[even_prev, oa, oc]);
        result.extend_from_slice(&[oa, even_face, ob]);
        result.extend_from_slice(&[oc, ob, even_next]);
        result.extend_from_slice(&[oa, ob, oc]);
    }

    result
}
