//! Corner table: opposite-corner adjacency for a triangle stream.
//!
//! A corner is one slot of [`GeometryBuffer::triangles`]. The edge *opposite*
//! corner `c` runs from the vertex at `next(c)` to the vertex at `prev(c)`.
//! Two corners are opposite each other when their opposite edges are the same
//! geometric edge traversed in reverse, i.e. the two triangles share that edge
//! with consistent winding.
//!
//! ```text
//!              c
//!             / \
//!            /   \
//!   prev(c) +-----+ next(c)      edge opposite c: next(c) -> prev(c)
//!            \   /               edge opposite o: next(o) -> prev(o)
//!             \ /                  (same positions, reversed)
//!              o
//! ```
//!
//! Vertices are compared by position, so buffers whose producers emit a
//! separate copy of a vertex per face still link up.

use hashbrown::HashMap;
use tracing::trace;

use crate::buffer::GeometryBuffer;
use crate::key::DirectedEdgeKey;

/// Default limit on one-ring walk length.
pub const DEFAULT_ONE_RING_CAP: usize = 10;

/// Triangle that owns `corner`.
#[inline]
#[must_use]
pub const fn triangle_of(corner: usize) -> usize {
    corner / 3
}

/// Successor of `corner` within its triangle.
#[inline]
#[must_use]
pub const fn next_corner(corner: usize) -> usize {
    3 * triangle_of(corner) + (corner % 3 + 1) % 3
}

/// Predecessor of `corner` within its triangle.
#[inline]
#[must_use]
pub const fn prev_corner(corner: usize) -> usize {
    next_corner(next_corner(corner))
}

/// How a one-ring walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingOutcome {
    /// Came back to the starting corner.
    Closed,
    /// Hit a corner without an opposite.
    Boundary,
    /// Stopped at the step cap before closing.
    Capped,
}

/// Corners visited while swinging around one vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingWalk {
    /// Visited corners, starting corner first. All reference the same vertex
    /// position.
    pub corners: Vec<usize>,
    /// Why the walk stopped.
    pub outcome: RingOutcome,
}

impl RingWalk {
    /// Number of neighbours counted, which is the valence for a closed walk.
    #[inline]
    #[must_use]
    pub fn valence(&self) -> usize {
        self.corners.len()
    }
}

/// Opposite-corner table for one generation of a [`GeometryBuffer`].
///
/// The table is only valid for the buffer generation it was built from.
/// Subdivision replaces topology wholesale, so a fresh table is built every
/// round; [`CornerTable::is_current_for`] detects reuse of a stale one.
///
/// # Example
///
/// ```
/// use mesh_corner::{tetrahedron, CornerTable, RingOutcome};
///
/// let tet = tetrahedron();
/// let table = CornerTable::build(&tet);
///
/// assert_eq!(table.boundary_corner_count(), 0);
/// let ring = table.walk_one_ring(0, 10);
/// assert_eq!(ring.outcome, RingOutcome::Closed);
/// assert_eq!(ring.valence(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CornerTable {
    opposite: Vec<Option<usize>>,
    generation: u64,
}

impl CornerTable {
    /// Build the table with a hashed directed-edge map, in linear time.
    ///
    /// On non-manifold input, where more than one corner could claim the same
    /// partner, the last candidate in stream order wins. Corners that cannot
    /// be resolved (bad index, partial trailing triangle) are left unmatched.
    #[must_use]
    pub fn build(buffer: &GeometryBuffer) -> Self {
        let keys = opposite_edge_keys(buffer);

        let mut by_edge: HashMap<DirectedEdgeKey, Vec<usize>> =
            HashMap::with_capacity(keys.len());
        for (corner, key) in keys.iter().enumerate() {
            if let Some(key) = key {
                by_edge.entry(*key).or_default().push(corner);
            }
        }

        let mut opposite = vec![None; keys.len()];
        for (i, key) in keys.iter().enumerate() {
            let Some(key) = key else { continue };
            let Some(candidates) = by_edge.get(&key.reversed()) else {
                continue;
            };
            if let Some(&j) = candidates.iter().rev().find(|&&j| j != i) {
                opposite[i] = Some(j);
                opposite[j] = Some(i);
            }
        }

        Self::finish(opposite, buffer)
    }

    /// Build the table by testing every ordered pair of corners.
    ///
    /// Quadratic in the corner count. Kept as the reference construction;
    /// on manifold input it produces the same table as [`CornerTable::build`].
    #[must_use]
    pub fn build_pairwise(buffer: &GeometryBuffer) -> Self {
        let keys = opposite_edge_keys(buffer);
        let mut opposite = vec![None; keys.len()];

        for (i, ki) in keys.iter().enumerate() {
            let Some(ki) = ki else { continue };
            for (j, kj) in keys.iter().enumerate() {
                if i != j && kj.is_some_and(|kj| *ki == kj.reversed()) {
                    opposite[i] = Some(j);
                    opposite[j] = Some(i);
                }
            }
        }

        Self::finish(opposite, buffer)
    }

    fn finish(opposite: Vec<Option<usize>>, buffer: &GeometryBuffer) -> Self {
        let table = Self {
            opposite,
            generation: buffer.generation(),
        };
        trace!(
            corners = table.len(),
            boundary = table.boundary_corner_count(),
            generation = table.generation,
            "built corner table"
        );
        table
    }

    /// Number of corners covered.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.opposite.len()
    }

    /// True if the table covers no corners.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.opposite.is_empty()
    }

    /// Buffer generation the table was built from.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// True if the table was built from `buffer`'s current topology.
    #[inline]
    #[must_use]
    pub fn is_current_for(&self, buffer: &GeometryBuffer) -> bool {
        self.generation == buffer.generation() && self.len() == buffer.corner_count()
    }

    /// Corner across the edge opposite `corner`, `None` on a boundary.
    #[inline]
    #[must_use]
    pub fn opposite(&self, corner: usize) -> Option<usize> {
        self.opposite.get(corner).copied().flatten()
    }

    /// True if `corner` has no opposite.
    #[inline]
    #[must_use]
    pub fn is_boundary(&self, corner: usize) -> bool {
        self.opposite(corner).is_none()
    }

    /// Number of corners without an opposite.
    #[must_use]
    pub fn boundary_corner_count(&self) -> usize {
        self.opposite.iter().filter(|o| o.is_none()).count()
    }

    /// Raw opposite links, indexed by corner.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.opposite
    }

    /// Next corner around the same vertex: `next(opposite(next(corner)))`.
    ///
    /// Returns `None` when the walk would cross a boundary.
    #[inline]
    #[must_use]
    pub fn swing(&self, corner: usize) -> Option<usize> {
        self.opposite(next_corner(corner)).map(next_corner)
    }

    /// Swing around the vertex at `start` until the walk closes, reaches a
    /// boundary, or has visited `cap` corners.
    ///
    /// The starting corner is always visited, so a `cap` of 0 behaves like 1.
    /// Hitting the cap is how degenerate or non-manifold fans are kept finite;
    /// the resulting valence is an approximation.
    #[must_use]
    pub fn walk_one_ring(&self, start: usize, cap: usize) -> RingWalk {
        let cap = cap.max(1);
        let mut corners = vec![start];
        let mut current = start;

        let outcome = loop {
            match self.swing(current) {
                None => break RingOutcome::Boundary,
                Some(c) if c == start => break RingOutcome::Closed,
                Some(c) => {
                    if corners.len() >= cap {
                        break RingOutcome::Capped;
                    }
                    corners.push(c);
                    current = c;
                }
            }
        };

        RingWalk { corners, outcome }
    }
}

/// Directed key of the edge opposite each corner, `None` if unresolvable.
fn opposite_edge_keys(buffer: &GeometryBuffer) -> Vec<Option<DirectedEdgeKey>> {
    (0..buffer.corner_count())
        .map(|c| {
            let from = buffer.corner_position(next_corner(c))?;
            let to = buffer.corner_position(prev_corner(c))?;
            Some(DirectedEdgeKey::new(from, to))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{tetrahedron, unit_cube};
    use nalgebra::Point3;

    fn quad() -> GeometryBuffer {
        let mut buffer = GeometryBuffer::new();
        buffer.add_vertices([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        buffer.add_triangle(0, 1, 2);
        buffer.add_triangle(0, 2, 3);
        buffer
    }

    #[test]
    fn corner_arithmetic() {
        assert_eq!(next_corner(0), 1);
        assert_eq!(next_corner(2), 0);
        assert_eq!(next_corner(5), 3);
        assert_eq!(prev_corner(3), 5);
        assert_eq!(prev_corner(7), 6);
        assert_eq!(triangle_of(8), 2);
    }

    #[test]
    fn closed_mesh_has_no_boundary() {
        for buffer in [tetrahedron(), unit_cube()] {
            let table = CornerTable::build(&buffer);
            assert_eq!(table.len(), buffer.corner_count());
            assert_eq!(table.boundary_corner_count(), 0);
        }
    }

    #[test]
    fn opposite_is_symmetric_and_shares_edge() {
        let cube = unit_cube();
        let table = CornerTable::build(&cube);
        for c in 0..table.len() {
            let o = table.opposite(c);
            assert!(o.is_some());
            let o = o.unwrap_or_default();
            assert_eq!(table.opposite(o), Some(c));
            assert_ne!(triangle_of(o), triangle_of(c));
            assert_eq!(
                cube.corner_position(next_corner(c)),
                cube.corner_position(prev_corner(o))
            );
            assert_eq!(
                cube.corner_position(prev_corner(c)),
                cube.corner_position(next_corner(o))
            );
        }
    }

    #[test]
    fn quad_has_one_interior_pair() {
        let table = CornerTable::build(&quad());
        // Corner 1 (vertex 1) faces the diagonal 2 -> 0; corner 5 (vertex 3) faces 0 -> 2.
        assert_eq!(table.opposite(1), Some(5));
        assert_eq!(table.opposite(5), Some(1));
        assert_eq!(table.boundary_corner_count(), 4);
    }

    #[test]
    fn pairwise_matches_hashed() {
        for buffer in [tetrahedron(), unit_cube(), quad()] {
            assert_eq!(CornerTable::build(&buffer), CornerTable::build_pairwise(&buffer));
        }
    }

    #[test]
    fn unwelded_copies_link_by_position() {
        let mut buffer = GeometryBuffer::new();
        buffer.add_vertices([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        buffer.add_triangle(0, 1, 2);
        buffer.add_triangle(3, 4, 5);

        let table = CornerTable::build(&buffer);
        assert_eq!(table.opposite(1), Some(5));
    }

    #[test]
    fn swing_walks_tetrahedron_vertex() {
        let tet = tetrahedron();
        let table = CornerTable::build(&tet);
        let ring = table.walk_one_ring(0, DEFAULT_ONE_RING_CAP);

        assert_eq!(ring.outcome, RingOutcome::Closed);
        assert_eq!(ring.valence(), 3);
        for &c in &ring.corners {
            assert_eq!(tet.vertex_at(c), Some(0));
        }
    }

    #[test]
    fn walk_stops_at_boundary() {
        let table = CornerTable::build(&quad());
        let ring = table.walk_one_ring(0, DEFAULT_ONE_RING_CAP);
        assert_eq!(ring.outcome, RingOutcome::Boundary);
    }

    #[test]
    fn walk_respects_cap() {
        let cube = unit_cube();
        let table = CornerTable::build(&cube);
        // Vertex 0 of the cube has six incident triangles.
        let full = table.walk_one_ring(0, DEFAULT_ONE_RING_CAP);
        assert_eq!(full.outcome, RingOutcome::Closed);
        assert_eq!(full.valence(), 6);

        let capped = table.walk_one_ring(0, 4);
        assert_eq!(capped.outcome, RingOutcome::Capped);
        assert_eq!(capped.valence(), 4);

        assert_eq!(table.walk_one_ring(0, 0).valence(), 1);
    }

    #[test]
    fn stale_after_touch() {
        let mut tet = tetrahedron();
        let table = CornerTable::build(&tet);
        assert!(table.is_current_for(&tet));
        tet.touch();
        assert!(!table.is_current_for(&tet));
    }

    #[test]
    fn bad_index_is_boundary() {
        let mut tet = tetrahedron();
        tet.triangles[0] = 99;
        let table = CornerTable::build(&tet);
        assert!(table.is_boundary(1));
        assert!(table.is_boundary(2));
    }
}
