//! Flat corner-addressed triangle buffer.

// Mesh indices are u32; counts beyond that are unsupported.
#![allow(clippy::cast_possible_truncation)]

use hashbrown::HashSet;
use nalgebra::{Point2, Point3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;
use crate::crease::CreaseSet;
use crate::edge::Edge;
use crate::error::BufferError;
use crate::key::EdgeKey;
use crate::triangle::Triangle;

/// A triangle mesh stored as a flat corner stream, plus crease metadata.
///
/// # Memory Layout
///
/// - `vertices`: positions; insertion order is the vertex index.
/// - `triangles`: `3 * F` vertex indices. Each slot is a **corner**; corner
///   `c` belongs to triangle `c / 3`.
/// - `uv`: one texture coordinate per vertex (empty until projected).
/// - `creases`: crease edges and pinned vertices, keyed by position.
///
/// Vertex indices are only meaningful within one generation of the buffer.
/// Every time topology is replaced through [`GeometryBuffer::replace_tables`]
/// the [`generation`](GeometryBuffer::generation) advances, which is what
/// corner tables use to detect that they are stale.
///
/// # Example
///
/// ```
/// use mesh_corner::{GeometryBuffer, Point3};
///
/// let mut buffer = GeometryBuffer::new();
/// buffer.add_vertices([
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ]);
/// buffer.add_triangle(0, 1, 2);
///
/// assert_eq!(buffer.face_count(), 1);
/// assert_eq!(buffer.corner_count(), 3);
/// assert!(buffer.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeometryBuffer {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,

    /// Flattened triangle corner stream.
    pub triangles: Vec<u32>,

    /// Per-vertex texture coordinates.
    pub uv: Vec<Point2<f64>>,

    /// Crease edges and pinned vertices.
    pub creases: CreaseSet,

    #[cfg_attr(feature = "serde", serde(skip))]
    generation: u64,
}

impl GeometryBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(face_count * 3),
            uv: Vec::with_capacity(vertex_count),
            creases: CreaseSet::new(),
            generation: 0,
        }
    }

    /// Create a buffer from positions and a flat corner stream.
    ///
    /// UVs start empty.
    #[must_use]
    pub fn from_parts(vertices: Vec<Point3<f64>>, triangles: Vec<u32>) -> Self {
        Self {
            vertices,
            triangles,
            ..Self::default()
        }
    }

    /// Create a buffer from flat coordinate and index arrays.
    ///
    /// Returns an empty buffer if `positions.len()` is not divisible by 3.
    ///
    /// ```
    /// use mesh_corner::GeometryBuffer;
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let buffer = GeometryBuffer::from_raw(&positions, &[0, 1, 2]);
    /// assert_eq!(buffer.vertex_count(), 3);
    /// ```
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 {
            return Self::new();
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();

        Self::from_parts(vertices, indices.to_vec())
    }

    /// Attach crease edges.
    #[must_use]
    pub fn with_crease_edges(mut self, edges: impl IntoIterator<Item = Edge>) -> Self {
        self.creases.extend_edges(edges);
        self
    }

    /// Attach pinned vertices.
    #[must_use]
    pub fn with_pinned_vertices(mut self, pinned: impl IntoIterator<Item = Point3<f64>>) -> Self {
        self.creases.extend_pinned(pinned);
        self
    }

    /// Append vertices, returning the index of the first one appended.
    pub fn add_vertices(&mut self, positions: impl IntoIterator<Item = Point3<f64>>) -> u32 {
        let first = self.vertices.len() as u32;
        self.vertices.extend(positions);
        first
    }

    /// Append a triangle `(v1, v2, v3)`.
    pub fn add_triangle(&mut self, v1: u32, v2: u32, v3: u32) {
        self.triangles.extend_from_slice(&[v1, v2, v3]);
    }

    /// Append a triangle with flipped winding, stored as `(v3, v2, v1)`.
    pub fn add_triangle_reversed(&mut self, v1: u32, v2: u32, v3: u32) {
        self.triangles.extend_from_slice(&[v3, v2, v1]);
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of whole triangles.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Number of corners (length of the triangle stream).
    #[inline]
    #[must_use]
    pub fn corner_count(&self) -> usize {
        self.triangles.len()
    }

    /// True if the buffer has no vertices or no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.is_empty()
    }

    /// Topology stamp, advanced by every [`replace_tables`](Self::replace_tables).
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Advance the generation after editing `triangles` or `vertices` by hand,
    /// so that previously built corner tables are recognised as stale.
    pub const fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Vertex index stored at `corner`.
    #[inline]
    #[must_use]
    pub fn vertex_at(&self, corner: usize) -> Option<u32> {
        self.triangles.get(corner).copied()
    }

    /// Position of the vertex at `corner`.
    #[inline]
    #[must_use]
    pub fn corner_position(&self, corner: usize) -> Option<&Point3<f64>> {
        self.triangles
            .get(corner)
            .and_then(|&v| self.vertices.get(v as usize))
    }

    /// First corner (in stream order) that references `vertex`.
    #[must_use]
    pub fn first_corner_of(&self, vertex: u32) -> Option<usize> {
        self.triangles.iter().position(|&v| v == vertex)
    }

    /// First corner of every vertex, computed in one pass.
    ///
    /// Entry `i` equals `first_corner_of(i)`.
    #[must_use]
    pub fn first_corners(&self) -> Vec<Option<usize>> {
        let mut first = vec![None; self.vertices.len()];
        for (corner, &v) in self.triangles.iter().enumerate() {
            if let Some(slot) = first.get_mut(v as usize) {
                slot.get_or_insert(corner);
            }
        }
        first
    }

    /// Resolve triangle `face` to positions.
    #[must_use]
    pub fn triangle(&self, face: usize) -> Option<Triangle> {
        let base = face * 3;
        Some(Triangle::new(
            *self.corner_position(base)?,
            *self.corner_position(base + 1)?,
            *self.corner_position(base + 2)?,
        ))
    }

    /// Iterate over all resolvable triangles.
    pub fn triangles_iter(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.face_count()).filter_map(|f| self.triangle(f))
    }

    /// Bounding box of all vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter())
    }

    /// Number of distinct undirected edges, compared by position.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        let mut edges = HashSet::with_capacity(self.triangles.len());
        for face in 0..self.face_count() {
            let base = face * 3;
            for i in 0..3 {
                let a = self.corner_position(base + i);
                let b = self.corner_position(base + (i + 1) % 3);
                if let (Some(a), Some(b)) = (a, b) {
                    edges.insert(EdgeKey::unordered(a, b));
                }
            }
        }
        edges.len()
    }

    /// Check that every corner resolves to a vertex.
    ///
    /// # Errors
    ///
    /// - [`BufferError::MalformedTriangles`] if the stream length is not a
    ///   multiple of 3
    /// - [`BufferError::IndexOutOfRange`] for the first corner whose vertex
    ///   index is out of bounds
    /// - [`BufferError::UvCountMismatch`] if `uv` is non-empty and not one per
    ///   vertex
    pub fn validate(&self) -> Result<(), BufferError> {
        if self.triangles.len() % 3 != 0 {
            return Err(BufferError::MalformedTriangles {
                len: self.triangles.len(),
            });
        }

        let vertex_count = self.vertices.len();
        if let Some((corner, &index)) = self
            .triangles
            .iter()
            .enumerate()
            .find(|&(_, &v)| v as usize >= vertex_count)
        {
            return Err(BufferError::IndexOutOfRange {
                corner,
                index,
                vertex_count,
            });
        }

        if !self.uv.is_empty() && self.uv.len() != vertex_count {
            return Err(BufferError::UvCountMismatch {
                uv_count: self.uv.len(),
                vertex_count,
            });
        }

        Ok(())
    }

    /// Install new vertex, triangle and uv tables, discarding the old ones.
    ///
    /// Crease metadata is kept. Advances the generation.
    pub fn replace_tables(
        &mut self,
        vertices: Vec<Point3<f64>>,
        triangles: Vec<u32>,
        uv: Vec<Point2<f64>>,
    ) {
        self.vertices = vertices;
        self.triangles = triangles;
        self.uv = uv;
        self.touch();
    }

    /// Drop all vertices, triangles and uvs. Crease metadata is kept.
    pub fn clear_tables(&mut self) {
        self.replace_tables(Vec::new(), Vec::new(), Vec::new());
    }

    /// Reset uvs to the origin, one per vertex.
    pub fn reset_uv(&mut self) {
        self.uv = vec![Point2::origin(); self.vertices.len()];
    }
}

/// Regular tetrahedron with outward-facing winding.
///
/// ```
/// use mesh_corner::tetrahedron;
///
/// let tet = tetrahedron();
/// assert_eq!(tet.vertex_count(), 4);
/// assert_eq!(tet.face_count(), 4);
/// assert_eq!(tet.edge_count(), 6);
/// ```
#[must_use]
pub fn tetrahedron() -> GeometryBuffer {
    let mut buffer = GeometryBuffer::with_capacity(4, 4);
    buffer.add_vertices([
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(1.0, -1.0, -1.0),
        Point3::new(-1.0, 1.0, -1.0),
        Point3::new(-1.0, -1.0, 1.0),
    ]);
    buffer.add_triangle(0, 1, 2);
    buffer.add_triangle(0, 3, 1);
    buffer.add_triangle(0, 2, 3);
    buffer.add_triangle(1, 3, 2);
    buffer
}

/// Unit cube from (0,0,0) to (1,1,1), two triangles per side, CCW from outside.
///
/// ```
/// use mesh_corner::unit_cube;
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// assert_eq!(cube.edge_count(), 18);
/// ```
#[must_use]
pub fn unit_cube() -> GeometryBuffer {
    let mut buffer = GeometryBuffer::with_capacity(8, 12);

    buffer.add_vertices([
        Point3::new(0.0, 0.0, 0.0), // 0
        Point3::new(1.0, 0.0, 0.0), // 1
        Point3::new(1.0, 1.0, 0.0), // 2
        Point3::new(0.0, 1.0, 0.0), // 3
        Point3::new(0.0, 0.0, 1.0), // 4
        Point3::new(1.0, 0.0, 1.0), // 5
        Point3::new(1.0, 1.0, 1.0), // 6
        Point3::new(0.0, 1.0, 1.0), // 7
    ]);

    // Bottom (-Z)
    buffer.add_triangle(0, 2, 1);
    buffer.add_triangle(0, 3, 2);
    // Top (+Z)
    buffer.add_triangle(4, 5, 6);
    buffer.add_triangle(4, 6, 7);
    // Front (-Y)
    buffer.add_triangle(0, 1, 5);
    buffer.add_triangle(0, 5, 4);
    // Back (+Y)
    buffer.add_triangle(3, 7, 6);
    buffer.add_triangle(3, 6, 2);
    // Left (-X)
    buffer.add_triangle(0, 4, 7);
    buffer.add_triangle(0, 7, 3);
    // Right (+X)
    buffer.add_triangle(1, 2, 6);
    buffer.add_triangle(1, 6, 5);

    buffer
}
