//! Hand-off of subdivided buffers to a renderable mesh.

use mesh_corner::{GeometryBuffer, Point2, Point3, Vector3};
use nalgebra::Vector4;

/// Destination for committed geometry.
///
/// A commit copies the buffer's current arrays and derives per-vertex
/// normals. [`finalize`](crate::finalize) reads those normals back to
/// project texture coordinates, then commits again.
pub trait MeshCommit {
    /// Replace the target's geometry with the contents of `buffer`.
    fn commit(&mut self, buffer: &GeometryBuffer);

    /// Per-vertex unit normals from the most recent commit, one per vertex.
    fn vertex_normals(&self) -> &[Vector3<f64>];
}

/// Plain-array mesh with derived normals and tangents.
///
/// Tangents are `(x, y, z, w)` with `w = ±1` giving the bitangent handedness,
/// the usual layout for normal mapping.
#[derive(Debug, Clone, Default)]
pub struct RenderMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Triangle corner stream.
    pub indices: Vec<u32>,
    /// Texture coordinates, empty if the buffer had none.
    pub uv: Vec<Point2<f64>>,
    /// Area-weighted unit vertex normals.
    pub normals: Vec<Vector3<f64>>,
    /// Unit tangents with handedness in `w`.
    pub tangents: Vec<Vector4<f64>>,
    commits: usize,
}

impl RenderMesh {
    /// Create an empty target.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commits received.
    #[must_use]
    pub const fn commit_count(&self) -> usize {
        self.commits
    }

    /// Number of triangles.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl MeshCommit for RenderMesh {
    fn commit(&mut self, buffer: &GeometryBuffer) {
        self.positions.clone_from(&buffer.vertices);
        self.indices.clone_from(&buffer.triangles);
        self.uv.clone_from(&buffer.uv);
        self.normals = vertex_normals(buffer);
        self.tangents = vertex_tangents(buffer, &self.normals);
        self.commits += 1;
    }

    fn vertex_normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }
}

/// Area-weighted vertex normals. Vertices with no non-degenerate incident
/// face get a zero normal.
#[must_use]
pub fn vertex_normals(buffer: &GeometryBuffer) -> Vec<Vector3<f64>> {
    let mut normals = vec![Vector3::zeros(); buffer.vertex_count()];

    for (face, triangle) in buffer.triangles.chunks_exact(3).enumerate() {
        let Some(tri) = buffer.triangle(face) else {
            continue;
        };
        // Unnormalised cross product has length 2 * area
        let weighted = tri.normal_unnormalized();
        for &vi in triangle {
            if let Some(n) = normals.get_mut(vi as usize) {
                *n += weighted;
            }
        }
    }

    for normal in &mut normals {
        let len = normal.norm();
        if len > f64::EPSILON {
            *normal /= len;
        }
    }

    normals
}

/// Per-vertex tangents from positions, normals and uvs.
///
/// Without one uv per vertex, or where the uv mapping is degenerate, the
/// tangent falls back to an arbitrary direction perpendicular to the normal.
#[must_use]
pub fn vertex_tangents(buffer: &GeometryBuffer, normals: &[Vector3<f64>]) -> Vec<Vector4<f64>> {
    let count = buffer.vertex_count();
    let mut tan_u = vec![Vector3::zeros(); count];
    let mut tan_v = vec![Vector3::zeros(); count];

    if buffer.uv.len() == count {
        for triangle in buffer.triangles.chunks_exact(3) {
            let [i0, i1, i2] = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            if i0 >= count || i1 >= count || i2 >= count {
                continue;
            }

            let e1 = buffer.vertices[i1] - buffer.vertices[i0];
            let e2 = buffer.vertices[i2] - buffer.vertices[i0];
            let d1 = buffer.uv[i1] - buffer.uv[i0];
            let d2 = buffer.uv[i2] - buffer.uv[i0];

            let det = d1.x * d2.y - d2.x * d1.y;
            if det.abs() <= f64::EPSILON {
                continue;
            }
            let r = 1.0 / det;
            let sdir = (e1 * d2.y - e2 * d1.y) * r;
            let tdir = (e2 * d1.x - e1 * d2.x) * r;

            for i in [i0, i1, i2] {
                tan_u[i] += sdir;
                tan_v[i] += tdir;
            }
        }
    }

    (0..count)
        .map(|i| {
            let n = normals.get(i).copied().unwrap_or_else(Vector3::zeros);
            // Gram-Schmidt against the normal
            let t = tan_u[i] - n * n.dot(&tan_u[i]);
            let t = if t.norm() > f64::EPSILON {
                t.normalize()
            } else {
                perpendicular(&n)
            };
            let w = if n.cross(&t).dot(&tan_v[i]) < 0.0 {
                -1.0
            } else {
                1.0
            };
            Vector4::new(t.x, t.y, t.z, w)
        })
        .collect()
}

/// Some unit vector perpendicular to `n`, or +X for a zero normal.
fn perpendicular(n: &Vector3<f64>) -> Vector3<f64> {
    let axis = if n.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let t = axis - n * n.dot(&axis);
    if t.norm() > f64::EPSILON {
        t.normalize()
    } else {
        Vector3::x()
    }
}
