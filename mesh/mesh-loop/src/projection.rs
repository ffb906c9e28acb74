//! Texture coordinate generation.
//!
//! After a round the buffer's uvs are reset. [`project_uvs`] assigns each
//! vertex a planar projection chosen by its normal's dominant axis, with
//! coordinates normalised into the buffer's bounding box.

use mesh_corner::{GeometryBuffer, Point2, Vector3};
use tracing::debug;

use crate::render::MeshCommit;

/// Coordinate plane used for a planar projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanarAxis {
    /// Project onto XY, dropping Z.
    Xy,
    /// Project onto XZ, dropping Y.
    Xz,
    /// Project onto YZ, dropping X.
    Yz,
}

impl PlanarAxis {
    /// Plane facing `normal` most directly.
    ///
    /// Ties go to X first, then Y. A zero normal picks [`PlanarAxis::Yz`].
    #[must_use]
    pub fn facing(normal: &Vector3<f64>) -> Self {
        let n = normal.abs();
        if n.x >= n.y && n.x >= n.z {
            Self::Yz
        } else if n.y >= n.z {
            Self::Xz
        } else {
            Self::Xy
        }
    }

    /// Drop the axis normal to this plane.
    #[must_use]
    pub fn project(self, v: &Vector3<f64>) -> Point2<f64> {
        match self {
            Self::Xy => Point2::new(v.x, v.y),
            Self::Xz => Point2::new(v.x, v.z),
            Self::Yz => Point2::new(v.y, v.z),
        }
    }
}

/// Assign per-vertex uvs by dominant-axis planar projection.
///
/// `normals` are indexed by vertex; missing entries count as zero normals.
/// Each uv lies in `[0, 1]^2`; an axis along which the buffer is flat maps
/// to `0`.
///
/// ```
/// use mesh_corner::{GeometryBuffer, Point3, Vector3};
/// use mesh_loop::project_uvs;
///
/// let mut buffer = GeometryBuffer::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(4.0, 0.0, 0.0),
///         Point3::new(0.0, 2.0, 0.0),
///     ],
///     vec![0, 1, 2],
/// );
/// project_uvs(&mut buffer, &[Vector3::z(); 3]);
///
/// assert_eq!(buffer.uv[1].x, 1.0);
/// assert_eq!(buffer.uv[2].y, 1.0);
/// ```
pub fn project_uvs(buffer: &mut GeometryBuffer, normals: &[Vector3<f64>]) {
    let bounds = buffer.bounds();
    let uv = buffer
        .vertices
        .iter()
        .enumerate()
        .map(|(i, position)| {
            let normal = normals.get(i).copied().unwrap_or_else(Vector3::zeros);
            PlanarAxis::facing(&normal).project(&bounds.normalized(position))
        })
        .collect();
    buffer.uv = uv;
}

/// Assign per-vertex uvs by projecting every vertex onto the same plane.
pub fn planar_uvs(buffer: &mut GeometryBuffer, axis: PlanarAxis) {
    let bounds = buffer.bounds();
    buffer.uv = buffer
        .vertices
        .iter()
        .map(|position| axis.project(&bounds.normalized(position)))
        .collect();
}

/// Commit `buffer`, project uvs from the committed normals, and commit again
/// so the target sees the new uvs.
pub fn finalize<C: MeshCommit + ?Sized>(buffer: &mut GeometryBuffer, target: &mut C) {
    target.commit(buffer);
    let normals = target.vertex_normals().to_vec();
    project_uvs(buffer, &normals);
    target.commit(buffer);
    debug!(
        "Finalized buffer: {} vertices, {} faces",
        buffer.vertex_count(),
        buffer.face_count()
    );
}
