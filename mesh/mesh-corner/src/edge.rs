//! Position-keyed undirected edges.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An unordered pair of positions.
///
/// Edges identify mesh edges by *value*, not by vertex index, so an edge
/// survives a buffer regeneration only if both endpoint positions are
/// reproduced bit-for-bit. No tolerance is applied: positions that differ by
/// floating-point noise are different edges.
///
/// # Example
///
/// ```
/// use mesh_corner::{Edge, Point3};
///
/// let p = Point3::new(0.0, 0.0, 0.0);
/// let q = Point3::new(1.0, 0.0, 0.0);
///
/// assert!(Edge::new(p, q).matches(&Edge::new(q, p)));
/// assert_eq!(Edge::new(p, q), Edge::new(q, p));
/// ```
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    /// First endpoint.
    pub a: Point3<f64>,
    /// Second endpoint.
    pub b: Point3<f64>,
}

impl Edge {
    /// Create an edge between two positions.
    #[inline]
    #[must_use]
    pub const fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self { a, b }
    }

    /// True iff `{a, b} == {other.a, other.b}` under exact equality.
    #[inline]
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }

    /// True if `p` equals either endpoint.
    #[inline]
    #[must_use]
    pub fn has_endpoint(&self, p: &Point3<f64>) -> bool {
        self.a == *p || self.b == *p
    }

    /// Midpoint `0.5 * a + 0.5 * b`.
    #[inline]
    #[must_use]
    pub fn midpoint(&self) -> Point3<f64> {
        Point3::from(self.a.coords * 0.5 + self.b.coords * 0.5)
    }

    /// Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }

    /// The two halves `(a, mid)` and `(mid, b)` around `mid`.
    #[inline]
    #[must_use]
    pub const fn split_at(&self, mid: Point3<f64>) -> [Self; 2] {
        [Self::new(self.a, mid), Self::new(mid, self.b)]
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl From<(Point3<f64>, Point3<f64>)> for Edge {
    fn from((a, b): (Point3<f64>, Point3<f64>)) -> Self {
        Self::new(a, b)
    }
}
