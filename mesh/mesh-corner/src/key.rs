//! Exact-value hash keys for positions and edges.
//!
//! Crease membership and corner adjacency compare positions with `==`.
//! These keys give the same answers in a hash map: two positions produce the
//! same key iff every coordinate compares equal. `-0.0` is folded onto `0.0`
//! because IEEE equality treats them as the same value. NaN coordinates never
//! compare equal to anything and are not expected in mesh data.

use nalgebra::Point3;

/// Bit pattern of one coordinate with signed zero folded.
#[inline]
fn coord_bits(value: f64) -> u64 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

/// Hash key equivalent to exact equality of a [`Point3<f64>`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct PositionKey([u64; 3]);

impl PositionKey {
    #[inline]
    pub(crate) fn of(p: &Point3<f64>) -> Self {
        Self([coord_bits(p.x), coord_bits(p.y), coord_bits(p.z)])
    }
}

/// Key for an unordered position pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EdgeKey(PositionKey, PositionKey);

impl EdgeKey {
    pub(crate) fn unordered(p: &Point3<f64>, q: &Point3<f64>) -> Self {
        let a = PositionKey::of(p);
        let b = PositionKey::of(q);
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

/// Key for an ordered position pair (a half-edge running `from -> to`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct DirectedEdgeKey(PositionKey, PositionKey);

impl DirectedEdgeKey {
    pub(crate) fn new(from: &Point3<f64>, to: &Point3<f64>) -> Self {
        Self(PositionKey::of(from), PositionKey::of(to))
    }

    pub(crate) const fn reversed(self) -> Self {
        Self(self.1, self.0)
    }
}
