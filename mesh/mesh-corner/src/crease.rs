//! Crease edges and pinned vertices.

use hashbrown::HashSet;
use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::key::{EdgeKey, PositionKey};

/// Sharp-feature metadata attached to a geometry buffer.
///
/// Membership is by exact position value (see [`Edge`]). Insertion order is
/// preserved so that iteration, and anything derived from it, is
/// deterministic. Inserting an edge or vertex that is already present is a
/// no-op.
///
/// # Example
///
/// ```
/// use mesh_corner::{CreaseSet, Edge, Point3};
///
/// let p = Point3::new(0.0, 0.0, 0.0);
/// let q = Point3::new(1.0, 0.0, 0.0);
///
/// let mut creases = CreaseSet::new();
/// creases.insert_edge(Edge::new(p, q));
/// creases.insert_edge(Edge::new(q, p));
///
/// assert_eq!(creases.edge_count(), 1);
/// assert!(creases.contains_edge(&Edge::new(q, p)));
/// assert!(creases.touches_edge(&p));
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "CreaseParts", into = "CreaseParts")
)]
pub struct CreaseSet {
    edges: Vec<Edge>,
    vertices: Vec<Point3<f64>>,
    edge_keys: HashSet<EdgeKey>,
    endpoint_keys: HashSet<PositionKey>,
    pinned_keys: HashSet<PositionKey>,
}

impl CreaseSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from explicit edge and pinned-vertex lists.
    #[must_use]
    pub fn from_parts(
        edges: impl IntoIterator<Item = Edge>,
        pinned: impl IntoIterator<Item = Point3<f64>>,
    ) -> Self {
        let mut set = Self::new();
        set.extend_edges(edges);
        set.extend_pinned(pinned);
        set
    }

    /// Add a crease edge. Returns `false` if it was already present.
    pub fn insert_edge(&mut self, edge: Edge) -> bool {
        if !self.edge_keys.insert(EdgeKey::unordered(&edge.a, &edge.b)) {
            return false;
        }
        self.endpoint_keys.insert(PositionKey::of(&edge.a));
        self.endpoint_keys.insert(PositionKey::of(&edge.b));
        self.edges.push(edge);
        true
    }

    /// Add a pinned vertex. Returns `false` if it was already present.
    pub fn insert_pinned(&mut self, position: Point3<f64>) -> bool {
        if !self.pinned_keys.insert(PositionKey::of(&position)) {
            return false;
        }
        self.vertices.push(position);
        true
    }

    /// Add several crease edges.
    pub fn extend_edges(&mut self, edges: impl IntoIterator<Item = Edge>) {
        for edge in edges {
            self.insert_edge(edge);
        }
    }

    /// Add several pinned vertices.
    pub fn extend_pinned(&mut self, pinned: impl IntoIterator<Item = Point3<f64>>) {
        for p in pinned {
            self.insert_pinned(p);
        }
    }

    /// Is `edge` one of the crease edges?
    #[inline]
    #[must_use]
    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edge_keys
            .contains(&EdgeKey::unordered(&edge.a, &edge.b))
    }

    /// Is `position` an endpoint of any crease edge?
    #[inline]
    #[must_use]
    pub fn touches_edge(&self, position: &Point3<f64>) -> bool {
        self.endpoint_keys.contains(&PositionKey::of(position))
    }

    /// Is `position` pinned?
    #[inline]
    #[must_use]
    pub fn is_pinned(&self, position: &Point3<f64>) -> bool {
        self.pinned_keys.contains(&PositionKey::of(position))
    }

    /// Crease edges in insertion order.
    #[inline]
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Pinned vertices in insertion order.
    #[inline]
    #[must_use]
    pub fn pinned(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Number of crease edges.
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of pinned vertices.
    #[inline]
    #[must_use]
    pub fn pinned_count(&self) -> usize {
        self.vertices.len()
    }

    /// True if there are no creases and no pinned vertices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.vertices.is_empty()
    }

    /// Remove all crease edges, keeping pinned vertices.
    pub fn clear_edges(&mut self) {
        self.edges.clear();
        self.edge_keys.clear();
        self.endpoint_keys.clear();
    }

    /// Replace the crease edges, keeping pinned vertices.
    pub fn replace_edges(&mut self, edges: impl IntoIterator<Item = Edge>) {
        self.clear_edges();
        self.extend_edges(edges);
    }
}

/// Serialized form: the ordered lists only, lookups are rebuilt on load.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct CreaseParts {
    edges: Vec<Edge>,
    pinned: Vec<Point3<f64>>,
}

#[cfg(feature = "serde")]
impl From<CreaseParts> for CreaseSet {
    fn from(parts: CreaseParts) -> Self {
        Self::from_parts(parts.edges, parts.pinned)
    }
}

#[cfg(feature = "serde")]
impl From<CreaseSet> for CreaseParts {
    fn from(set: CreaseSet) -> Self {
        Self {
            edges: set.edges,
            pinned: set.vertices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
        Point3::new(x, y, z)
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut set = CreaseSet::new();
        assert!(set.insert_edge(Edge::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0))));
        assert!(!set.insert_edge(Edge::new(p(1.0, 0.0, 0.0), p(0.0, 0.0, 0.0))));
        assert_eq!(set.edge_count(), 1);
    }

    #[test]
    fn pinned_membership() {
        let set = CreaseSet::from_parts(Vec::<Edge>::new(), [p(1.0, 2.0, 3.0), p(1.0, 2.0, 3.0)]);
        assert_eq!(set.pinned_count(), 1);
        assert!(set.is_pinned(&p(1.0, 2.0, 3.0)));
        assert!(!set.is_pinned(&p(1.0, 2.0, 3.000_000_1)));
        assert!(!set.touches_edge(&p(1.0, 2.0, 3.0)));
    }

    #[test]
    fn endpoints_are_tracked() {
        let set = CreaseSet::from_parts(
            [Edge::new(p(0.0, 0.0, 0.0), p(0.0, 1.0, 0.0))],
            Vec::<Point3<f64>>::new(),
        );
        assert!(set.touches_edge(&p(0.0, 1.0, 0.0)));
        assert!(set.touches_edge(&p(-0.0, 0.0, 0.0)));
        assert!(!set.touches_edge(&p(0.0, 0.5, 0.0)));
    }

    #[test]
    fn replace_edges_keeps_pins() {
        let mut set = CreaseSet::from_parts(
            [Edge::new(p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0))],
            [p(0.0, 0.0, 0.0)],
        );
        set.replace_edges([
            Edge::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)),
            Edge::new(p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)),
        ]);

        assert_eq!(set.edge_count(), 2);
        assert!(!set.contains_edge(&Edge::new(p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0))));
        assert!(set.touches_edge(&p(1.0, 0.0, 0.0)));
        assert!(set.is_pinned(&p(0.0, 0.0, 0.0)));
    }
}
