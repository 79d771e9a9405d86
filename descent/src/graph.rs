//! Undirected weighted edges between points, and spanning trees over them.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use descent_base::math::{FreeCoordinate, FreePoint};
use itertools::Itertools as _;

/// An undirected edge between two vertices, identified by their indices in some point
/// list, with a precomputed length.
///
/// Equality, ordering, and hashing consider only the endpoints, and `(u, v)` is the same
/// edge as `(v, u)`.
#[derive(Clone, Copy, Debug)]
pub struct Edge {
    /// Lower endpoint index.
    u: usize,
    /// Higher endpoint index.
    v: usize,
    length: FreeCoordinate,
}

impl Edge {
    /// Constructs an edge between `a` and `b`, in either order.
    pub fn new(a: usize, b: usize, length: FreeCoordinate) -> Self {
        Self {
            u: a.min(b),
            v: a.max(b),
            length,
        }
    }

    /// Constructs an edge between two of `points`, whose length is their Euclidean distance.
    pub fn between(points: &[FreePoint], a: usize, b: usize) -> Self {
        Self::new(a, b, (points[a] - points[b]).length())
    }

    /// The endpoint with the lower index.
    pub fn u(&self) -> usize {
        self.u
    }

    /// The endpoint with the higher index.
    pub fn v(&self) -> usize {
        self.v
    }

    /// Length of the edge.
    pub fn length(&self) -> FreeCoordinate {
        self.length
    }

    /// Returns whether `vertex` is one of the endpoints.
    pub fn touches(&self, vertex: usize) -> bool {
        self.u == vertex || self.v == vertex
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        (self.u, self.v) == (other.u, other.v)
    }
}
impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.u, self.v).hash(state);
    }
}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Edge {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.u, self.v).cmp(&(other.u, other.v))
    }
}

/// Computes a minimum spanning tree of `edges` with Prim's algorithm, growing from `start`.
///
/// Only the component containing `start` is spanned; a disconnected input yields a
/// partial tree rather than an error. Among equally short candidate edges, the first in
/// `edges`' order is chosen.
pub fn minimum_spanning_tree(edges: &BTreeSet<Edge>, start: usize) -> BTreeSet<Edge> {
    let mut closed = BTreeSet::from([start]);
    let mut tree = BTreeSet::new();

    while let Some(&next) = edges
        .iter()
        .filter(|e| closed.contains(&e.u) != closed.contains(&e.v))
        .min_by(|a, b| a.length.total_cmp(&b.length))
    {
        closed.insert(next.u);
        closed.insert(next.v);
        tree.insert(next);
    }

    tree
}

/// Returns the edges of the [Gabriel graph] of `points`: every pair whose diametral
/// sphere contains no other point.
///
/// This is a subgraph of the Delaunay graph that still contains every Euclidean minimum
/// spanning tree, and unlike a tetrahedralization it is well-defined for coplanar or
/// cospherical points.
///
/// [Gabriel graph]: https://en.wikipedia.org/wiki/Gabriel_graph
pub fn gabriel_graph(points: &[FreePoint]) -> BTreeSet<Edge> {
    (0..points.len())
        .tuple_combinations()
        .filter(|&(a, b)| {
            let middle = points[a].lerp(points[b], 0.5);
            let radius_squared = (points[a] - points[b]).square_length() / 4.0;
            points
                .iter()
                .enumerate()
                .all(|(i, p)| i == a || i == b || (*p - middle).square_length() >= radius_squared)
        })
        .map(|(a, b)| Edge::between(points, a, b))
        .collect()
}

/// Total length of a set of edges.
pub fn total_length<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> FreeCoordinate {
    edges.into_iter().map(Edge::length).sum()
}
