//! Board graph construction.
//!
//! Turns a list of hex cells into the shared graph that settlements and roads
//! are placed on: intersections (hex corners) and edges (hex sides). Corners
//! and sides shared by neighbouring hexes are discovered once and reused, so
//! adjacent hexes reference the same `IntersectionId`s and `EdgeId`.

use crate::error::TopologyError;
use crate::hex::{HexCoord, Intersection};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Number of hexes on the classic board
pub const HEX_COUNT: usize = 19;
/// Number of intersections on the classic board
pub const INTERSECTION_COUNT: usize = 54;
/// Number of edges on the classic board
pub const EDGE_COUNT: usize = 72;

/// The classic 3-4-5-4-3 layout, row by row from the top
pub const STANDARD_LAYOUT: [HexCoord; HEX_COUNT] = [
    HexCoord::new(0, -2),
    HexCoord::new(1, -2),
    HexCoord::new(2, -2),
    HexCoord::new(-1, -1),
    HexCoord::new(0, -1),
    HexCoord::new(1, -1),
    HexCoord::new(2, -1),
    HexCoord::new(-2, 0),
    HexCoord::new(-1, 0),
    HexCoord::new(0, 0),
    HexCoord::new(1, 0),
    HexCoord::new(2, 0),
    HexCoord::new(-2, 1),
    HexCoord::new(-1, 1),
    HexCoord::new(0, 1),
    HexCoord::new(1, 1),
    HexCoord::new(-2, 2),
    HexCoord::new(-1, 2),
    HexCoord::new(0, 2),
];

macro_rules! index_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub usize);

        impl $name {
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_id!(
    /// Index of a hex in layout order
    HexId
);
index_id!(
    /// Index of an intersection in discovery order
    IntersectionId
);
index_id!(
    /// Index of an edge in discovery order
    EdgeId
);

/// An unordered pair of intersections (a road slot).
///
/// The endpoints are stored sorted, so `Edge::new(a, b) == Edge::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    a: IntersectionId,
    b: IntersectionId,
}

impl Edge {
    pub fn new(x: IntersectionId, y: IntersectionId) -> Self {
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    /// Both endpoints, lower id first
    pub fn endpoints(&self) -> [IntersectionId; 2] {
        [self.a, self.b]
    }

    /// Whether `at` is one of the endpoints
    pub fn touches(&self, at: IntersectionId) -> bool {
        self.a == at || self.b == at
    }

    /// The endpoint opposite `at`, if `at` is an endpoint
    pub fn other(&self, at: IntersectionId) -> Option<IntersectionId> {
        if self.a == at {
            Some(self.b)
        } else if self.b == at {
            Some(self.a)
        } else {
            None
        }
    }
}

/// The immutable board graph plus its adjacency indexes
#[derive(Debug, Clone)]
pub struct Topology {
    hexes: Vec<HexCoord>,
    intersections: Vec<Intersection>,
    edges: Vec<Edge>,
    intersection_lookup: HashMap<Intersection, IntersectionId>,
    edge_lookup: HashMap<Edge, EdgeId>,
    /// Hex -> its 6 corners, clockwise
    hex_corners: Vec<[IntersectionId; 6]>,
    /// Hex -> its 6 sides, clockwise
    hex_edges: Vec<[EdgeId; 6]>,
    /// Intersection -> hexes it is a corner of
    hexes_at: Vec<Vec<HexId>>,
    /// Intersection -> incident edges
    edges_at: Vec<Vec<EdgeId>>,
    /// Intersection -> intersections one edge away
    neighbors: Vec<Vec<IntersectionId>>,
}

impl Topology {
    /// Build the classic 19-hex board graph
    pub fn standard() -> Result<Self, TopologyError> {
        Self::build(&STANDARD_LAYOUT)
    }

    /// Build the graph for a layout, checking the classic-board invariants.
    ///
    /// Any count other than 19 hexes / 54 intersections / 72 edges means the
    /// layout or the geometry is wrong and the game cannot start.
    pub fn build(layout: &[HexCoord]) -> Result<Self, TopologyError> {
        if layout.len() != HEX_COUNT {
            return Err(TopologyError::HexCount {
                expected: HEX_COUNT,
                found: layout.len(),
            });
        }
        let mut seen = HashSet::new();
        for coord in layout {
            if !seen.insert(*coord) {
                return Err(TopologyError::DuplicateHex(*coord));
            }
        }

        let mut topology = Self {
            hexes: layout.to_vec(),
            intersections: Vec::new(),
            edges: Vec::new(),
            intersection_lookup: HashMap::new(),
            edge_lookup: HashMap::new(),
            hex_corners: Vec::with_capacity(layout.len()),
            hex_edges: Vec::with_capacity(layout.len()),
            hexes_at: Vec::new(),
            edges_at: Vec::new(),
            neighbors: Vec::new(),
        };

        for (index, coord) in layout.iter().enumerate() {
            let hex = HexId(index);
            let corners = coord.corners().map(|corner| topology.intern_corner(corner));
            for corner in corners {
                topology.hexes_at[corner.0].push(hex);
            }

            let sides: [EdgeId; 6] =
                std::array::from_fn(|c| topology.intern_edge(corners[c], corners[(c + 1) % 6]));

            topology.hex_corners.push(corners);
            topology.hex_edges.push(sides);
        }

        if topology.intersections.len() != INTERSECTION_COUNT {
            return Err(TopologyError::IntersectionCount {
                expected: INTERSECTION_COUNT,
                found: topology.intersections.len(),
            });
        }
        if topology.edges.len() != EDGE_COUNT {
            return Err(TopologyError::EdgeCount {
                expected: EDGE_COUNT,
                found: topology.edges.len(),
            });
        }

        Ok(topology)
    }

    fn intern_corner(&mut self, corner: Intersection) -> IntersectionId {
        if let Some(id) = self.intersection_lookup.get(&corner) {
            return *id;
        }
        let id = IntersectionId(self.intersections.len());
        self.intersections.push(corner);
        self.intersection_lookup.insert(corner, id);
        self.hexes_at.push(Vec::new());
        self.edges_at.push(Vec::new());
        self.neighbors.push(Vec::new());
        id
    }

    fn intern_edge(&mut self, a: IntersectionId, b: IntersectionId) -> EdgeId {
        let edge = Edge::new(a, b);
        if let Some(id) = self.edge_lookup.get(&edge) {
            return *id;
        }
        let id = EdgeId(self.edges.len());
        self.edges.push(edge);
        self.edge_lookup.insert(edge, id);

        self.edges_at[a.0].push(id);
        self.edges_at[b.0].push(id);
        self.neighbors[a.0].push(b);
        self.neighbors[b.0].push(a);
        id
    }

    // ==================== Queries ====================

    pub fn hex_count(&self) -> usize {
        self.hexes.len()
    }

    pub fn intersection_count(&self) -> usize {
        self.intersections.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn hex_ids(&self) -> impl Iterator<Item = HexId> {
        (0..self.hexes.len()).map(HexId)
    }

    pub fn intersection_ids(&self) -> impl Iterator<Item = IntersectionId> {
        (0..self.intersections.len()).map(IntersectionId)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> {
        (0..self.edges.len()).map(EdgeId)
    }

    pub fn hex_coord(&self, hex: HexId) -> Option<HexCoord> {
        self.hexes.get(hex.0).copied()
    }

    pub fn intersection(&self, id: IntersectionId) -> Option<Intersection> {
        self.intersections.get(id.0).copied()
    }

    pub fn edge(&self, id: EdgeId) -> Option<Edge> {
        self.edges.get(id.0).copied()
    }

    /// Look up the id of a lattice corner
    pub fn intersection_id(&self, corner: &Intersection) -> Option<IntersectionId> {
        self.intersection_lookup.get(corner).copied()
    }

    /// Look up the edge joining two intersections, in either order
    pub fn edge_between(&self, a: IntersectionId, b: IntersectionId) -> Option<EdgeId> {
        self.edge_lookup.get(&Edge::new(a, b)).copied()
    }

    /// The 6 corners of a hex (empty for an unknown hex)
    pub fn hex_corners(&self, hex: HexId) -> &[IntersectionId] {
        self.hex_corners.get(hex.0).map(|c| c.as_slice()).unwrap_or(&[])
    }

    /// The 6 sides of a hex (empty for an unknown hex)
    pub fn hex_edges(&self, hex: HexId) -> &[EdgeId] {
        self.hex_edges.get(hex.0).map(|e| e.as_slice()).unwrap_or(&[])
    }

    /// Hexes that have `at` as a corner (1 to 3 of them)
    pub fn hexes_at(&self, at: IntersectionId) -> &[HexId] {
        self.hexes_at.get(at.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges incident to `at`
    pub fn edges_at(&self, at: IntersectionId) -> &[EdgeId] {
        self.edges_at.get(at.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Intersections exactly one edge away from `at`
    pub fn neighbors(&self, at: IntersectionId) -> &[IntersectionId] {
        self.neighbors.get(at.0).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_counts() {
        let topology = Topology::standard().unwrap();
        assert_eq!(topology.hex_count(), 19);
        assert_eq!(topology.intersection_count(), 54);
        assert_eq!(topology.edge_count(), 72);
    }

    #[test]
    fn test_every_intersection_touches_one_to_three_hexes() {
        let topology = Topology::standard().unwrap();
        for id in topology.intersection_ids() {
            let n = topology.hexes_at(id).len();
            assert!((1..=3).contains(&n), "intersection {id} touches {n} hexes");
        }
        // 6 corners per hex, each counted once per touching hex
        let incidences: usize = topology
            .intersection_ids()
            .map(|id| topology.hexes_at(id).len())
            .sum();
        assert_eq!(incidences, 19 * 6);
    }

    #[test]
    fn test_degree_is_two_or_three() {
        let topology = Topology::standard().unwrap();
        for id in topology.intersection_ids() {
            let degree = topology.edges_at(id).len();
            assert!(degree == 2 || degree == 3);
            assert_eq!(topology.neighbors(id).len(), degree);
        }
    }

    #[test]
    fn test_adjacent_hexes_share_two_intersections_and_one_edge() {
        let topology = Topology::standard().unwrap();
        for a in topology.hex_ids() {
            for b in topology.hex_ids() {
                if a >= b {
                    continue;
                }
                let ca = topology.hex_coord(a).unwrap();
                let cb = topology.hex_coord(b).unwrap();

                let shared_corners = topology
                    .hex_corners(a)
                    .iter()
                    .filter(|c| topology.hex_corners(b).contains(*c))
                    .count();
                let shared_edges = topology
                    .hex_edges(a)
                    .iter()
                    .filter(|e| topology.hex_edges(b).contains(*e))
                    .count();

                if ca.distance_to(&cb) == 1 {
                    assert_eq!((shared_corners, shared_edges), (2, 1), "{ca} / {cb}");
                } else {
                    assert_eq!(shared_edges, 0, "{ca} / {cb}");
                    assert!(shared_corners <= 1);
                }
            }
        }
    }

    #[test]
    fn test_edge_is_direction_independent() {
        let a = IntersectionId(3);
        let b = IntersectionId(9);
        assert_eq!(Edge::new(a, b), Edge::new(b, a));
        assert_eq!(Edge::new(a, b).other(a), Some(b));
        assert_eq!(Edge::new(a, b).other(IntersectionId(4)), None);

        let topology = Topology::standard().unwrap();
        let edge = topology.edge(EdgeId(0)).unwrap();
        let [x, y] = edge.endpoints();
        assert_eq!(topology.edge_between(x, y), Some(EdgeId(0)));
        assert_eq!(topology.edge_between(y, x), Some(EdgeId(0)));
    }

    #[test]
    fn test_boundary_corner_identity() {
        // Corner shared by the three hexes (0,-1), (1,-1) and (0,0)
        let topology = Topology::standard().unwrap();
        let corner = HexCoord::new(0, 0).corners()[5];
        let id = topology.intersection_id(&corner).unwrap();
        assert_eq!(topology.hexes_at(id).len(), 3);

        // Outermost corner at the top of the board belongs to one hex only
        let top = HexCoord::new(0, -2).corners()[5];
        let id = topology.intersection_id(&top).unwrap();
        assert_eq!(topology.hexes_at(id), &[HexId(0)]);
    }

    #[test]
    fn test_wrong_hex_count_is_fatal() {
        let err = Topology::build(&STANDARD_LAYOUT[..18]).unwrap_err();
        assert_eq!(
            err,
            TopologyError::HexCount {
                expected: 19,
                found: 18
            }
        );
    }

    #[test]
    fn test_duplicate_hex_is_fatal() {
        let mut layout = STANDARD_LAYOUT;
        layout[18] = layout[0];
        assert_eq!(
            Topology::build(&layout).unwrap_err(),
            TopologyError::DuplicateHex(HexCoord::new(0, -2))
        );
    }

    #[test]
    fn test_disjoint_layout_fails_intersection_count() {
        // 19 hexes in a straight line: right count, wrong shape
        let layout: Vec<HexCoord> = (0..19).map(|q| HexCoord::new(q, 0)).collect();
        let err = Topology::build(&layout).unwrap_err();
        assert!(matches!(err, TopologyError::IntersectionCount { expected: 54, .. }));
    }
}
