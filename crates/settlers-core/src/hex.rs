//! Hex coordinate system using axial coordinates (q, r).
//!
//! This module provides the foundational coordinate types for the board:
//! - `HexCoord`: identifies individual hex tiles
//! - `Intersection`: identifies a hex corner, where settlements and cities go
//!
//! Corners live on an integer lattice instead of floating-point positions. With
//! pointy-top hexes of unit radius, a hex centre sits at
//! `(√3·(q + r/2), 1.5·r)`. Scaling the x axis by `2/√3` and the y axis by `2`
//! turns every centre into `(2q + r, 3r)` and every corner offset into one of
//! six small integer vectors, so two hexes that share a corner compute the
//! exact same lattice point with no rounding involved.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lattice offsets of the six corners from a hex centre, in clockwise order
/// starting at the corner 30° above the east axis (angles `60°·c − 30°`).
pub const CORNER_OFFSETS: [(i32, i32); 6] = [(1, -1), (1, 1), (0, 2), (-1, 1), (-1, -1), (0, -2)];

/// Direction of a neighbouring hex (pointy-top orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexDirection {
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    /// All directions, counter-clockwise starting from East
    pub const ALL: [HexDirection; 6] = [
        HexDirection::East,
        HexDirection::NorthEast,
        HexDirection::NorthWest,
        HexDirection::West,
        HexDirection::SouthWest,
        HexDirection::SouthEast,
    ];
}

/// Axial coordinate for hex grid.
///
/// In axial coordinates:
/// - `q` increases going east (right)
/// - `r` increases going southeast
/// - The third coordinate `s` (not stored) satisfies: q + r + s = 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct HexCoord {
    /// Column (increases going east)
    pub q: i32,
    /// Row (increases going southeast)
    pub r: i32,
}

impl HexCoord {
    /// Create a new hex coordinate
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The implicit third coordinate (s = -q - r)
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Get the neighbor in a specific direction
    pub fn neighbor(&self, direction: HexDirection) -> HexCoord {
        match direction {
            HexDirection::East => HexCoord::new(self.q + 1, self.r),
            HexDirection::NorthEast => HexCoord::new(self.q + 1, self.r - 1),
            HexDirection::NorthWest => HexCoord::new(self.q, self.r - 1),
            HexDirection::West => HexCoord::new(self.q - 1, self.r),
            HexDirection::SouthWest => HexCoord::new(self.q - 1, self.r + 1),
            HexDirection::SouthEast => HexCoord::new(self.q, self.r + 1),
        }
    }

    /// The six neighboring hexes
    pub fn neighbors(&self) -> [HexCoord; 6] {
        HexDirection::ALL.map(|dir| self.neighbor(dir))
    }

    /// Distance to another hex (in hex steps)
    pub fn distance_to(&self, other: &HexCoord) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Centre of this hex on the corner lattice
    pub const fn lattice_center(&self) -> (i32, i32) {
        (2 * self.q + self.r, 3 * self.r)
    }

    /// The six corners of this hex, in the same order as [`CORNER_OFFSETS`]
    pub fn corners(&self) -> [Intersection; 6] {
        let (cx, cy) = self.lattice_center();
        CORNER_OFFSETS.map(|(dx, dy)| Intersection::new(cx + dx, cy + dy))
    }

    /// Convert to pixel coordinates (center of hex)
    /// Uses pointy-top orientation with the given hex size (radius)
    pub fn to_pixel(&self, hex_size: f64) -> (f64, f64) {
        let x = hex_size * 3.0_f64.sqrt() * (self.q as f64 + self.r as f64 / 2.0);
        let y = hex_size * 1.5 * self.r as f64;
        (x, y)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// A hex corner, identified by its integer lattice position.
///
/// Equality and hashing are defined by the `(x, y)` pair alone, so every hex
/// touching the same geometric corner resolves to an equal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Intersection {
    /// Horizontal lattice position, in units of `√3/2` hex radii
    pub x: i32,
    /// Vertical lattice position, in units of half a hex radius
    pub y: i32,
}

impl Intersection {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Convert to pixel coordinates for a hex of the given size (radius)
    pub fn to_pixel(&self, hex_size: f64) -> (f64, f64) {
        let x = self.x as f64 * hex_size * 3.0_f64.sqrt() / 2.0;
        let y = self.y as f64 * hex_size / 2.0;
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hex_neighbors() {
        let center = HexCoord::new(0, 0);
        let neighbors = center.neighbors();

        let unique: HashSet<_> = neighbors.iter().collect();
        assert_eq!(unique.len(), 6);

        for neighbor in &neighbors {
            assert_eq!(center.distance_to(neighbor), 1);
        }
    }

    #[test]
    fn test_hex_distance() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(2, -1);
        assert_eq!(a.distance_to(&b), 2);

        let c = HexCoord::new(-2, 2);
        assert_eq!(a.distance_to(&c), 2);
    }

    #[test]
    fn test_corners_are_distinct() {
        let corners = HexCoord::new(1, -2).corners();
        let unique: HashSet<_> = corners.iter().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn test_neighbors_share_two_corners() {
        let hex = HexCoord::new(0, 0);
        let own: HashSet<_> = hex.corners().into_iter().collect();

        for neighbor in hex.neighbors() {
            let shared = neighbor
                .corners()
                .into_iter()
                .filter(|c| own.contains(c))
                .count();
            assert_eq!(shared, 2, "neighbor {neighbor} should share one side");
        }
    }

    #[test]
    fn test_lattice_corners_match_trigonometric_positions() {
        // Boundary hexes of the 3-4-5-4-3 layout plus the centre
        let hexes = [
            HexCoord::new(0, -2),
            HexCoord::new(2, -2),
            HexCoord::new(-2, 0),
            HexCoord::new(0, 0),
            HexCoord::new(2, 0),
            HexCoord::new(-2, 2),
            HexCoord::new(0, 2),
        ];

        for hex in hexes {
            let (cx, cy) = hex.to_pixel(1.0);
            for (c, corner) in hex.corners().iter().enumerate() {
                let angle = (60.0 * c as f64 - 30.0).to_radians();
                let (px, py) = (cx + angle.cos(), cy + angle.sin());
                let (lx, ly) = corner.to_pixel(1.0);
                assert!((px - lx).abs() < 1e-9, "x mismatch for {hex} corner {c}");
                assert!((py - ly).abs() < 1e-9, "y mismatch for {hex} corner {c}");
            }
        }
    }

    #[test]
    fn test_intersection_equality_is_positional() {
        let east = HexCoord::new(0, 0).corners()[1];
        let from_neighbor = HexCoord::new(1, 0).corners()[3];
        assert_eq!(east, from_neighbor);
    }
}
