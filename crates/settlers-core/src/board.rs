//! Game board representation: tiles, the board graph and what is built on it.
//!
//! This module contains:
//! - Tile types and the two supported layouts
//! - Building types (settlements, cities, roads)
//! - The occupancy index, which is the single source of truth for who owns
//!   what on the board
//! - The robber's location

use crate::config::BoardLayout;
use crate::error::{GameError, TopologyError};
use crate::hex::HexCoord;
use crate::resources::Resource;
use crate::topology::{EdgeId, HexId, IntersectionId, Topology, STANDARD_LAYOUT};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Player identifier (seat index, 0-3)
pub type PlayerId = u8;

/// Type of hex tile on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Produces a resource when its number is rolled
    Resource(Resource),
    /// Desert - no production, robber starts here
    Desert,
}

/// A single hex tile on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Position on the hex grid
    pub coord: HexCoord,
    /// What the tile produces
    pub kind: TileKind,
    /// Dice number that triggers production (2-12, None for the desert)
    pub number_token: Option<u8>,
}

impl Tile {
    /// Get the resource this tile produces, if any
    pub fn resource(&self) -> Option<Resource> {
        match self.kind {
            TileKind::Resource(r) => Some(r),
            TileKind::Desert => None,
        }
    }

    pub fn is_desert(&self) -> bool {
        matches!(self.kind, TileKind::Desert)
    }
}

/// Tiles of the fixed beginner board, in [`STANDARD_LAYOUT`] order
const STANDARD_TILES: [(TileKind, Option<u8>); 19] = [
    (TileKind::Desert, None),
    (TileKind::Resource(Resource::Wood), Some(8)),
    (TileKind::Resource(Resource::Wood), Some(4)),
    (TileKind::Resource(Resource::Wood), Some(11)),
    (TileKind::Resource(Resource::Wood), Some(3)),
    (TileKind::Resource(Resource::Brick), Some(6)),
    (TileKind::Resource(Resource::Brick), Some(5)),
    (TileKind::Resource(Resource::Brick), Some(9)),
    (TileKind::Resource(Resource::Sheep), Some(2)),
    (TileKind::Resource(Resource::Sheep), Some(10)),
    (TileKind::Resource(Resource::Sheep), Some(12)),
    (TileKind::Resource(Resource::Sheep), Some(9)),
    (TileKind::Resource(Resource::Wheat), Some(8)),
    (TileKind::Resource(Resource::Wheat), Some(10)),
    (TileKind::Resource(Resource::Wheat), Some(11)),
    (TileKind::Resource(Resource::Ore), Some(3)),
    (TileKind::Resource(Resource::Ore), Some(4)),
    (TileKind::Resource(Resource::Ore), Some(5)),
    (TileKind::Resource(Resource::Wheat), Some(6)),
];

/// A settlement: 1 VP, 1 card per production
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub owner: PlayerId,
    pub location: IntersectionId,
}

impl Settlement {
    pub const VICTORY_POINTS: u32 = 1;

    pub fn new(owner: PlayerId, location: IntersectionId) -> Self {
        Self { owner, location }
    }
}

/// A city: replaces a settlement, 2 VP, 2 cards per production
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub owner: PlayerId,
    pub location: IntersectionId,
}

impl City {
    pub const VICTORY_POINTS: u32 = 2;

    pub fn new(owner: PlayerId, location: IntersectionId) -> Self {
        Self { owner, location }
    }
}

/// A road on an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Road {
    pub owner: PlayerId,
    pub edge: EdgeId,
}

impl Road {
    pub fn new(owner: PlayerId, edge: EdgeId) -> Self {
        Self { owner, edge }
    }
}

/// What's built on an intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Building {
    Settlement(PlayerId),
    City(PlayerId),
}

impl Building {
    /// Get the owner of this building
    pub fn owner(&self) -> PlayerId {
        match self {
            Building::Settlement(p) | Building::City(p) => *p,
        }
    }

    /// Resource multiplier (how many cards per production)
    pub fn resource_multiplier(&self) -> u32 {
        match self {
            Building::Settlement(_) => 1,
            Building::City(_) => 2,
        }
    }
}

/// The complete game board
#[derive(Debug, Clone)]
pub struct Board {
    topology: Topology,
    /// Tiles indexed by `HexId`
    tiles: Vec<Tile>,
    settlements: HashMap<IntersectionId, Settlement>,
    cities: HashMap<IntersectionId, City>,
    roads: HashMap<EdgeId, Road>,
    robber: HexId,
}

impl Board {
    /// Create the fixed beginner board
    pub fn standard() -> Result<Self, GameError> {
        let tiles = STANDARD_LAYOUT
            .iter()
            .zip(STANDARD_TILES)
            .map(|(coord, (kind, number_token))| Tile {
                coord: *coord,
                kind,
                number_token,
            })
            .collect();
        Self::from_tiles(tiles)
    }

    /// Create a board for the given layout, drawing any randomness from `rng`
    pub fn with_layout<R: Rng>(layout: BoardLayout, rng: &mut R) -> Result<Self, GameError> {
        match layout {
            BoardLayout::Standard => Self::standard(),
            BoardLayout::Shuffled => Self::shuffled_with_rng(rng),
        }
    }

    /// Same cells and tile mix as the standard board, with resource kinds and
    /// number tokens shuffled. 6s and 8s are kept apart where possible.
    pub fn shuffled_with_rng<R: Rng>(rng: &mut R) -> Result<Self, GameError> {
        let mut kinds: Vec<TileKind> = STANDARD_TILES.iter().map(|(kind, _)| *kind).collect();
        kinds.shuffle(rng);

        let numbers: Vec<u8> = STANDARD_TILES.iter().filter_map(|(_, n)| *n).collect();
        let producing: Vec<HexCoord> = STANDARD_LAYOUT
            .iter()
            .zip(&kinds)
            .filter(|(_, kind)| !matches!(kind, TileKind::Desert))
            .map(|(coord, _)| *coord)
            .collect();
        let numbers = assign_numbers_avoiding_adjacent_68(&producing, &numbers, rng);

        let mut numbers = numbers.into_iter();
        let tiles = STANDARD_LAYOUT
            .iter()
            .zip(kinds)
            .map(|(coord, kind)| Tile {
                coord: *coord,
                kind,
                number_token: match kind {
                    TileKind::Desert => None,
                    TileKind::Resource(_) => numbers.next(),
                },
            })
            .collect();
        Self::from_tiles(tiles)
    }

    /// Build the board graph for the given tiles and put the robber on the desert
    pub fn from_tiles(tiles: Vec<Tile>) -> Result<Self, GameError> {
        let coords: Vec<HexCoord> = tiles.iter().map(|t| t.coord).collect();
        let topology = Topology::build(&coords)?;

        let deserts: Vec<usize> = tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_desert())
            .map(|(i, _)| i)
            .collect();
        let robber = match deserts.as_slice() {
            [only] => HexId(*only),
            other => return Err(TopologyError::DesertCount(other.len()).into()),
        };

        Ok(Self {
            topology,
            tiles,
            settlements: HashMap::new(),
            cities: HashMap::new(),
            roads: HashMap::new(),
            robber,
        })
    }

    // ==================== Query Methods ====================

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Get a tile by id
    pub fn tile(&self, hex: HexId) -> Option<&Tile> {
        self.tiles.get(hex.0)
    }

    /// Get the robber's current location
    pub fn robber_hex(&self) -> HexId {
        self.robber
    }

    pub fn contains_intersection(&self, at: IntersectionId) -> bool {
        at.0 < self.topology.intersection_count()
    }

    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        edge.0 < self.topology.edge_count()
    }

    pub fn contains_hex(&self, hex: HexId) -> bool {
        hex.0 < self.tiles.len()
    }

    /// True if a settlement or city stands on `at`
    pub fn is_intersection_occupied(&self, at: IntersectionId) -> bool {
        self.settlements.contains_key(&at) || self.cities.contains_key(&at)
    }

    pub fn is_edge_occupied(&self, edge: EdgeId) -> bool {
        self.roads.contains_key(&edge)
    }

    pub fn settlement_at(&self, at: IntersectionId) -> Option<&Settlement> {
        self.settlements.get(&at)
    }

    pub fn city_at(&self, at: IntersectionId) -> Option<&City> {
        self.cities.get(&at)
    }

    pub fn road_at(&self, edge: EdgeId) -> Option<&Road> {
        self.roads.get(&edge)
    }

    /// Get the building at an intersection, if any
    pub fn building_at(&self, at: IntersectionId) -> Option<Building> {
        if let Some(city) = self.cities.get(&at) {
            return Some(Building::City(city.owner));
        }
        self.settlements
            .get(&at)
            .map(|s| Building::Settlement(s.owner))
    }

    pub fn building_owner(&self, at: IntersectionId) -> Option<PlayerId> {
        self.building_at(at).map(|b| b.owner())
    }

    pub fn settlements(&self) -> impl Iterator<Item = &Settlement> {
        self.settlements.values()
    }

    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.cities.values()
    }

    pub fn roads(&self) -> impl Iterator<Item = &Road> {
        self.roads.values()
    }

    /// Distinct owners of buildings on the corners of a hex, in seat order
    pub fn owners_on_hex(&self, hex: HexId) -> Vec<PlayerId> {
        let owners: BTreeSet<PlayerId> = self
            .topology
            .hex_corners(hex)
            .iter()
            .filter_map(|corner| self.building_owner(*corner))
            .collect();
        owners.into_iter().collect()
    }

    // ==================== Mutation Methods ====================
    //
    // These only guard the occupancy index itself. Rule checks (distance,
    // connectivity, ownership) belong to the validator and run before.

    /// Record a settlement, failing if its intersection is taken
    pub fn place_settlement(&mut self, settlement: Settlement) -> Result<(), GameError> {
        if !self.contains_intersection(settlement.location) {
            return Err(GameError::UnknownIntersection(settlement.location));
        }
        if self.is_intersection_occupied(settlement.location) {
            return Err(GameError::IntersectionOccupied(settlement.location));
        }
        self.settlements.insert(settlement.location, settlement);
        Ok(())
    }

    /// Replace the settlement at the city's location with the city.
    ///
    /// Returns the settlement that was removed.
    pub fn upgrade_to_city(&mut self, city: City) -> Result<Settlement, GameError> {
        let settlement = self
            .settlements
            .remove(&city.location)
            .ok_or(GameError::NoSettlementToUpgrade(city.location))?;
        self.cities.insert(city.location, city);
        Ok(settlement)
    }

    /// Record a road, failing if its edge is taken
    pub fn place_road(&mut self, road: Road) -> Result<(), GameError> {
        if !self.contains_edge(road.edge) {
            return Err(GameError::UnknownEdge(road.edge));
        }
        if self.is_edge_occupied(road.edge) {
            return Err(GameError::EdgeOccupied(road.edge));
        }
        self.roads.insert(road.edge, road);
        Ok(())
    }

    /// Move the robber. The caller has already checked that `hex` differs
    /// from the current location.
    pub fn move_robber_to(&mut self, hex: HexId) {
        self.robber = hex;
    }
}

/// Shuffle number tokens until no 6 or 8 sits next to another 6 or 8, giving
/// up after a bounded number of attempts
fn assign_numbers_avoiding_adjacent_68<R: Rng>(
    coords: &[HexCoord],
    numbers: &[u8],
    rng: &mut R,
) -> Vec<u8> {
    const MAX_ATTEMPTS: usize = 100;

    let mut shuffled = numbers.to_vec();
    for _ in 0..MAX_ATTEMPTS {
        shuffled.shuffle(rng);
        if is_valid_number_placement(coords, &shuffled) {
            break;
        }
    }
    shuffled
}

fn is_valid_number_placement(coords: &[HexCoord], numbers: &[u8]) -> bool {
    let hot: Vec<HexCoord> = coords
        .iter()
        .zip(numbers)
        .filter(|(_, n)| **n == 6 || **n == 8)
        .map(|(c, _)| *c)
        .collect();

    hot.iter()
        .all(|a| hot.iter().all(|b| a == b || a.distance_to(b) > 1))
}
