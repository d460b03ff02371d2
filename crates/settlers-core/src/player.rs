//! Player state.
//!
//! This module contains:
//! - Player struct with resources, owned pieces and a running VP counter
//! - Piece limits
//! - Development card types and deck construction
//!
//! The board's occupancy maps are the source of truth for what stands where.
//! A player's asset lists mirror them by id and are only updated by
//! [`crate::GameState`] after the board accepted a placement.

use crate::board::{City, PlayerId, Settlement};
use crate::error::GameError;
use crate::longest_road::LONGEST_ROAD_POINTS;
use crate::resources::ResourceHand;
use crate::topology::{EdgeId, IntersectionId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Pieces each player starts with
pub const MAX_SETTLEMENTS: u32 = 5;
pub const MAX_CITIES: u32 = 4;
pub const MAX_ROADS: u32 = 15;

/// Development card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DevelopmentCard {
    Knight,
    /// Worth 1 VP as soon as it is drawn
    VictoryPoint,
    RoadBuilding,
    YearOfPlenty,
    Monopoly,
}

impl DevelopmentCard {
    /// Create the standard development card deck (25 cards)
    pub fn standard_deck() -> Vec<DevelopmentCard> {
        let mut deck = Vec::with_capacity(25);
        deck.extend(std::iter::repeat(DevelopmentCard::Knight).take(14));
        deck.extend(std::iter::repeat(DevelopmentCard::VictoryPoint).take(5));
        deck.extend(std::iter::repeat(DevelopmentCard::RoadBuilding).take(2));
        deck.extend(std::iter::repeat(DevelopmentCard::YearOfPlenty).take(2));
        deck.extend(std::iter::repeat(DevelopmentCard::Monopoly).take(2));
        deck
    }

    /// The standard deck in random order
    pub fn shuffled_deck<R: Rng>(rng: &mut R) -> Vec<DevelopmentCard> {
        let mut deck = Self::standard_deck();
        deck.shuffle(rng);
        deck
    }

    pub fn victory_points(&self) -> u32 {
        match self {
            DevelopmentCard::VictoryPoint => 1,
            _ => 0,
        }
    }
}

/// Kinds of board piece a player has a limited supply of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceKind {
    Road,
    Settlement,
    City,
}

/// A single player's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat index (0-3)
    pub id: PlayerId,
    pub name: String,
    /// Current resources
    pub resources: ResourceHand,
    /// Intersections holding this player's settlements, in build order
    pub settlements: Vec<IntersectionId>,
    /// Intersections holding this player's cities, in build order
    pub cities: Vec<IntersectionId>,
    /// Edges holding this player's roads, in build order
    pub roads: Vec<EdgeId>,
    /// Development cards bought (never played)
    pub dev_cards: Vec<DevelopmentCard>,
    /// Points from settlements and cities, kept as a running counter
    pub structure_points: u32,
    /// Whether this player has the Longest Road card
    pub has_longest_road: bool,
    pub settlements_remaining: u32,
    pub cities_remaining: u32,
    pub roads_remaining: u32,
}

impl Player {
    /// Create a new player
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            resources: ResourceHand::new(),
            settlements: Vec::new(),
            cities: Vec::new(),
            roads: Vec::new(),
            dev_cards: Vec::new(),
            structure_points: 0,
            has_longest_road: false,
            settlements_remaining: MAX_SETTLEMENTS,
            cities_remaining: MAX_CITIES,
            roads_remaining: MAX_ROADS,
        }
    }

    /// Total victory points: buildings, VP cards and the longest-road bonus
    pub fn victory_points(&self) -> u32 {
        let mut vp = self.structure_points + self.hidden_vp();
        if self.has_longest_road {
            vp += LONGEST_ROAD_POINTS;
        }
        vp
    }

    /// VP from development cards (opponents can't see these)
    pub fn hidden_vp(&self) -> u32 {
        self.dev_cards.iter().map(|c| c.victory_points()).sum()
    }

    pub fn pieces_remaining(&self, kind: PieceKind) -> u32 {
        match kind {
            PieceKind::Road => self.roads_remaining,
            PieceKind::Settlement => self.settlements_remaining,
            PieceKind::City => self.cities_remaining,
        }
    }

    /// Reject if no piece of `kind` is left
    pub fn require_piece(&self, kind: PieceKind) -> Result<(), GameError> {
        if self.pieces_remaining(kind) == 0 {
            return Err(GameError::NoPiecesRemaining);
        }
        Ok(())
    }

    /// Record a settlement the board has accepted
    pub fn add_settlement(&mut self, settlement: &Settlement) {
        self.settlements.push(settlement.location);
        self.settlements_remaining = self.settlements_remaining.saturating_sub(1);
        self.structure_points += Settlement::VICTORY_POINTS;
    }

    /// Record a city upgrade the board has accepted; the settlement piece
    /// comes back to the supply
    pub fn add_city(&mut self, city: &City) {
        self.settlements.retain(|at| *at != city.location);
        self.cities.push(city.location);
        self.settlements_remaining += 1;
        self.cities_remaining = self.cities_remaining.saturating_sub(1);
        self.structure_points += City::VICTORY_POINTS - Settlement::VICTORY_POINTS;
    }

    /// Record a road the board has accepted
    pub fn add_road(&mut self, edge: EdgeId) {
        self.roads.push(edge);
        self.roads_remaining = self.roads_remaining.saturating_sub(1);
    }

    pub fn add_dev_card(&mut self, card: DevelopmentCard) {
        self.dev_cards.push(card);
    }
}
