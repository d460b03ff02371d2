//! Settlers - a rules engine for a hex-grid settlement-building board game
//!
//! This crate provides the core game logic, including:
//! - A board graph of 19 hexes, 54 intersections and 72 edges built from
//!   axial coordinates
//! - Placement rules (distance rule, road connectivity, setup relaxation)
//! - The serpentine setup order and the normal turn cycle
//! - Resource production with the bank-shortage rule
//! - Robber discards, relocation and theft
//!
//! # Modules
//!
//! - [`hex`]: Axial hex coordinates and the integer corner lattice
//! - [`topology`]: The board graph and its adjacency indexes
//! - [`resources`]: Resource kinds, hands, the bank and building costs
//! - [`board`]: Tiles, occupancy maps and the robber
//! - [`validator`]: Pure placement predicates
//! - [`turn`]: Setup and turn state machine
//! - [`distribution`]: Production on a dice roll
//! - [`robber`]: Discard, relocation and theft rules
//! - [`longest_road`]: Longest trail of roads and who holds the bonus
//! - [`player`]: Player assets and development cards
//! - [`config`]: Game setup options
//! - [`game`]: The `GameState` facade that ties everything together

pub mod board;
pub mod config;
pub mod distribution;
pub mod error;
pub mod game;
pub mod hex;
pub mod longest_road;
pub mod player;
pub mod resources;
pub mod robber;
pub mod topology;
pub mod turn;
pub mod validator;

// Re-export commonly used types
pub use board::{Board, Building, City, PlayerId, Road, Settlement, Tile, TileKind};
pub use config::{BoardLayout, GameConfig};
pub use distribution::{DistributionReport, Payout};
pub use error::{ErrorKind, GameError, TopologyError};
pub use game::{GameSnapshot, GameState, PlayerSnapshot, RollOutcome, VICTORY_POINTS_TO_WIN};
pub use hex::{HexCoord, HexDirection, Intersection};
pub use player::{DevelopmentCard, PieceKind, Player};
pub use resources::{costs, Bank, Resource, ResourceHand};
pub use topology::{Edge, EdgeId, HexId, IntersectionId, Topology};
pub use turn::{GamePhase, SetupStep, TurnState};
