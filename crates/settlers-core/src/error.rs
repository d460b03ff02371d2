//! Error types for the rules engine.
//!
//! Every rejected action surfaces as a [`GameError`]. Rejections never leave
//! partial state behind; the caller is expected to pick different input, using
//! the `valid_*` queries on [`crate::GameState`] where possible.

use crate::board::PlayerId;
use crate::hex::HexCoord;
use crate::resources::Resource;
use crate::topology::{EdgeId, HexId, IntersectionId};
use crate::turn::SetupStep;
use thiserror::Error;

/// Broad classes of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The board cannot be built; the game cannot start
    Configuration,
    /// Out-of-range ids or malformed input
    InvalidArgument,
    /// The game rules forbid the action
    RuleViolation,
    /// Wrong player, or wrong phase for the action
    TurnViolation,
}

/// Fatal layout/geometry failures raised while building the board graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("Expected {expected} hexes, got {found}")]
    HexCount { expected: usize, found: usize },

    #[error("Expected {expected} intersections, got {found}")]
    IntersectionCount { expected: usize, found: usize },

    #[error("Expected {expected} edges, got {found}")]
    EdgeCount { expected: usize, found: usize },

    #[error("Hex {0} appears twice in the layout")]
    DuplicateHex(HexCoord),

    #[error("Layout must contain exactly one desert, found {0}")]
    DesertCount(usize),
}

/// Errors that can occur when applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    // ==================== Invalid arguments ====================
    #[error("Number of players must be between 2 and 4, got {0}")]
    InvalidPlayerCount(usize),

    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("Intersection {0} does not exist")]
    UnknownIntersection(IntersectionId),

    #[error("Edge {0} does not exist")]
    UnknownEdge(EdgeId),

    #[error("Hex {0} does not exist")]
    UnknownHex(HexId),

    #[error("Roll must be 2-12 and not 7, got {0}")]
    InvalidRoll(u8),

    #[error("Must discard exactly {required} cards, got {submitted}")]
    InvalidDiscard { required: u32, submitted: u32 },

    #[error("Trade must move at least one card each way")]
    InvalidTrade,

    #[error("A player cannot target themselves")]
    SelfTarget,

    // ==================== Rule violations ====================
    #[error("Intersection {0} is already occupied")]
    IntersectionOccupied(IntersectionId),

    #[error("Edge {0} already has a road")]
    EdgeOccupied(EdgeId),

    #[error("Cannot place a settlement at intersection {0}")]
    InvalidSettlementPlacement(IntersectionId),

    #[error("Cannot place a road on edge {0}")]
    InvalidRoadPlacement(EdgeId),

    #[error("No settlement exists at intersection {0}")]
    NoSettlementToUpgrade(IntersectionId),

    #[error("Settlement at intersection {0} belongs to another player")]
    NotYourSettlement(IntersectionId),

    #[error("Not enough resources to build")]
    CannotAfford,

    #[error("Not enough {resource:?}: have {available}, need {requested}")]
    InsufficientResources {
        resource: Resource,
        available: u32,
        requested: u32,
    },

    #[error("No pieces of that kind remaining")]
    NoPiecesRemaining,

    #[error("No development cards left in deck")]
    EmptyDeck,

    #[error("Robber must be moved to a different hex than {0}")]
    RobberMustMove(HexId),

    #[error("Player {0} cannot be robbed from the robber's hex")]
    NotRobbable(PlayerId),

    // ==================== Turn / phase violations ====================
    #[error("Player {0} is not the current player")]
    NotYourTurn(PlayerId),

    #[error("{action} is only allowed during the {expected} phase")]
    InvalidPhase {
        action: &'static str,
        expected: &'static str,
    },

    #[error("Setup step is not {expected:?}")]
    WrongSetupStep { expected: SetupStep },
}

impl GameError {
    /// Which class of failure this is
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::Topology(_) => ErrorKind::Configuration,

            GameError::InvalidPlayerCount(_)
            | GameError::UnknownPlayer(_)
            | GameError::UnknownIntersection(_)
            | GameError::UnknownEdge(_)
            | GameError::UnknownHex(_)
            | GameError::InvalidRoll(_)
            | GameError::InvalidDiscard { .. }
            | GameError::InvalidTrade
            | GameError::SelfTarget => ErrorKind::InvalidArgument,

            GameError::IntersectionOccupied(_)
            | GameError::EdgeOccupied(_)
            | GameError::InvalidSettlementPlacement(_)
            | GameError::InvalidRoadPlacement(_)
            | GameError::NoSettlementToUpgrade(_)
            | GameError::NotYourSettlement(_)
            | GameError::CannotAfford
            | GameError::InsufficientResources { .. }
            | GameError::NoPiecesRemaining
            | GameError::EmptyDeck
            | GameError::RobberMustMove(_)
            | GameError::NotRobbable(_) => ErrorKind::RuleViolation,

            GameError::NotYourTurn(_)
            | GameError::InvalidPhase { .. }
            | GameError::WrongSetupStep { .. } => ErrorKind::TurnViolation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let fatal: GameError = TopologyError::EdgeCount {
            expected: 72,
            found: 71,
        }
        .into();
        assert_eq!(fatal.kind(), ErrorKind::Configuration);
        assert_eq!(GameError::InvalidRoll(7).kind(), ErrorKind::InvalidArgument);
        assert_eq!(GameError::CannotAfford.kind(), ErrorKind::RuleViolation);
        assert_eq!(GameError::NotYourTurn(1).kind(), ErrorKind::TurnViolation);
    }

    #[test]
    fn test_messages() {
        let err = GameError::InvalidDiscard {
            required: 4,
            submitted: 3,
        };
        assert_eq!(err.to_string(), "Must discard exactly 4 cards, got 3");

        let err = GameError::InvalidPhase {
            action: "end_turn",
            expected: "normal",
        };
        assert_eq!(err.to_string(), "end_turn is only allowed during the normal phase");
    }
}
