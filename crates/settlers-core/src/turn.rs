//! Turn and phase tracking.
//!
//! Setup runs two rounds in serpentine order (0, 1, .., N-1, N-1, .., 1, 0),
//! each turn being one settlement followed by one road touching it. Normal
//! play then starts with player 0 and advances forward on [`TurnState::end_turn`].

use crate::board::PlayerId;
use crate::error::GameError;
use crate::topology::IntersectionId;
use serde::{Deserialize, Serialize};

/// What the current setup turn expects next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupStep {
    PlaceSettlement,
    PlaceRoad,
}

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Initial placement phase
    Setup {
        /// 0 going forward, 1 coming back
        round: u8,
        /// What we're currently placing
        step: SetupStep,
    },

    /// Regular turns: roll, build, trade, end turn
    Normal,
}

impl GamePhase {
    pub fn is_setup(&self) -> bool {
        matches!(self, GamePhase::Setup { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            GamePhase::Setup { .. } => "setup",
            GamePhase::Normal => "normal",
        }
    }
}

/// The turn state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    player_count: u8,
    current: PlayerId,
    phase: GamePhase,
    /// Settlement placed earlier in this setup turn; its road must touch it
    pending_anchor: Option<IntersectionId>,
    /// Normal-phase turn counter, starting at 1
    turn_number: u32,
}

impl TurnState {
    /// Start of setup with player 0. `player_count` is validated by the caller.
    pub fn new(player_count: u8) -> Self {
        Self {
            player_count,
            current: 0,
            phase: GamePhase::Setup {
                round: 0,
                step: SetupStep::PlaceSettlement,
            },
            pending_anchor: None,
            turn_number: 0,
        }
    }

    pub fn player_count(&self) -> u8 {
        self.player_count
    }

    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_setup(&self) -> bool {
        self.phase.is_setup()
    }

    pub fn setup_step(&self) -> Option<SetupStep> {
        match self.phase {
            GamePhase::Setup { step, .. } => Some(step),
            GamePhase::Normal => None,
        }
    }

    /// True during the second (backward) setup round
    pub fn is_second_setup_round(&self) -> bool {
        matches!(self.phase, GamePhase::Setup { round: 1, .. })
    }

    pub fn pending_anchor(&self) -> Option<IntersectionId> {
        self.pending_anchor
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    // ==================== Guards ====================

    /// Reject `player` unless it is their turn
    pub fn require_current(&self, player: PlayerId) -> Result<(), GameError> {
        if player != self.current {
            return Err(GameError::NotYourTurn(player));
        }
        Ok(())
    }

    /// Reject unless the game is in setup and expects `step`
    pub fn require_setup_step(
        &self,
        action: &'static str,
        step: SetupStep,
    ) -> Result<(), GameError> {
        match self.phase {
            GamePhase::Setup { step: current, .. } if current == step => Ok(()),
            GamePhase::Setup { .. } => Err(GameError::WrongSetupStep { expected: step }),
            GamePhase::Normal => Err(GameError::InvalidPhase {
                action,
                expected: "setup",
            }),
        }
    }

    /// Reject unless the game is in normal play
    pub fn require_normal(&self, action: &'static str) -> Result<(), GameError> {
        if self.phase != GamePhase::Normal {
            return Err(GameError::InvalidPhase {
                action,
                expected: "normal",
            });
        }
        Ok(())
    }

    // ==================== Transitions ====================

    /// A setup settlement went down at `at`; the same player now places a road
    pub fn settlement_placed(&mut self, at: IntersectionId) {
        if let GamePhase::Setup { round, .. } = self.phase {
            self.phase = GamePhase::Setup {
                round,
                step: SetupStep::PlaceRoad,
            };
            self.pending_anchor = Some(at);
        }
    }

    /// A setup road went down; hand the turn on in serpentine order
    pub fn road_placed(&mut self) {
        let GamePhase::Setup { round, .. } = self.phase else {
            return;
        };
        self.pending_anchor = None;

        let last = self.player_count - 1;
        match round {
            0 if self.current == last => {
                // Last player goes again to open the second round
                self.phase = GamePhase::Setup {
                    round: 1,
                    step: SetupStep::PlaceSettlement,
                };
            }
            0 => {
                self.current += 1;
                self.phase = GamePhase::Setup {
                    round: 0,
                    step: SetupStep::PlaceSettlement,
                };
            }
            _ if self.current == 0 => {
                self.phase = GamePhase::Normal;
                self.turn_number = 1;
            }
            _ => {
                self.current -= 1;
                self.phase = GamePhase::Setup {
                    round,
                    step: SetupStep::PlaceSettlement,
                };
            }
        }
    }

    /// Pass the turn to the next player. Normal phase only.
    pub fn end_turn(&mut self) -> Result<PlayerId, GameError> {
        self.require_normal("end_turn")?;
        self.current = (self.current + 1) % self.player_count;
        self.turn_number += 1;
        Ok(self.current)
    }

    /// Jump straight to normal play with player 0
    #[cfg(test)]
    pub(crate) fn force_normal(&mut self) {
        self.phase = GamePhase::Normal;
        self.current = 0;
        self.pending_anchor = None;
        self.turn_number = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Play one setup turn per iteration and record who took it
    fn setup_order(players: u8) -> Vec<PlayerId> {
        let mut turn = TurnState::new(players);
        let mut order = Vec::new();
        while turn.is_setup() {
            order.push(turn.current_player());
            turn.settlement_placed(IntersectionId(0));
            turn.road_placed();
        }
        order
    }

    #[test]
    fn test_serpentine_order_four_players() {
        assert_eq!(setup_order(4), vec![0, 1, 2, 3, 3, 2, 1, 0]);
    }

    #[test]
    fn test_serpentine_order_two_players() {
        assert_eq!(setup_order(2), vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_normal_starts_with_first_player() {
        let mut turn = TurnState::new(3);
        while turn.is_setup() {
            turn.settlement_placed(IntersectionId(0));
            turn.road_placed();
        }
        assert_eq!(turn.phase(), GamePhase::Normal);
        assert_eq!(turn.current_player(), 0);
        assert_eq!(turn.turn_number(), 1);
    }

    #[test]
    fn test_settlement_then_road_steps() {
        let mut turn = TurnState::new(2);
        assert_eq!(turn.setup_step(), Some(SetupStep::PlaceSettlement));
        assert!(turn
            .require_setup_step("place_setup_road", SetupStep::PlaceRoad)
            .is_err());

        turn.settlement_placed(IntersectionId(7));
        assert_eq!(turn.setup_step(), Some(SetupStep::PlaceRoad));
        assert_eq!(turn.pending_anchor(), Some(IntersectionId(7)));
        assert_eq!(
            turn.require_setup_step("place_setup_settlement", SetupStep::PlaceSettlement),
            Err(GameError::WrongSetupStep {
                expected: SetupStep::PlaceSettlement
            })
        );

        turn.road_placed();
        assert_eq!(turn.pending_anchor(), None);
        assert_eq!(turn.current_player(), 1);
    }

    #[test]
    fn test_second_round_flag() {
        let mut turn = TurnState::new(2);
        assert!(!turn.is_second_setup_round());
        turn.settlement_placed(IntersectionId(0));
        turn.road_placed();
        turn.settlement_placed(IntersectionId(1));
        turn.road_placed();
        assert!(turn.is_second_setup_round());
        assert_eq!(turn.current_player(), 1);
    }

    #[test]
    fn test_end_turn_only_in_normal() {
        let mut turn = TurnState::new(3);
        assert_eq!(
            turn.end_turn(),
            Err(GameError::InvalidPhase {
                action: "end_turn",
                expected: "normal"
            })
        );

        turn.force_normal();
        assert_eq!(turn.end_turn(), Ok(1));
        assert_eq!(turn.end_turn(), Ok(2));
        assert_eq!(turn.end_turn(), Ok(0));
        assert_eq!(turn.turn_number(), 4);
    }

    #[test]
    fn test_require_current() {
        let turn = TurnState::new(4);
        assert!(turn.require_current(0).is_ok());
        assert_eq!(turn.require_current(2), Err(GameError::NotYourTurn(2)));
    }
}
