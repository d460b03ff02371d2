//! Game configuration.

use crate::error::GameError;
use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// How tiles are laid out on the 19 cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardLayout {
    /// The fixed beginner board
    #[default]
    Standard,
    /// Resource kinds and number tokens shuffled with the game's RNG
    Shuffled,
}

/// Parameters for a new game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// One name per seat, in turn order
    pub player_names: Vec<String>,
    /// RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
    pub layout: BoardLayout,
}

impl GameConfig {
    /// `count` players named "Player 1", "Player 2", ...
    pub fn with_players(count: usize) -> Self {
        Self {
            player_names: (1..=count).map(|i| format!("Player {i}")).collect(),
            seed: None,
            layout: BoardLayout::Standard,
        }
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_layout(mut self, layout: BoardLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn player_count(&self) -> usize {
        self.player_names.len()
    }

    /// Reject player counts outside 2-4
    pub fn validate(&self) -> Result<(), GameError> {
        let count = self.player_count();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(GameError::InvalidPlayerCount(count));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::with_players(MAX_PLAYERS)
    }
}
