//! Simulation settings, read from the environment.
//!
//! `SETTLERS_CONFIG` points at a JSON [`GameConfig`]. Without it, the game is
//! built from `SETTLERS_PLAYERS` (default 4) and `SETTLERS_SEED`.
//! `SETTLERS_MAX_TURNS` caps the game length either way.

use anyhow::Context;
use settlers_core::GameConfig;
use std::path::Path;

const DEFAULT_PLAYERS: usize = 4;
const DEFAULT_MAX_TURNS: u32 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub game: GameConfig,
    pub max_turns: u32,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup, so tests don't touch the process
    /// environment
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let game = match lookup("SETTLERS_CONFIG") {
            Some(path) => load_config(Path::new(&path))?,
            None => {
                let players = parse_or(&lookup, "SETTLERS_PLAYERS", DEFAULT_PLAYERS)?;
                let config = GameConfig::with_players(players);
                match lookup("SETTLERS_SEED") {
                    Some(seed) => config.seeded(
                        seed.parse()
                            .with_context(|| format!("SETTLERS_SEED is not a number: {seed}"))?,
                    ),
                    None => config,
                }
            }
        };
        game.validate()?;

        let max_turns = parse_or(&lookup, "SETTLERS_MAX_TURNS", DEFAULT_MAX_TURNS)?;
        Ok(Self { game, max_turns })
    }
}

fn load_config(path: &Path) -> anyhow::Result<GameConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.game.player_count(), 4);
        assert_eq!(settings.game.seed, None);
        assert_eq!(settings.max_turns, 500);
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("SETTLERS_PLAYERS", "3"),
            ("SETTLERS_SEED", "42"),
            ("SETTLERS_MAX_TURNS", "50"),
        ]))
        .unwrap();
        assert_eq!(settings.game.player_count(), 3);
        assert_eq!(settings.game.seed, Some(42));
        assert_eq!(settings.max_turns, 50);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Settings::from_lookup(lookup(&[("SETTLERS_PLAYERS", "6")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("SETTLERS_SEED", "abc")])).is_err());
        assert!(
            Settings::from_lookup(lookup(&[("SETTLERS_CONFIG", "/no/such/file.json")])).is_err()
        );
    }
}
