//! Headless self-play driver for the settlers rules engine.
//!
//! Plays one game with random legal moves for every seat and logs each
//! action. The final game snapshot is printed to stdout as JSON.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod driver;
mod settings;

use driver::RandomStrategy;
use settings::Settings;
use settlers_core::GameState;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::from_env()?;
    info!(
        players = settings.game.player_count(),
        max_turns = settings.max_turns,
        "Starting settlers simulation..."
    );

    let mut game = GameState::from_config(&settings.game)?;
    let mut strategy = match settings.game.seed {
        Some(seed) => RandomStrategy::with_seed(seed.wrapping_add(1)),
        None => RandomStrategy::new(),
    };

    let summary = driver::play(&mut game, &mut strategy, settings.max_turns)?;
    match summary.winner {
        Some(winner) => info!(winner, turns = summary.turns, "game won"),
        None => info!(turns = summary.turns, "turn limit reached without a winner"),
    }
    for (player, points) in summary.points.iter().enumerate() {
        info!(player, points, "final score");
    }

    println!("{}", game.snapshot().to_json()?);
    Ok(())
}
