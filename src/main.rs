use std::path::PathBuf;

use anyhow::Context;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use dungeon_raycaster::config::GameConfig;
use dungeon_raycaster::{app, generator};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Optional JSON config as the only argument
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => GameConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };

    let mut rng = match config.seed {
        Some(seed) => {
            tracing::info!(seed, "using fixed level seed");
            Pcg64::seed_from_u64(seed)
        }
        None => Pcg64::from_entropy(),
    };
    let level = generator::generate(&config.generation, &mut rng)?;
    let (x, y) = level.spawn_point();
    tracing::info!(x, y, connected = level.is_connected(), "player spawned");

    app::run(config, level)
}
