//! # Pixel Quest Main Entry Point
//!
//! Parses the command line, sets up logging and persistence, and runs the macroquad
//! frame loop.

use clap::Parser;
use log::{info, warn};
use macroquad::prelude::*;
use pixel_quest::{
    Difficulty, FileStore, GameConfig, GameSession, KeyValueStore, LogAudio, MemoryStore,
    PixelQuestError, PixelQuestResult, SceneManager,
};
use std::path::PathBuf;

/// Command line arguments for Pixel Quest.
#[derive(Parser, Debug)]
#[command(name = "pixel-quest")]
#[command(about = "A small tile-based arcade adventure with slimes, chests, and a boss")]
#[command(version)]
struct Args {
    /// Random seed for stage generation and AI
    #[arg(short, long)]
    seed: Option<u64>,

    /// Difficulty (easy, normal, hard); overrides the stored setting
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// JSON file with gameplay tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the settings and save files (in-memory when omitted)
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Ignore any existing save and start from stage one
    #[arg(long)]
    new_game: bool,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Pixel Quest".to_owned(),
        window_width: 640,
        window_height: 600,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() -> PixelQuestResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);
    info!("Starting Pixel Quest v{}", pixel_quest::VERSION);

    let config = load_config(args.config.as_deref())?;
    let store = open_store(args.save_dir.as_deref());
    let seed = args.seed.unwrap_or_else(::rand::random);

    let mut session = GameSession::open(
        seed,
        config,
        store,
        Box::new(LogAudio::default()),
        args.new_game,
    );
    if let Some(difficulty) = args.difficulty {
        session.set_difficulty(difficulty);
    }

    let mut scenes = SceneManager::new(session);
    scenes.run().await
}

/// Initializes `env_logger` at the requested level; `RUST_LOG` still takes precedence.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_target(false)
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> PixelQuestResult<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let json = std::fs::read_to_string(path)?;
    let config = GameConfig::from_json(&json)?;
    if config.max_health == 0 {
        return Err(PixelQuestError::InvalidState(
            "max_health must be at least 1".to_string(),
        ));
    }
    info!("Loaded config from {}", path.display());
    Ok(config)
}

fn open_store(dir: Option<&std::path::Path>) -> Box<dyn KeyValueStore> {
    match dir.map(FileStore::open) {
        Some(Ok(store)) => Box::new(store),
        Some(Err(err)) => {
            warn!("Save directory unavailable ({}), progress will not persist", err);
            Box::new(MemoryStore::new())
        }
        None => Box::new(MemoryStore::new()),
    }
}
