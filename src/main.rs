//! Falling sakura petals in a window.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sakura::{FilterMode, SakuraConfig};

#[derive(Debug, Parser)]
#[command(name = "sakura", version, about = "Falling sakura petals")]
struct Cli {
    /// RON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Petal sprite image (PNG or JPEG)
    #[arg(short, long, conflicts_with = "builtin_sprite")]
    sprite: Option<PathBuf>,

    /// Use the built-in procedural petal instead of an image file
    #[arg(long)]
    builtin_sprite: bool,

    /// Sample the sprite with nearest-neighbour filtering
    #[arg(long)]
    nearest: bool,

    /// Number of petals
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Random seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match &cli.config {
        Some(path) => SakuraConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SakuraConfig::default(),
    };

    if let Some(sprite) = cli.sprite {
        config = config.with_sprite(sprite);
    }
    if cli.builtin_sprite {
        config = config.with_builtin_sprite();
    }
    if cli.nearest {
        config = config.with_sprite_filter(FilterMode::Nearest);
    }
    if let Some(count) = cli.count {
        config = config.with_petal_count(count);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    config.validate().context("invalid configuration")?;

    log::info!(
        "Starting with {} petals, sprite {:?}",
        config.petal_count,
        config.sprite
    );
    sakura::run(config)?;
    Ok(())
}
