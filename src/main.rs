mod config;
mod domain;
mod engine;
mod render;
mod scene;
mod script;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use config::RenderConfig;
use engine::{RasterEngine, RecordingEngine};

/// Render an animated walkthrough of Noether's theorem as PNG frames
#[derive(Parser, Debug)]
#[clap(name = "noether", version, about)]
struct Args {
    /// JSON render config (defaults to the user config dir)
    #[clap(long, env = "NOETHER_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the rendered frames
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Seed for the particle burst
    #[clap(long)]
    seed: Option<u64>,

    /// Frames per time unit
    #[clap(long)]
    fps: Option<u32>,

    /// Frame width in pixels
    #[clap(long)]
    width: Option<u32>,

    /// Frame height in pixels
    #[clap(long)]
    height: Option<u32>,

    /// Record the narration without rendering and print the scene summaries
    #[clap(long)]
    dry_run: bool,
}

impl Args {
    fn apply(&self, config: &mut RenderConfig) {
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = RenderConfig::load(args.config.as_deref());
    args.apply(&mut config);

    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!("Particle seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    if args.dry_run {
        let mut engine = RecordingEngine::new();
        let summaries = script::construct(&mut engine, &mut rng)?;
        log::info!(
            "Recorded {} over {:.1} time units",
            engine.scene_titles().join(", "),
            engine.elapsed()
        );
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .or_else(RenderConfig::default_output_dir)
        .context("No video or home directory found, pass --output")?;
    let mut engine = RasterEngine::new(&config, &output)?;
    script::construct(&mut engine, &mut rng)?;
    let output = engine.finish()?;
    println!("{}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let args = Args::parse_from(["noether", "--fps", "12", "--seed", "9", "--dry-run"]);
        assert!(args.dry_run);
        let mut config = RenderConfig::default();
        args.apply(&mut config);
        assert_eq!(config.fps, 12);
        assert_eq!(config.width, 1280);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_seed_from_config_survives() {
        let args = Args::parse_from(["noether"]);
        let mut config = RenderConfig {
            seed: Some(5),
            ..RenderConfig::default()
        };
        args.apply(&mut config);
        assert_eq!(config.seed, Some(5));
    }
}
