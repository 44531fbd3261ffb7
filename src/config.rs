//! Command line configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::compute::DEFAULT_SPAWN_INTERVAL;
use crate::error::{GameError, Result};

/// Smallest canvas the player margin and spawner still make sense on.
pub const MIN_CANVAS: f32 = 100.0;
pub const MAX_FPS: u32 = 240;

#[derive(Parser, Debug, Clone)]
#[command(name = "neon_shooter", about = "A neon arcade shooter for the terminal")]
pub struct Config {
    /// Logical canvas width in game units
    #[arg(long, default_value_t = 800.0)]
    pub width: f32,

    /// Logical canvas height in game units
    #[arg(long, default_value_t = 600.0)]
    pub height: f32,

    /// Simulation ticks per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Seed for a reproducible game (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Ticks between monster spawns
    #[arg(long, default_value_t = DEFAULT_SPAWN_INTERVAL)]
    pub spawn_interval: u64,

    /// Write logs to this file (RUST_LOG controls the level)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 800.0,
            height: 600.0,
            fps: 60,
            seed: None,
            spawn_interval: DEFAULT_SPAWN_INTERVAL,
            log_file: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let finite = self.width.is_finite() && self.height.is_finite();
        if !(finite && self.width >= MIN_CANVAS && self.height >= MIN_CANVAS) {
            return Err(GameError::InvalidConfig(format!(
                "canvas must be at least {MIN_CANVAS}x{MIN_CANVAS}, got {}x{}",
                self.width, self.height
            )));
        }
        if !(1..=MAX_FPS).contains(&self.fps) {
            return Err(GameError::InvalidConfig(format!(
                "fps must be between 1 and {MAX_FPS}, got {}",
                self.fps
            )));
        }
        if self.spawn_interval == 0 {
            return Err(GameError::InvalidConfig(
                "spawn interval must be at least 1 tick".to_string(),
            ));
        }
        Ok(())
    }

    /// Wall-clock budget of one tick.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}
