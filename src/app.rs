//! Application object: owns the running game and its lifecycle.

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::compute::{self, GameState, GameStatus, TickReport};
use crate::config::Config;
use crate::error::Result;
use crate::input::KeySet;
use crate::surface::Surface;

pub struct App {
    config: Config,
    rng: StdRng,
    state: Option<GameState>,
    /// Best score across restarts within this process.
    high_score: u32,
}

impl App {
    /// Build an idle app; nothing runs until [`App::start`].
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(App {
            config,
            rng,
            state: None,
            high_score: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    pub fn is_started(&self) -> bool {
        self.state.is_some()
    }

    pub fn high_score(&self) -> u32 {
        self.state
            .as_ref()
            .map_or(self.high_score, |s| s.high_score.max(self.high_score))
    }

    /// Begin a fresh game, replacing any current one.
    pub fn start(&mut self) {
        self.high_score = self.high_score();
        let mut state = compute::init_state(self.config.width, self.config.height, self.high_score);
        state.spawn_interval = self.config.spawn_interval;
        info!(
            "starting game on {}x{} canvas",
            self.config.width, self.config.height
        );
        self.state = Some(state);
    }

    /// Restart the current game, or start one if none is running.
    pub fn restart(&mut self) {
        if self.is_started() {
            info!("restarting game");
        }
        self.start();
    }

    pub fn toggle_pause(&mut self) {
        if let Some(state) = self.state.as_mut() {
            compute::toggle_pause(state);
            info!("status now {:?}", state.status);
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.status == GameStatus::GameOver)
    }

    /// Run one tick with the given held keys.
    pub fn step(&mut self, keys: &KeySet) -> TickReport {
        match self.state.as_mut() {
            Some(state) => compute::tick(state, keys, &mut self.rng),
            None => TickReport::default(),
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        if let Some(state) = &self.state {
            compute::draw(state, surface);
        }
    }
}
