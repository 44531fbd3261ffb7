//! Neon Shooter — a small arcade shooter.
//!
//! The simulation (`entities`, `compute`) is independent of the terminal;
//! everything it draws goes through the [`surface::Surface`] trait.

pub mod app;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod input;
pub mod surface;

pub use app::App;
pub use config::Config;
pub use error::{GameError, Result};
