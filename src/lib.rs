#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Miner
//!
//! A first-person voxel mining game. The player walks a bounded grid, breaks stacked
//! blocks over time to collect wood, stone and iron, and places collected blocks back
//! into the grid.
//!
//! ## Key Modules
//!
//! * `application_state` - Window, event loop and input plumbing
//! * `config` - Game tunables loaded from an optional JSON file
//! * `engine_state` - Camera, gameplay session and presentation
//!
//! ## Architecture
//!
//! The gameplay core lives in [`engine_state::voxels`], [`engine_state::interaction`],
//! [`engine_state::inventory`] and [`engine_state::session`]. None of it depends on a
//! window, so it can be driven headless:
//!
//! ```
//! use voxel_miner::{config::GameConfig, engine_state::session::GameSession};
//!
//! let config = GameConfig { seed: Some(1), ..GameConfig::default() };
//! let session = GameSession::new(&config);
//! assert!(session.world().len() <= config.initial_block_count);
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     if let Err(err) = voxel_miner::run() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```

use application_state::ApplicationState;
use log::info;
use thiserror::Error;
use winit::{error::EventLoopError, event_loop::EventLoop};

use config::{ConfigError, GameConfig};

mod application_state;
pub mod config;
pub mod engine_state;

/// Errors that end [`run`].
#[derive(Error, Debug)]
pub enum RunError {
    /// The config file could not be used.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The event loop failed to start or crashed.
    #[error("event loop error: {0}")]
    EventLoop(#[from] EventLoopError),
}

/// Initializes logging, loads the config and runs the game until the window closes.
pub fn run() -> Result<(), RunError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let config = GameConfig::load()?;

    let event_loop = EventLoop::new()?;
    let mut state = ApplicationState::new(config);
    event_loop.run_app(&mut state)?;
    info!("Event loop finished");
    Ok(())
}
