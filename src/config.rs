//! # Game Configuration
//!
//! Tunables loaded from an optional JSON file. Every field has a default, so a missing
//! file or a partial file both work. The path is taken from `VOXEL_MINER_CONFIG`,
//! falling back to `voxel_miner.json` in the working directory.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_time::Duration;

use crate::engine_state::voxels::{generation::GenerationSettings, grid::GridBounds};

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "VOXEL_MINER_CONFIG";
/// Config file used when the env var is unset.
pub const DEFAULT_CONFIG_PATH: &str = "voxel_miner.json";

/// Errors raised while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// The file is not valid JSON for [`GameConfig`].
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// A value is outside its legal range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// All game tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid extent; coordinates range over `[-grid_size / 2, grid_size / 2]`
    pub grid_size: i32,
    /// Block count the initial generation aims for
    pub initial_block_count: usize,
    /// Sample budget of the initial generation
    pub initial_max_attempts: u32,
    /// Spawn exclusion: columns with `|x| < r && |z| < r` stay empty
    pub keep_clear_radius: i32,
    /// Sample budget of one replacement
    pub replacement_max_attempts: u32,
    /// Probability of stacking a replacement onto a non-empty column
    pub replacement_stack_chance: f32,
    /// Breaking progress per tick
    pub break_rate: f64,
    /// Hand swing length in milliseconds
    pub swing_duration_ms: u64,
    /// Destruction fade length in milliseconds
    pub fade_duration_ms: u64,
    /// Maximum ray distance
    pub reach: f32,
    /// RNG seed, random when absent
    pub seed: Option<u64>,
    /// Camera acceleration
    pub movement_speed: f32,
    /// Camera velocity damping
    pub friction: f32,
    /// Camera eye height
    pub eye_height: f32,
    /// Radians of view rotation per mouse delta unit
    pub mouse_sensitivity: f32,
    /// Directory holding block and hand textures
    pub asset_dir: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_block_count: 100,
            initial_max_attempts: 1000,
            keep_clear_radius: 2,
            replacement_max_attempts: 100,
            replacement_stack_chance: 0.3,
            break_rate: 0.05,
            swing_duration_ms: 300,
            fade_duration_ms: 250,
            reach: 1000.0,
            seed: None,
            movement_speed: 200.0,
            friction: 5.0,
            eye_height: 2.0,
            mouse_sensitivity: 0.002,
            asset_dir: PathBuf::from("assets/textures"),
        }
    }
}

impl GameConfig {
    /// Loads the config from the path named by `VOXEL_MINER_CONFIG`, or the default path.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_or_default(&path)
    }

    /// Loads the config from `path`, using defaults when the file does not exist.
    ///
    /// # Arguments
    /// * `path` - The JSON file to read
    ///
    /// # Returns
    /// The validated config, or the reason it could not be used.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = Self::from_json(&contents).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses, sanitizes and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: GameConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse {
                path: PathBuf::new(),
                source,
            })?;
        config.sanitize();
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the world model cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size <= 0 {
            return Err(ConfigError::Invalid(format!(
                "grid_size must be positive, got {}",
                self.grid_size
            )));
        }
        if !(0.0..=1.0).contains(&self.replacement_stack_chance) {
            return Err(ConfigError::Invalid(format!(
                "replacement_stack_chance must be within [0, 1], got {}",
                self.replacement_stack_chance
            )));
        }
        if self.break_rate <= 0.0 || !self.break_rate.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "break_rate must be positive, got {}",
                self.break_rate
            )));
        }
        Ok(())
    }

    /// Replaces unusable camera values with their defaults.
    fn sanitize(&mut self) {
        let defaults = Self::default();
        let fields: [(&str, &mut f32, f32); 5] = [
            ("reach", &mut self.reach, defaults.reach),
            ("movement_speed", &mut self.movement_speed, defaults.movement_speed),
            ("friction", &mut self.friction, defaults.friction),
            ("eye_height", &mut self.eye_height, defaults.eye_height),
            (
                "mouse_sensitivity",
                &mut self.mouse_sensitivity,
                defaults.mouse_sensitivity,
            ),
        ];
        for (name, value, default) in fields {
            if !value.is_finite() || *value <= 0.0 {
                warn!("Config {name} = {value} is not usable, using {default}");
                *value = default;
            }
        }
    }

    /// Horizontal extent of the world.
    pub fn bounds(&self) -> GridBounds {
        GridBounds::from_grid_size(self.grid_size.max(0) as u32)
    }

    /// The generation tunables.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            initial_block_count: self.initial_block_count,
            initial_max_attempts: self.initial_max_attempts,
            keep_clear_radius: self.keep_clear_radius,
            replacement_max_attempts: self.replacement_max_attempts,
            replacement_stack_chance: self.replacement_stack_chance,
        }
    }

    /// Hand swing length.
    pub fn swing_duration(&self) -> Duration {
        Duration::from_millis(self.swing_duration_ms)
    }

    /// Destruction fade length.
    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }
}
